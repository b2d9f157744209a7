use super::{Nrf24Error, RF24};
use crate::{
    frame::{Framing, MAX_PAYLOAD_WIDTH},
    netdev::{interface_id, Address, DeviceType, LinkState, NetOpt, OptValue},
    radio::prelude::{
        EsbAutoRetries, EsbChannel, EsbCrcLength, EsbPipe, EsbState, EsbTxPower, IrqLine,
    },
    CrcLength, Protocol, RetransmitDelay, TxPower,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    fn own_address(&self) -> Result<Address, Nrf24Error<SPI::Error, DO::Error>> {
        let width = self._config.address_width().len() as usize;
        let address = self._config.rx_address(1).ok_or(Nrf24Error::Unsupported)?;
        Address::new(&address[..width]).ok_or(Nrf24Error::Unsupported)
    }

    /// The largest payload a single frame can carry.
    fn max_pdu_size(&self) -> u16 {
        let mut size = MAX_PAYLOAD_WIDTH;
        if self._config.framing() == Framing::CompactHeader {
            size -= 1 + self._config.address_width().len() as usize;
        }
        if self._config.protocol() == Protocol::ShockBurst {
            size = size.saturating_sub(MAX_PAYLOAD_WIDTH - self._config.payload_width(0) as usize);
        }
        size as u16
    }

    pub(super) fn get_option(&self, opt: NetOpt) -> Result<OptValue, Nrf24Error<SPI::Error, DO::Error>> {
        let width = self._config.address_width().len() as u16;
        Ok(match opt {
            NetOpt::Address => OptValue::Address(self.own_address()?),
            NetOpt::AddressLength | NetOpt::SourceLength => OptValue::Length(width),
            NetOpt::AutoAck => OptValue::Enable(self._config.protocol() == Protocol::Esb),
            NetOpt::Channel => OptValue::Channel(self.get_channel() as u16),
            NetOpt::Checksum => OptValue::Enable(self.get_crc_length() != CrcLength::Disabled),
            NetOpt::DeviceType => OptValue::DeviceType(DeviceType::Nrf24l01p),
            NetOpt::InterfaceId => {
                let address = self.own_address()?;
                OptValue::InterfaceId(interface_id(address.as_slice()).ok_or(Nrf24Error::Unsupported)?)
            }
            NetOpt::MaxPduSize => OptValue::MaxPduSize(self.max_pdu_size()),
            NetOpt::Protocol => OptValue::Protocol(self._config.upper_layer()),
            NetOpt::Retransmissions => OptValue::Retransmissions(self.get_max_retransmits()),
            NetOpt::RetransmitDelay => OptValue::RetransmitDelay(self.get_retransmit_delay().us() as u32),
            NetOpt::State => OptValue::State(LinkState::from(self.get_state())),
            NetOpt::TxPower => OptValue::TxPower(self.get_tx_power().dbm()),
        })
    }

    pub(super) fn set_option(&mut self, opt: NetOpt, value: OptValue) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        match (opt, value) {
            (NetOpt::Address, OptValue::Address(address)) => self.set_rx_address(1, address.as_slice()),
            (NetOpt::Channel, OptValue::Channel(channel)) => {
                let channel = u8::try_from(channel).map_err(|_| Nrf24Error::InvalidArgument)?;
                self.set_channel(channel)
            }
            (NetOpt::Checksum, OptValue::Enable(enable)) => self.set_crc_length(if enable {
                CrcLength::Bit16
            } else {
                CrcLength::Disabled
            }),
            (NetOpt::Retransmissions, OptValue::Retransmissions(count)) => self.set_max_retransmits(count),
            (NetOpt::RetransmitDelay, OptValue::RetransmitDelay(us)) => {
                self.set_retransmit_delay(RetransmitDelay::from_us(us))
            }
            (NetOpt::State, OptValue::State(state)) => {
                let state = state.as_state().ok_or(Nrf24Error::Unsupported)?;
                self.set_state(state)
            }
            (NetOpt::TxPower, OptValue::TxPower(dbm)) => self.set_tx_power(TxPower::from_dbm(dbm)),
            (
                NetOpt::Address
                | NetOpt::Channel
                | NetOpt::Checksum
                | NetOpt::Retransmissions
                | NetOpt::RetransmitDelay
                | NetOpt::State
                | NetOpt::TxPower,
                _,
            ) => Err(Nrf24Error::InvalidArgument),
            _ => {
                #[cfg(feature = "defmt")]
                defmt::debug!("option {} is read-only", opt);
                Err(Nrf24Error::Unsupported)
            }
        }
    }
}
