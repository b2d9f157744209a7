use super::{
    bit_fields::{Config, RfSetup, SetupRetry},
    mnemonics, registers, Nrf24Error, RF24,
};
use crate::{
    conversion::rf_channel,
    radio::prelude::{EsbFifo, IrqLine},
    CrcLength, Protocol, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    /// Program the radio from [`RF24::config()`] and start listening.
    pub(super) fn initialize(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let protocol = self._config.protocol();
        if protocol == Protocol::Esb && self._config.crc_length() == CrcLength::Disabled {
            return Err(Nrf24Error::Unsupported);
        }
        self._irq.set_enabled(false);
        self.enter_power_down()?;

        self.flush_rx()?;
        self.flush_tx()?;

        let width = self._config.address_width();
        let luid = self._config.luid();
        self._config.pipes.resolve_auto_addresses(&luid, width);

        self.spi_write_byte(registers::SETUP_AW, width.into_bits())?;
        let enabled = self._config.pipes.enabled_mask();
        for pipe in 0..6 {
            if enabled & (1 << pipe) != 0 {
                self.write_pipe_address(pipe)?;
            }
        }
        self.spi_write_byte(registers::EN_RXADDR, enabled)?;
        self._pipe0_overridden = false;

        let rf_setup = RfSetup::new()
            .with_data_rate(self._config.data_rate())
            .with_tx_power(self._config.tx_power());
        self.spi_write_byte(registers::RF_SETUP, rf_setup.into_bits())?;

        let setup_retr = match protocol {
            Protocol::Esb => SetupRetry::new()
                .with_ard(self._config.retransmit_delay().into_bits())
                .with_arc(self._config.max_retransmits()),
            Protocol::ShockBurst => SetupRetry::new(),
        };
        self.spi_write_byte(registers::SETUP_RETR, setup_retr.into_bits())?;

        let rf_ch = rf_channel(self._config.channel()).ok_or(Nrf24Error::InvalidArgument)?;
        self.spi_write_byte(registers::RF_CH, rf_ch)?;

        match protocol {
            Protocol::Esb => {
                self.spi_write_byte(
                    registers::FEATURE,
                    mnemonics::EN_DPL | mnemonics::EN_ACK_PAY | mnemonics::EN_DYN_ACK,
                )?;
                self.spi_write_byte(registers::EN_AA, enabled)?;
                self.spi_write_byte(registers::DYNPD, enabled)?;
            }
            Protocol::ShockBurst => {
                self.spi_write_byte(registers::FEATURE, mnemonics::EN_DYN_ACK)?;
                self.spi_write_byte(registers::EN_AA, 0)?;
                self.spi_write_byte(registers::DYNPD, 0)?;
                for pipe in 0..6 {
                    let width = self._config.payload_width(pipe);
                    self.spi_write_byte(registers::RX_PW_P0 + pipe, width)?;
                }
            }
        }

        // all IRQ events on the IRQ pin, still powered down
        let config = Config::new().with_crc_length(self._config.crc_length());
        self.spi_write_byte(registers::CONFIG, config.into_bits())?;
        self.spi_write_byte(registers::STATUS, StatusFlags::IRQ_MASK)?;

        self.enter_standby_1()?;
        if !Config::from_bits(self.read_register(registers::CONFIG)?).power() {
            #[cfg(feature = "defmt")]
            defmt::warn!("no response from the radio");
            return Err(Nrf24Error::DeviceNotFound);
        }
        let idle = self._idle_state;
        self.go_to(idle)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "initialized ({}, channel {}, {})",
            self._config.protocol(),
            self._config.channel(),
            self._config.data_rate()
        );
        self._isr_pending = false;
        self._deferred = StatusFlags::from_bits(0);
        self._irq.set_enabled(true);
        Ok(())
    }
}
