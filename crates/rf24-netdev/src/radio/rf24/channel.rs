use super::registers;
use crate::{
    conversion::rf_channel,
    radio::{
        prelude::{EsbChannel, IrqLine},
        Nrf24Error, RF24,
    },
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

/// RF_CH is 7 bits wide.
const RF_CH_MASK: u8 = 0x7F;

impl<SPI, DO, IRQ, DELAY> EsbChannel for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type ChannelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Only indices 0 - 15 are accepted; the RF channel written to the
    /// radio comes from [`CHANNEL_MAP`](crate::conversion::CHANNEL_MAP).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType> {
        let rf_ch = rf_channel(channel).ok_or(Nrf24Error::InvalidArgument)?;
        self.check_configurable()?;
        self.update_register(registers::RF_CH, RF_CH_MASK, rf_ch)?;
        self._config = self._config.with_channel(channel);
        Ok(())
    }

    /// See also [`RF24::set_channel()`].
    fn get_channel(&self) -> u8 {
        self._config.channel()
    }
}
