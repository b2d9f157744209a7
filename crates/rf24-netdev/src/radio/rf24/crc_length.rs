use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbCrcLength, IrqLine},
        Nrf24Error, RF24,
    },
    CrcLength, Protocol,
};

use super::registers;

impl<SPI, DO, IRQ, DELAY> EsbCrcLength for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type CrcLengthErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_crc_length(&self) -> CrcLength {
        self._config.crc_length()
    }

    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcLengthErrorType> {
        if crc_length == CrcLength::Disabled && self._config.protocol() == Protocol::Esb {
            return Err(Nrf24Error::Unsupported);
        }
        self.check_configurable()?;
        self.update_register(registers::CONFIG, CrcLength::MASK, crc_length.into_bits())?;
        self._config = self._config.with_crc_length(crc_length);
        Ok(())
    }
}
