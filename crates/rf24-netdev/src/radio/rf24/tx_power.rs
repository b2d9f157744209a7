use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbTxPower, IrqLine},
        Nrf24Error, RF24,
    },
    TxPower,
};

use super::registers;

impl<SPI, DO, IRQ, DELAY> EsbTxPower for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type TxPowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_tx_power(&self) -> TxPower {
        self._config.tx_power()
    }

    fn set_tx_power(&mut self, level: TxPower) -> Result<(), Self::TxPowerErrorType> {
        self.check_configurable()?;
        self.update_register(registers::RF_SETUP, TxPower::MASK, level.into_bits())?;
        self._config = self._config.with_tx_power(level);
        Ok(())
    }
}
