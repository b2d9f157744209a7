use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbDataRate, IrqLine},
        Nrf24Error, RF24,
    },
    DataRate,
};

use super::registers;

impl<SPI, DO, IRQ, DELAY> EsbDataRate for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type DataRateErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_data_rate(&self) -> DataRate {
        self._config.data_rate()
    }

    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType> {
        self.check_configurable()?;
        self.update_register(registers::RF_SETUP, DataRate::MASK, data_rate.into_bits())?;
        self._config = self._config.with_data_rate(data_rate);
        Ok(())
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbDataRate};
    use crate::{
        radio::{rf24::commands, Nrf24Error},
        spi_test_expects,
        test::mk_radio,
        DataRate, State,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    fn set_data_rate(data_rate: DataRate, current: u8, expected: u8) {
        let spi_expectations = spi_test_expects![
            (vec![registers::RF_SETUP, 0u8], vec![0xEu8, current]),
            (vec![registers::RF_SETUP | commands::W_REGISTER, expected], vec![0xEu8, 0u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::Standby1;
        radio.set_data_rate(data_rate).unwrap();
        assert_eq!(radio.get_data_rate(), data_rate);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn data_rate_1mbps() {
        set_data_rate(DataRate::Mbps1, 0x2E, 0x06);
    }

    #[test]
    fn data_rate_2mbps() {
        set_data_rate(DataRate::Mbps2, 0x06, 0x0E);
    }

    #[test]
    fn data_rate_250kbps() {
        set_data_rate(DataRate::Kbps250, 0x0E, 0x26);
    }

    #[test]
    fn busy() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::Standby2;
        assert_eq!(radio.set_data_rate(DataRate::Mbps2), Err(Nrf24Error::TryAgain));
        assert_eq!(radio.get_data_rate(), DataRate::Mbps1);
        spi.done();
        ce_pin.done();
    }
}
