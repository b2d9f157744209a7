use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbAutoRetries, IrqLine},
        Nrf24Error, RF24,
    },
    Protocol, RetransmitDelay,
};

use super::registers;

/// ARC is the low nibble of SETUP_RETR, ARD the high nibble.
const ARC_MASK: u8 = 0x0F;
const ARD_MASK: u8 = 0xF0;

impl<SPI, DO, IRQ, DELAY> EsbAutoRetries for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type AutoRetriesErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_max_retransmits(&mut self, count: u8) -> Result<(), Self::AutoRetriesErrorType> {
        if count > 15 {
            return Err(Nrf24Error::InvalidArgument);
        }
        if self._config.protocol() == Protocol::ShockBurst {
            return Err(Nrf24Error::Unsupported);
        }
        self.check_configurable()?;
        self.update_register(registers::SETUP_RETR, ARC_MASK, count)?;
        self._config = self
            ._config
            .with_auto_retries(self._config.retransmit_delay(), count);
        Ok(())
    }

    fn get_max_retransmits(&self) -> u8 {
        match self._config.protocol() {
            Protocol::Esb => self._config.max_retransmits(),
            Protocol::ShockBurst => 0,
        }
    }

    fn set_retransmit_delay(&mut self, delay: RetransmitDelay) -> Result<(), Self::AutoRetriesErrorType> {
        if self._config.protocol() == Protocol::ShockBurst {
            return Err(Nrf24Error::Unsupported);
        }
        self.check_configurable()?;
        self.update_register(registers::SETUP_RETR, ARD_MASK, delay.into_bits() << 4)?;
        self._config = self
            ._config
            .with_auto_retries(delay, self._config.max_retransmits());
        Ok(())
    }

    fn get_retransmit_delay(&self) -> RetransmitDelay {
        self._config.retransmit_delay()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbAutoRetries};
    use crate::{
        radio::{rf24::commands, Nrf24Error, RadioConfig},
        spi_test_expects,
        test::{mk_radio, mk_radio_with},
        Protocol, RetransmitDelay, State,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn set_auto_retries() {
        let spi_expectations = spi_test_expects![
            (vec![registers::SETUP_RETR, 0u8], vec![0xEu8, 0x13u8]),
            (vec![registers::SETUP_RETR | commands::W_REGISTER, 0x1Fu8], vec![0xEu8, 0u8]),
            (vec![registers::SETUP_RETR, 0u8], vec![0xEu8, 0x1Fu8]),
            (vec![registers::SETUP_RETR | commands::W_REGISTER, 0x5Fu8], vec![0xEu8, 0u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        radio.set_max_retransmits(15).unwrap();
        radio
            .set_retransmit_delay(RetransmitDelay::from_us(1500))
            .unwrap();
        assert_eq!(radio.get_max_retransmits(), 15);
        assert_eq!(radio.get_retransmit_delay().us(), 1500);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn count_out_of_range() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        assert_eq!(radio.set_max_retransmits(16), Err(Nrf24Error::InvalidArgument));
        assert_eq!(radio.get_max_retransmits(), 3);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn shockburst_has_no_retries() {
        let config = RadioConfig::default()
            .with_protocol(Protocol::ShockBurst)
            .with_auto_retries(RetransmitDelay::MIN, 9);
        let mocks = mk_radio_with(config, &[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        // the stored count is never reported
        assert_eq!(radio.get_max_retransmits(), 0);
        assert_eq!(radio.set_max_retransmits(5), Err(Nrf24Error::Unsupported));
        assert_eq!(
            radio.set_retransmit_delay(RetransmitDelay::MAX),
            Err(Nrf24Error::Unsupported)
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn busy() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::TxMode;
        assert_eq!(radio.set_max_retransmits(5), Err(Nrf24Error::TryAgain));
        assert_eq!(
            radio.set_retransmit_delay(RetransmitDelay::MAX),
            Err(Nrf24Error::TryAgain)
        );
        spi.done();
        ce_pin.done();
    }
}
