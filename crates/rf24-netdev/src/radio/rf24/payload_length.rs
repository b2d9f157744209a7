use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    frame::MAX_PAYLOAD_WIDTH,
    radio::{
        prelude::{EsbPayloadLength, IrqLine},
        Nrf24Error, RF24,
    },
    Protocol,
};

use super::registers;

/// RX_PW_Px only uses 6 bits.
const RX_PW_MASK: u8 = 0x3F;

impl<SPI, DO, IRQ, DELAY> EsbPayloadLength for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type PayloadLengthErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_payload_width(&mut self, pipe: u8, width: u8) -> Result<(), Self::PayloadLengthErrorType> {
        if pipe > 5 || width == 0 || width as usize > MAX_PAYLOAD_WIDTH {
            return Err(Nrf24Error::InvalidArgument);
        }
        if self._config.protocol() == Protocol::Esb {
            return Err(Nrf24Error::Unsupported);
        }
        self.check_configurable()?;
        self.update_register(registers::RX_PW_P0 + pipe, RX_PW_MASK, width)?;
        self._config.pipes.set_payload_width(pipe, width);
        Ok(())
    }

    fn get_payload_width(&self, pipe: u8) -> u8 {
        self._config.payload_width(pipe)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbPayloadLength};
    use crate::{
        radio::{rf24::commands, Nrf24Error, RadioConfig},
        spi_test_expects,
        test::{mk_radio, mk_radio_with},
        Protocol, State,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn set_payload_width() {
        let spi_expectations = spi_test_expects![
            (vec![registers::RX_PW_P0 + 2, 0u8], vec![0xEu8, 32u8]),
            (vec![registers::RX_PW_P0 + 2 | commands::W_REGISTER, 12u8], vec![0xEu8, 0u8]),
        ];
        let config = RadioConfig::default().with_protocol(Protocol::ShockBurst);
        let mocks = mk_radio_with(config, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        radio.set_payload_width(2, 12).unwrap();
        assert_eq!(radio.get_payload_width(2), 12);
        assert_eq!(radio.get_payload_width(1), 32);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rejected_widths() {
        let config = RadioConfig::default().with_protocol(Protocol::ShockBurst);
        let mocks = mk_radio_with(config, &[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        assert_eq!(radio.set_payload_width(0, 0), Err(Nrf24Error::InvalidArgument));
        assert_eq!(radio.set_payload_width(0, 33), Err(Nrf24Error::InvalidArgument));
        assert_eq!(radio.set_payload_width(6, 8), Err(Nrf24Error::InvalidArgument));
        radio._state = State::Standby2;
        assert_eq!(radio.set_payload_width(0, 8), Err(Nrf24Error::TryAgain));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn esb_uses_dynamic_widths() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        assert_eq!(radio.set_payload_width(0, 8), Err(Nrf24Error::Unsupported));
        spi.done();
        ce_pin.done();
    }
}
