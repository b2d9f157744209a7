use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    frame::MAX_ADDRESS_WIDTH,
    radio::{
        prelude::{EsbPipe, IrqLine},
        Nrf24Error, RF24,
    },
    AddressWidth, Protocol,
};

use super::registers;

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    /// Program a pipe's address register from the stored configuration.
    pub(super) fn write_pipe_address(&mut self, pipe: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let width = self._config.address_width().len() as usize;
        match pipe {
            0 | 1 => {
                let address = self._config.pipes.rx_address(pipe, self._config.address_width());
                let address = address.ok_or(Nrf24Error::InvalidArgument)?;
                self.write_address(registers::RX_ADDR_P0 + pipe, &address[..width])
            }
            _ => {
                let suffix = self._config.pipes.suffix(pipe).ok_or(Nrf24Error::InvalidArgument)?;
                self.spi_write_byte(registers::RX_ADDR_P0 + pipe, suffix)
            }
        }
    }

    /// Open or close pipes 2 - 5 in EN_RXADDR (and EN_AA and DYNPD for ESB).
    fn enable_pipe(&mut self, pipe: u8, enable: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let mask = 1 << pipe;
        let value = if enable { mask } else { 0 };
        self.update_register(registers::EN_RXADDR, mask, value)?;
        if self._config.protocol() == Protocol::Esb {
            self.update_register(registers::EN_AA, mask, value)?;
            self.update_register(registers::DYNPD, mask, value)?;
        }
        Ok(())
    }

    /// Stop listening on one of pipes 2 - 5.
    ///
    /// Pipes 0 and 1 are always open.
    pub fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if !(2..=5).contains(&pipe) {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.check_configurable()?;
        self.enable_pipe(pipe, false)?;
        self._config.pipes.close_rx_pipe(pipe);
        Ok(())
    }
}

impl<SPI, DO, IRQ, DELAY> EsbPipe for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        let expected_len = match pipe {
            0 | 1 => self._config.address_width().len() as usize,
            2..=5 => 1,
            _ => return Err(Nrf24Error::InvalidArgument),
        };
        if address.len() != expected_len {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.check_configurable()?;
        if pipe < 2 {
            self.write_address(registers::RX_ADDR_P0 + pipe, address)?;
        } else {
            self.spi_write_byte(registers::RX_ADDR_P0 + pipe, address[0])?;
            if !self._config.pipes.is_rx_pipe_enabled(pipe) {
                self.enable_pipe(pipe, true)?;
            }
        }
        self._config.pipes.set_rx_address(pipe, address);
        Ok(())
    }

    fn get_rx_address(&self, pipe: u8) -> Option<[u8; MAX_ADDRESS_WIDTH]> {
        self._config.rx_address(pipe)
    }

    fn get_address_width(&self) -> AddressWidth {
        self._config.address_width()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbPipe};
    use crate::{
        radio::{rf24::commands, Nrf24Error, RadioConfig},
        spi_test_expects,
        test::{mk_radio, mk_radio_with},
        AddressWidth, Protocol, State,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    const W: u8 = commands::W_REGISTER;

    #[test]
    fn set_own_address() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::RX_ADDR_P1 | W, 0x55, 0x44, 0x33, 0x22, 0x11],
                vec![0xEu8, 0, 0, 0, 0, 0],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        radio.set_rx_address(1, &[0x11, 0x22, 0x33, 0x44, 0x55]).unwrap();
        assert_eq!(radio.get_rx_address(1), Some([0x11, 0x22, 0x33, 0x44, 0x55]));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn open_pipe_with_suffix() {
        let spi_expectations = spi_test_expects![
            (vec![registers::RX_ADDR_P0 + 3 | W, 0x9Au8], vec![0xEu8, 0u8]),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 0x03u8]),
            (vec![registers::EN_RXADDR | W, 0x0Bu8], vec![0xEu8, 0u8]),
            (vec![registers::EN_AA, 0u8], vec![0xEu8, 0x03u8]),
            (vec![registers::EN_AA | W, 0x0Bu8], vec![0xEu8, 0u8]),
            (vec![registers::DYNPD, 0u8], vec![0xEu8, 0x03u8]),
            (vec![registers::DYNPD | W, 0x0Bu8], vec![0xEu8, 0u8]),
        ];
        let config = RadioConfig::default().with_rx_address(1, &[1, 2, 3, 4, 5]);
        let mocks = mk_radio_with(config, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::Standby1;
        radio.set_rx_address(3, &[0x9A]).unwrap();
        assert_eq!(radio.get_rx_address(3), Some([1, 2, 3, 4, 0x9A]));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn close_pipe() {
        let spi_expectations = spi_test_expects![
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 0x07u8]),
            (vec![registers::EN_RXADDR | W, 0x03u8], vec![0xEu8, 0u8]),
        ];
        let config = RadioConfig::default()
            .with_protocol(Protocol::ShockBurst)
            .with_rx_address(2, &[0x42]);
        let mocks = mk_radio_with(config, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::PowerDown;
        assert_eq!(radio.close_rx_pipe(1), Err(Nrf24Error::InvalidArgument));
        radio.close_rx_pipe(2).unwrap();
        assert_eq!(radio.get_rx_address(2), None);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn address_lengths() {
        let config = RadioConfig::default().with_address_width(AddressWidth::Bytes4);
        let mocks = mk_radio_with(config, &[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._state = State::RxMode;
        assert_eq!(radio.get_address_width(), AddressWidth::Bytes4);
        assert_eq!(
            radio.set_rx_address(0, &[1, 2, 3, 4, 5]),
            Err(Nrf24Error::InvalidArgument)
        );
        assert_eq!(radio.set_rx_address(2, &[1, 2]), Err(Nrf24Error::InvalidArgument));
        assert_eq!(radio.set_rx_address(6, &[1]), Err(Nrf24Error::InvalidArgument));
        radio._state = State::TxMode;
        assert_eq!(radio.set_rx_address(2, &[1]), Err(Nrf24Error::TryAgain));
        assert_eq!(radio.get_rx_address(2), None);
        spi.done();
        ce_pin.done();
    }
}
