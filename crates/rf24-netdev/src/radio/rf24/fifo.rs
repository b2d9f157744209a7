use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{
    prelude::{EsbFifo, IrqLine},
    Nrf24Error, RF24,
};
use crate::FifoState;

use super::{bit_fields::FifoStatus, commands, registers};

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    pub(super) fn read_fifo_status(&mut self) -> Result<FifoStatus, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(FifoStatus::from_bits(self.read_register(registers::FIFO_STATUS)?))
    }
}

impl<SPI, DO, IRQ, DELAY> EsbFifo for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let status = self.read_fifo_status()?;
        let (full, empty) = if about_tx {
            (status.tx_full(), status.tx_empty())
        } else {
            (status.rx_full(), status.rx_empty())
        };
        Ok(match (full, empty) {
            (true, _) => FifoState::Full,
            (_, true) => FifoState::Empty,
            _ => FifoState::Occupied,
        })
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbFifo, FifoState};
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    pub fn flush() {
        let spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.flush_rx().unwrap();
        radio.flush_tx().unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn get_fifo_state() {
        let spi_expectations = spi_test_expects![
            // TX FIFO empty, RX FIFO occupied
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x10u8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x10u8]),
            // TX FIFO full, RX FIFO empty
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x21u8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x21u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.get_fifo_state(true), Ok(FifoState::Empty));
        assert_eq!(radio.get_fifo_state(false), Ok(FifoState::Occupied));
        assert_eq!(radio.get_fifo_state(true), Ok(FifoState::Full));
        assert_eq!(radio.get_fifo_state(false), Ok(FifoState::Empty));
        spi.done();
        ce_pin.done();
    }
}
