use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{mnemonics, registers, timing, Nrf24Error, RF24};
use crate::{
    radio::prelude::{EsbFifo, EsbState, IrqLine},
    State,
};

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    fn set_ce(&mut self, high: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if high {
            self.ce_pin.set_high().map_err(Nrf24Error::Gpo)
        } else {
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
        }
    }

    fn transition_done(&mut self, to: State) {
        #[cfg(feature = "defmt")]
        defmt::trace!("state {} -> {}", self._state, to);
        self._state = to;
    }

    /// Undo the pipe 0 address change made by a unicast send.
    fn restore_pipe0(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if !self._pipe0_overridden {
            return Ok(());
        }
        let width = self._config.address_width();
        let address = self._config.pipes.rx_address(0, width).unwrap_or_default();
        self.write_address(registers::RX_ADDR_P0, &address[..width.len() as usize])?;
        self.spi_write_byte(registers::SETUP_AW, width.into_bits())?;
        self._pipe0_overridden = false;
        Ok(())
    }

    pub(super) fn enter_power_down(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        debug_assert!(self._state.can_transition_to(State::PowerDown));
        match self._state {
            State::PowerDown => return Ok(()),
            State::Undefined => {
                self.set_ce(false)?;
                // the radio ignores SPI until its power-on reset is done
                self._delay_impl.delay_ms(timing::POWER_ON_MS);
            }
            State::Standby1 => (),
            State::RxMode => self.set_ce(false)?,
            State::TxMode | State::Standby2 => {
                self.set_ce(false)?;
                self.restore_pipe0()?;
            }
        }
        self.update_register(registers::CONFIG, mnemonics::PWR_UP, 0)?;
        self.transition_done(State::PowerDown);
        Ok(())
    }

    pub(super) fn enter_standby_1(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        debug_assert!(self._state.can_transition_to(State::Standby1));
        match self._state {
            State::Standby1 => return Ok(()),
            State::PowerDown => {
                self.update_register(registers::CONFIG, mnemonics::PWR_UP, mnemonics::PWR_UP)?;
                self._delay_impl.delay_us(timing::WAKE_US);
            }
            State::RxMode => self.set_ce(false)?,
            State::TxMode | State::Standby2 => {
                self.set_ce(false)?;
                self.restore_pipe0()?;
            }
            State::Undefined => (),
        }
        self.transition_done(State::Standby1);
        Ok(())
    }

    pub(super) fn enter_rx_mode(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        debug_assert!(self._state.can_transition_to(State::RxMode));
        if self._state == State::RxMode {
            return Ok(());
        }
        self.update_register(registers::CONFIG, mnemonics::PRIM_RX, mnemonics::PRIM_RX)?;
        if self.read_fifo_status()?.rx_full() {
            self.flush_rx()?;
        }
        self.set_ce(true)?;
        self._delay_impl.delay_us(timing::RX_SETTLING_US);
        self.transition_done(State::RxMode);
        Ok(())
    }

    pub(super) fn enter_tx_mode(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        debug_assert!(self._state.can_transition_to(State::TxMode));
        match self._state {
            State::TxMode => return Ok(()),
            State::Standby1 => {
                self.update_register(registers::CONFIG, mnemonics::PRIM_RX, 0)?;
                self._delay_impl.delay_us(timing::TX_SETTLING_US);
            }
            // STANDBY_2 moves on by itself once the TX FIFO is filled
            _ => (),
        }
        self.transition_done(State::TxMode);
        Ok(())
    }

    /// Pulse CE to transmit the payload at the top of the TX FIFO.
    pub(super) fn trigger_send(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.set_ce(true)?;
        self._delay_impl.delay_us(timing::CE_PULSE_US);
        self.set_ce(false)?;
        self._delay_impl.delay_us(timing::TX_SETTLING_US);
        Ok(())
    }

    /// Leave the current state for `to` along the legal edges.
    pub(super) fn go_to(&mut self, to: State) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if self._state == to {
            return Ok(());
        }
        match to {
            State::PowerDown => self.enter_power_down(),
            State::Standby1 => {
                if self._state == State::Undefined {
                    self.enter_power_down()?;
                }
                self.enter_standby_1()
            }
            State::RxMode => {
                if self._state != State::Standby1 {
                    self.go_to(State::Standby1)?;
                }
                self.enter_rx_mode()
            }
            _ => Err(Nrf24Error::Unsupported),
        }
    }
}

impl<SPI, DO, IRQ, DELAY> EsbState for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type StateErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_state(&self) -> State {
        self._state
    }

    fn set_state(&mut self, state: State) -> Result<(), Self::StateErrorType> {
        if !matches!(state, State::PowerDown | State::Standby1 | State::RxMode) {
            return Err(Nrf24Error::Unsupported);
        }
        self.go_to(state)?;
        self._idle_state = state;
        Ok(())
    }
}
