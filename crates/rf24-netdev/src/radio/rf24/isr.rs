use super::{commands, registers, Nrf24Error, RF24};
use crate::{
    netdev::NetdevEvent,
    radio::prelude::{EsbFifo, IrqLine},
    State, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

/// The RX FIFO holds at most 3 payloads.
const RX_FIFO_DEPTH: u8 = 3;

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    /// Classify and clear the pending IRQ flags, then move the state machine on.
    ///
    /// The interrupt line is enabled again afterwards, even if the radio
    /// failed to respond.
    pub(super) fn service_interrupt<F>(&mut self, on_event: F) -> Result<(), Nrf24Error<SPI::Error, DO::Error>>
    where
        F: FnMut(&mut Self, NetdevEvent),
    {
        let result = self.dispatch_events(on_event);
        self._isr_pending = false;
        self._irq.set_enabled(true);
        result
    }

    /// Read and clear the IRQ flags.
    ///
    /// A failed transmission leaves its payload in the TX FIFO, which is
    /// flushed right away.
    pub(super) fn take_irq_flags(&mut self) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(0, commands::NOP)?;
        let flags = StatusFlags::from_bits(self._status.into_bits() & StatusFlags::IRQ_MASK);
        self.spi_write_byte(registers::STATUS, flags.into_bits())?;
        #[cfg(feature = "defmt")]
        defmt::trace!("ISR: {}", flags);
        if flags.tx_df() {
            self.flush_tx()?;
        }
        Ok(flags)
    }

    /// Send the next queued payload, or leave TX for the idle state.
    pub(super) fn advance_tx(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if self.read_fifo_status()?.tx_empty() {
            self.enter_standby_1()?;
            let idle = self._idle_state;
            self.go_to(idle)
        } else {
            // another payload (or an ACK) is still queued
            self.trigger_send()
        }
    }

    fn dispatch_events<F>(&mut self, mut on_event: F) -> Result<(), Nrf24Error<SPI::Error, DO::Error>>
    where
        F: FnMut(&mut Self, NetdevEvent),
    {
        let deferred = core::mem::replace(&mut self._deferred, StatusFlags::from_bits(0));
        let status = StatusFlags::from_bits(deferred.into_bits() | self.take_irq_flags()?.into_bits());

        if status.tx_df() {
            on_event(self, NetdevEvent::TxNoAck);
        }
        if status.tx_ds() {
            on_event(self, NetdevEvent::TxComplete);
        }
        if status.rx_dr() {
            on_event(self, NetdevEvent::RxComplete);
        }

        match self._state {
            State::RxMode => {
                let mut drained = 0;
                while !self.read_fifo_status()?.rx_empty() {
                    if drained == RX_FIFO_DEPTH {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("RX FIFO not drained by the event handler, flushing");
                        self.flush_rx()?;
                        break;
                    }
                    on_event(self, NetdevEvent::RxComplete);
                    drained += 1;
                }
            }
            State::TxMode | State::Standby2 => self.advance_tx()?,
            _ => (),
        }
        Ok(())
    }
}
