use super::{commands, registers, Nrf24Error, RF24};
use crate::{
    frame::{is_valid_width, Frame, Framing, MAX_PAYLOAD_WIDTH},
    radio::prelude::{EsbFifo, IrqLine},
    AddressWidth, Protocol, State, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    /// Queue `frame` and pulse CE.
    ///
    /// Unicast frames expect an acknowledgement (ESB only), so pipe 0 listens
    /// on the destination address until the radio falls back to STANDBY_1.
    pub(super) fn transmit(&mut self, frame: &Frame) -> Result<usize, Nrf24Error<SPI::Error, DO::Error>> {
        if frame.dst.is_empty() || frame.payload.is_empty() {
            return Err(Nrf24Error::BadMessage);
        }
        let fifo = self.read_fifo_status()?;
        if self._status.any_irq() {
            #[cfg(feature = "defmt")]
            defmt::debug!("send deferred: {}", self._status);
            // classify now, hand the events out with the next isr()
            let flags = self.take_irq_flags()?;
            self._deferred = StatusFlags::from_bits(self._deferred.into_bits() | flags.into_bits());
            if matches!(self._state, State::TxMode | State::Standby2) {
                self.advance_tx()?;
            }
            if !self._isr_pending {
                self.on_interrupt();
            }
            return Err(Nrf24Error::TryAgain);
        }
        if fifo.tx_full() {
            return Err(Nrf24Error::TryAgain);
        }
        let dst_width = AddressWidth::from_len(frame.dst.len()).ok_or(Nrf24Error::Unsupported)?;

        let framing = self._config.framing();
        let width = self._config.address_width().len() as usize;
        let own = self._config.rx_address(1).unwrap_or_default();
        let src = if framing == Framing::CompactHeader && frame.src.is_empty() {
            &own[..width]
        } else {
            frame.src
        };
        if framing == Framing::CompactHeader && !is_valid_width(src.len()) {
            return Err(Nrf24Error::Unsupported);
        }
        let static_width = match self._config.protocol() {
            Protocol::Esb => None,
            Protocol::ShockBurst => Some(self._config.payload_width(0)),
        };
        let mut payload = [0u8; MAX_PAYLOAD_WIDTH];
        let len = Frame::new(frame.dst, src, frame.payload).encode(framing, static_width, &mut payload)?;

        if !matches!(self._state, State::TxMode | State::Standby2) {
            self.go_to(State::Standby1)?;
        }
        self.write_address(registers::TX_ADDR, frame.dst)?;
        if frame.is_broadcast() {
            self.spi_write_buf(commands::W_TX_PAYLOAD_NO_ACK, &payload[..len])?;
        } else {
            if self._config.protocol() == Protocol::Esb {
                self.write_address(registers::RX_ADDR_P0, frame.dst)?;
                self.spi_write_byte(registers::SETUP_AW, dst_width.into_bits())?;
                self._pipe0_overridden = true;
            }
            self.spi_write_buf(commands::W_TX_PAYLOAD, &payload[..len])?;
        }
        self.enter_tx_mode()?;
        self.trigger_send()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("queued {} bytes", len);
        Ok(len)
    }

    /// Pop the frame at the top of the RX FIFO.
    ///
    /// With `out` being `None`, the frame is dropped. Either way the size of
    /// the frame (as laid out by [`Frame::write_to()`]) is returned, or `0` if
    /// the FIFO held nothing usable.
    pub(super) fn pop_frame(&mut self, out: Option<&mut [u8]>) -> Result<usize, Nrf24Error<SPI::Error, DO::Error>> {
        let protocol = self._config.protocol();
        let reported = match protocol {
            Protocol::Esb => self.read_register(commands::R_RX_PL_WID)?,
            Protocol::ShockBurst => {
                self.spi_read(0, commands::NOP)?;
                0
            }
        };
        let pipe = self._status.rx_pipe();
        let dst = self._config.rx_address(pipe);
        let width = match protocol {
            Protocol::Esb => reported,
            Protocol::ShockBurst => self._config.payload_width(pipe),
        };
        let Some(dst) = dst.filter(|_| width > 0 && width as usize <= MAX_PAYLOAD_WIDTH) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("RX FIFO corrupted (pipe {}, width {}), flushing", pipe, width);
            self.flush_rx()?;
            return Ok(0);
        };

        self.spi_read(width, commands::R_RX_PAYLOAD)?;
        let mut raw = [0u8; MAX_PAYLOAD_WIDTH];
        raw[..width as usize].copy_from_slice(&self._buf[1..=width as usize]);

        let framing = self._config.framing();
        let aw = self._config.address_width().len() as usize;
        let frame = Frame::decode(
            framing,
            &dst[..aw],
            &raw[..width as usize],
            protocol == Protocol::ShockBurst,
        )?;
        let size = frame.size(framing);
        match out {
            None => Ok(size),
            Some(buf) if buf.len() < size => {
                #[cfg(feature = "defmt")]
                defmt::debug!("dropped a {} byte frame, buffer holds {}", size, buf.len());
                Err(Nrf24Error::NoBufferSpace)
            }
            Some(buf) => Ok(frame.write_to(framing, buf)?),
        }
    }

    /// The largest frame [`RF24::pop_frame()`] can produce.
    pub(super) fn max_frame_size(&self) -> usize {
        self._config.address_width().len() as usize + MAX_PAYLOAD_WIDTH
    }
}
