use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
mod auto_retries;
pub(crate) mod bit_fields;
mod channel;
mod constants;
mod crc_length;
mod data_rate;
mod fifo;
mod init;
mod isr;
mod netdev;
mod options;
mod payload_length;
mod pipe;
mod radio;
mod state;
mod tx_power;
use bit_fields::ObserveTx;
pub use constants::{commands, mnemonics, registers, timing};

use super::{prelude::IrqLine, RadioConfig};
use crate::{frame::FrameError, State, StatusFlags};

/// An collection of error types to describe hardware malfunctions
/// and rejected requests.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// A length, index, channel or width is out of range.
    InvalidArgument,
    /// The request makes no sense for the configured protocol,
    /// or a received frame was malformed.
    Unsupported,
    /// The radio is busy (typically transmitting). Retry after the next event.
    TryAgain,
    /// The frame does not fit in 32 bytes.
    TooLarge,
    /// The receive buffer is too small. The frame was dropped.
    NoBufferSpace,
    /// A frame without destination or without payload.
    BadMessage,
    /// The radio did not respond after initialization.
    DeviceNotFound,
}

impl<SPI, DO> From<FrameError> for Nrf24Error<SPI, DO> {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::TooLarge => Nrf24Error::TooLarge,
            FrameError::Malformed => Nrf24Error::Unsupported,
        }
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// and [`NetDevice`](crate::radio::prelude::NetDevice)
/// for the nRF24L01+ transceiver.
///
/// The radio is programmed from (and restored to) the [`RadioConfig`]
/// given at construction; every setter keeps that configuration in sync
/// with the hardware.
pub struct RF24<SPI, DO, IRQ, DELAY> {
    _spi: SPI,
    ce_pin: DO,
    _irq: IRQ,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _config: RadioConfig,
    _state: State,
    /// The state to resume once a transmission is done.
    _idle_state: State,
    _isr_pending: bool,
    /// IRQ flags cleared by [`NetDevice::send()`](crate::radio::prelude::NetDevice::send)
    /// whose events are still to be handed out.
    _deferred: StatusFlags,
    /// Pipe 0 listens on a unicast destination instead of its configured address.
    _pipe0_overridden: bool,
}

impl<SPI, DO, IRQ, DELAY> RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter). Sharing the bus with other
    /// peripherals is up to that object (see `embedded-hal-bus`).
    ///
    /// Nothing is written to the radio until
    /// [`NetDevice::init()`](crate::radio::prelude::NetDevice::init).
    pub fn new(
        ce_pin: DO,
        spi: SPI,
        irq: IRQ,
        delay_impl: DELAY,
        config: RadioConfig,
    ) -> RF24<SPI, DO, IRQ, DELAY> {
        RF24 {
            ce_pin,
            _spi: spi,
            _irq: irq,
            _delay_impl: delay_impl,
            _status: StatusFlags::from_bits(0),
            _buf: [0u8; 33],
            _idle_state: config.idle_state(),
            _config: config,
            _state: State::Undefined,
            _isr_pending: false,
            _deferred: StatusFlags::from_bits(0),
            _pipe0_overridden: false,
        }
    }

    /// The configuration currently programmed into the radio.
    pub fn config(&self) -> &RadioConfig {
        &self._config
    }

    /// The STATUS byte cached from the latest SPI transaction.
    pub fn status(&self) -> StatusFlags {
        self._status
    }

    /// To be called when the IRQ pin asserts (falling edge).
    ///
    /// This masks the interrupt line and marks the device for service by
    /// [`NetDevice::isr()`](crate::radio::prelude::NetDevice::isr), which
    /// unmasks the line again. Nothing is sent over SPI here.
    pub fn on_interrupt(&mut self) {
        self._irq.set_enabled(false);
        self._isr_pending = true;
    }

    /// Is there an interrupt waiting for
    /// [`NetDevice::isr()`](crate::radio::prelude::NetDevice::isr)?
    pub fn isr_pending(&self) -> bool {
        self._isr_pending
    }

    /// Was a carrier (above -64 dBm) detected on the current channel
    /// while in RX mode?
    pub fn rpd(&mut self) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(self.read_register(registers::RPD)? & 1 == 1)
    }

    /// Returns `(lost_packets, retries)`.
    ///
    /// `lost_packets` counts transmissions that reached the retransmit limit
    /// (saturating at 15, reset by a channel change). `retries` is the number
    /// of retransmissions of the last packet.
    pub fn observe_tx(&mut self) -> Result<(u8, u8), Nrf24Error<SPI::Error, DO::Error>> {
        let observe = ObserveTx::from_bits(self.read_register(registers::OBSERVE_TX)?);
        Ok((observe.plos_cnt(), observe.arc_cnt()))
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..=len as usize].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    /// Write a payload (or any other multi-byte command) verbatim.
    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        let buf_len = buf.len().min(32);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, register)?;
        Ok(self._buf[1])
    }

    /// Read-modify-write the bits selected by `mask`.
    ///
    /// Returns the value written.
    fn update_register(
        &mut self,
        register: u8,
        mask: u8,
        value: u8,
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        let current = self.read_register(register)?;
        let new_val = current & !mask | value & mask;
        self.spi_write_byte(register, new_val)?;
        Ok(new_val)
    }

    /// Write a multi-byte address register.
    ///
    /// Addresses are kept most significant byte first, but the radio expects
    /// the LSByte first.
    fn write_address(
        &mut self,
        register: u8,
        address: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let len = address.len().min(5);
        self._buf[0] = register | commands::W_REGISTER;
        for (dest, src) in self._buf[1..=len].iter_mut().zip(address[..len].iter().rev()) {
            *dest = *src;
        }
        self.spi_transfer(len as u8 + 1)
    }

    /// Configuration may only change while not transmitting.
    fn check_configurable(&self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if !self._state.is_configurable() {
            return Err(Nrf24Error::TryAgain);
        }
        Ok(())
    }
}
