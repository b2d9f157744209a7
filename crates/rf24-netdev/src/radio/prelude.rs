//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24_netdev::radio::prelude::*;
//! ```

use crate::{
    frame::{Frame, MAX_ADDRESS_WIDTH},
    netdev::{NetOpt, NetdevEvent, OptValue},
    AddressWidth, CrcLength, DataRate, FifoState, RetransmitDelay, State, TxPower,
};

/// Control over the MCU's interrupt line that the radio's IRQ pin is wired to.
///
/// The driver disables the line as soon as an interrupt is taken and enables
/// it again once [`NetDevice::isr()`] has finished, so a busy radio cannot
/// flood the consumer with interrupts.
pub trait IrqLine {
    fn set_enabled(&mut self, enabled: bool);
}

/// For setups that poll [`NetDevice::isr()`] instead of using an interrupt.
impl IrqLine for () {
    fn set_enabled(&mut self, _enabled: bool) {}
}

/// The operations a generic network-interface runtime uses to drive a device.
pub trait NetDevice {
    type NetDeviceErrorType;

    /// Bring the radio from any state into RX mode with the configuration given
    /// at construction.
    ///
    /// Fails with [`Nrf24Error::DeviceNotFound`](crate::radio::Nrf24Error::DeviceNotFound)
    /// if the radio does not respond after configuration.
    fn init(&mut self) -> Result<(), Self::NetDeviceErrorType>;

    /// Queue a frame for transmission and start transmitting it.
    ///
    /// Returns the number of bytes written to the TX FIFO. Whether the frame
    /// was delivered is only known later, from the events of [`NetDevice::isr()`].
    fn send(&mut self, frame: &Frame) -> Result<usize, Self::NetDeviceErrorType>;

    /// An upper bound of the size of any received frame.
    ///
    /// This does not touch the hardware.
    fn frame_size_estimate(&self) -> usize;

    /// Discard the frame at the top of the RX FIFO and return its exact size.
    ///
    /// Returns `0` if there is no (valid) frame.
    fn drop_frame(&mut self) -> Result<usize, Self::NetDeviceErrorType>;

    /// Move the frame at the top of the RX FIFO into `buf` and return its size.
    ///
    /// Returns `0` if there is no (valid) frame. If `buf` is too small, the
    /// frame is still removed from the RX FIFO and
    /// [`Nrf24Error::NoBufferSpace`](crate::radio::Nrf24Error::NoBufferSpace)
    /// is returned.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::NetDeviceErrorType>;

    /// The classic netdev receive call, combining [`NetDevice::frame_size_estimate()`]
    /// (`buf` is `None` and `len` is `0`), [`NetDevice::drop_frame()`]
    /// (`buf` is `None` and `len` is not `0`) and [`NetDevice::receive()`].
    fn recv(&mut self, buf: Option<&mut [u8]>, len: usize) -> Result<usize, Self::NetDeviceErrorType> {
        match buf {
            None if len == 0 => Ok(self.frame_size_estimate()),
            None => self.drop_frame(),
            Some(buf) => {
                let len = len.min(buf.len());
                self.receive(&mut buf[..len])
            }
        }
    }

    /// Service a pending interrupt.
    ///
    /// Every event is handed to `on_event` together with the device, so the
    /// handler may call [`NetDevice::receive()`] right away.
    fn isr<F>(&mut self, on_event: F) -> Result<(), Self::NetDeviceErrorType>
    where
        F: FnMut(&mut Self, NetdevEvent);

    /// Query an option.
    fn get(&self, opt: NetOpt) -> Result<OptValue, Self::NetDeviceErrorType>;

    /// Change an option.
    ///
    /// Options that cannot be changed fail with
    /// [`Nrf24Error::Unsupported`](crate::radio::Nrf24Error::Unsupported), values
    /// that do not fit `opt` fail with
    /// [`Nrf24Error::InvalidArgument`](crate::radio::Nrf24Error::InvalidArgument).
    fn set(&mut self, opt: NetOpt, value: OptValue) -> Result<(), Self::NetDeviceErrorType>;
}

/// A trait to represent the operating state of the transceiver.
pub trait EsbState {
    type StateErrorType;

    /// The current state. This never touches the hardware.
    fn get_state(&self) -> State;

    /// Request [`State::PowerDown`], [`State::Standby1`] or [`State::RxMode`].
    ///
    /// The requested state also becomes the state the radio returns to
    /// after a transmission.
    fn set_state(&mut self, state: State) -> Result<(), Self::StateErrorType>;
}

/// A trait to represent manipulation of data pipes
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Set a pipe's RX address.
    ///
    /// Pipes 0 and 1 take an address of the configured width. Pipes 2 - 5 take
    /// exactly one byte, which replaces the trailing byte of pipe 1's address.
    ///
    /// Pipe 0 receives broadcasts by default and pipe 1 is the device's own address.
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Get a pipe's full address (see [`EsbPipe::get_address_width()`] for
    /// how many bytes are meaningful).
    fn get_rx_address(&self, pipe: u8) -> Option<[u8; MAX_ADDRESS_WIDTH]>;

    /// The width shared by all addresses.
    fn get_address_width(&self) -> AddressWidth;
}

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's virtual channel index (0 - 15).
    ///
    /// See [`CHANNEL_MAP`](crate::conversion::CHANNEL_MAP) for the frequencies.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's virtual channel index.
    fn get_channel(&self) -> u8;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    ///
    /// Do not call this while a transmission is in progress.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;
}

/// A trait to represent manipulation of static payload widths
/// (used by [`Protocol::ShockBurst`](crate::Protocol::ShockBurst) only).
pub trait EsbPayloadLength {
    type PayloadLengthErrorType;

    /// Set the static payload width (1 - 32) of a pipe.
    fn set_payload_width(&mut self, pipe: u8, width: u8) -> Result<(), Self::PayloadLengthErrorType>;

    /// Get the static payload width of a pipe.
    fn get_payload_width(&self, pipe: u8) -> u8;
}

/// A trait to represent manipulation of the automatic retransmission feature
/// (used by [`Protocol::Esb`](crate::Protocol::Esb) only).
pub trait EsbAutoRetries {
    type AutoRetriesErrorType;

    /// Set the number of retransmissions (0 - 15) before a transmission fails.
    fn set_max_retransmits(&mut self, count: u8) -> Result<(), Self::AutoRetriesErrorType>;

    /// Always `0` under [`Protocol::ShockBurst`](crate::Protocol::ShockBurst).
    fn get_max_retransmits(&self) -> u8;

    /// Set the delay between retransmissions.
    fn set_retransmit_delay(&mut self, delay: RetransmitDelay) -> Result<(), Self::AutoRetriesErrorType>;

    fn get_retransmit_delay(&self) -> RetransmitDelay;
}

/// A trait to represent manipulation of Cyclical Redundancy Checksums
/// for an ESB capable transceiver.
pub trait EsbCrcLength {
    type CrcLengthErrorType;

    /// Set the CRC length. [`CrcLength::Disabled`] is not allowed with
    /// [`Protocol::Esb`](crate::Protocol::Esb).
    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcLengthErrorType>;

    fn get_crc_length(&self) -> CrcLength;
}

/// A trait to represent manipulation of the data rate
/// for an ESB capable transceiver.
pub trait EsbDataRate {
    type DataRateErrorType;

    /// Set the radio's data rate.
    ///
    /// Remember that both transmitter and receiver must use the same rate.
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType>;

    fn get_data_rate(&self) -> DataRate;
}

/// A trait to represent manipulation of the output power
/// for an ESB capable transceiver.
pub trait EsbTxPower {
    type TxPowerErrorType;

    fn set_tx_power(&mut self, level: TxPower) -> Result<(), Self::TxPowerErrorType>;

    fn get_tx_power(&self) -> TxPower;
}
