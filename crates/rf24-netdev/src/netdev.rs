//! Types exchanged with a generic network-interface runtime.
//!
//! A runtime drives the device through
//! [`NetDevice`](crate::radio::prelude::NetDevice) and talks to it with
//! these option keys, option values and events.

use core::fmt::{Display, Formatter, Result};

use crate::{frame::MAX_ADDRESS_WIDTH, State};

/// The abstract events produced by the interrupt service routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetdevEvent {
    /// A frame was sent (and acknowledged, if acknowledgements are used).
    TxComplete,
    /// The maximum number of retransmissions was reached without an acknowledgement.
    TxNoAck,
    /// A frame is waiting in the RX FIFO.
    RxComplete,
}

impl Display for NetdevEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            NetdevEvent::TxComplete => write!(f, "TX complete"),
            NetdevEvent::TxNoAck => write!(f, "TX no ACK"),
            NetdevEvent::RxComplete => write!(f, "RX complete"),
        }
    }
}

/// The generic view of the transceiver's [`State`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Off,
    Sleep,
    Standby,
    Tx,
    Rx,
}

impl From<State> for LinkState {
    fn from(state: State) -> Self {
        match state {
            State::PowerDown => LinkState::Sleep,
            State::Standby1 => LinkState::Standby,
            State::Standby2 | State::TxMode => LinkState::Tx,
            State::RxMode => LinkState::Rx,
            State::Undefined => LinkState::Off,
        }
    }
}

impl LinkState {
    /// The [`State`] a request for this link state maps to.
    pub const fn as_state(self) -> Option<State> {
        match self {
            LinkState::Sleep => Some(State::PowerDown),
            LinkState::Standby => Some(State::Standby1),
            LinkState::Tx => Some(State::TxMode),
            LinkState::Rx => Some(State::RxMode),
            LinkState::Off => None,
        }
    }
}

/// Identifies the driver to the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceType {
    Nrf24l01p,
}

/// What the runtime should hand received frames to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpperLayerProtocol {
    Undefined,
    SixLowpan,
}

/// A link-layer address of 3 - 5 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address {
    bytes: [u8; MAX_ADDRESS_WIDTH],
    len: u8,
}

impl Address {
    /// Returns `None` if `bytes` is longer than 5 bytes.
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_ADDRESS_WIDTH {
            return None;
        }
        let mut address = Self {
            bytes: [0; MAX_ADDRESS_WIDTH],
            len: bytes.len() as u8,
        };
        address.bytes[..bytes.len()].copy_from_slice(bytes);
        Some(address)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// The options a runtime can query with
/// [`NetDevice::get()`](crate::radio::prelude::NetDevice::get)
/// and change with [`NetDevice::set()`](crate::radio::prelude::NetDevice::set).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetOpt {
    /// The device's own address (pipe 1). Settable.
    Address,
    AddressLength,
    SourceLength,
    AutoAck,
    /// The virtual channel index. Settable.
    Channel,
    /// Settable: enabling selects a 16 bit CRC.
    Checksum,
    DeviceType,
    /// An 8 byte interface identifier derived from the own address.
    InterfaceId,
    MaxPduSize,
    Protocol,
    /// Settable.
    Retransmissions,
    /// In microseconds. Settable.
    RetransmitDelay,
    /// Settable to [`LinkState::Sleep`], [`LinkState::Standby`] or [`LinkState::Rx`].
    State,
    /// In dBm. Settable.
    TxPower,
}

/// The value of a [`NetOpt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OptValue {
    Address(Address),
    Length(u16),
    Enable(bool),
    Channel(u16),
    DeviceType(DeviceType),
    InterfaceId([u8; 8]),
    MaxPduSize(u16),
    Protocol(UpperLayerProtocol),
    Retransmissions(u8),
    RetransmitDelay(u32),
    State(LinkState),
    TxPower(i16),
}

/// Derive an EUI-64 style interface identifier from a 3 - 5 byte address.
///
/// ```text
/// [width << 5, a0, a1, 0xFF, 0xFE, a2, a3, a4]   (5 byte address)
/// [width << 5, 0,  a0, 0xFF, 0xFE, a1, a2, a3]   (4 byte address)
/// ```
pub fn interface_id(address: &[u8]) -> Option<[u8; 8]> {
    let aw = address.len();
    if !crate::frame::is_valid_width(aw) {
        return None;
    }
    let mut iid = [0u8; 8];
    iid[0] = (aw as u8) << 5;
    let lead = aw - 3;
    iid[3 - lead..3].copy_from_slice(&address[..lead]);
    iid[3] = 0xFF;
    iid[4] = 0xFE;
    iid[5..].copy_from_slice(&address[lead..]);
    Some(iid)
}
