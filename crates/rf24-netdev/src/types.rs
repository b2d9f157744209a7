//! This module defines the radio-level types used by the driver's configuration
//! and state machine.
//!
//! These types carry their wire-level encodings privately; the public surface
//! only deals in enums and bounded values.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// The two over-the-air protocol personalities of the nRF24L01+.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    /// Enhanced ShockBurst: automatic acknowledgements, automatic retransmissions
    /// and dynamic payload lengths.
    Esb,
    /// Legacy ShockBurst: fire-and-forget with static (per-pipe) payload widths.
    ShockBurst,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Protocol::Esb => write!(f, "Enhanced ShockBurst"),
            Protocol::ShockBurst => write!(f, "ShockBurst"),
        }
    }
}

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxPower {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TxPower {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} dBm", self.dbm())
    }
}

impl TxPower {
    pub(crate) const MASK: u8 = 6;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            TxPower::Min => 0,
            TxPower::Low => 2,
            TxPower::High => 4,
            TxPower::Max => 6,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 => TxPower::Min,
            2 => TxPower::Low,
            4 => TxPower::High,
            _ => TxPower::Max,
        }
    }

    /// The output power in dBm.
    pub const fn dbm(self) -> i16 {
        match self {
            TxPower::Min => -18,
            TxPower::Low => -12,
            TxPower::High => -6,
            TxPower::Max => 0,
        }
    }

    /// The highest power level that does not exceed `dbm`.
    ///
    /// Anything below -18 dBm saturates to [`TxPower::Min`].
    pub const fn from_dbm(dbm: i16) -> Self {
        if dbm >= 0 {
            TxPower::Max
        } else if dbm >= -6 {
            TxPower::High
        } else if dbm >= -12 {
            TxPower::Low
        } else {
            TxPower::Min
        }
    }
}

impl Display for TxPower {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{} dBm", self.dbm())
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    /// RF_DR_LOW and RF_DR_HIGH are not adjacent in RF_SETUP.
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }

    /// The air data rate in kilobits per second.
    pub const fn kbps(self) -> u32 {
        match self {
            DataRate::Mbps1 => 1000,
            DataRate::Mbps2 => 2000,
            DataRate::Kbps250 => 250,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The length of a CRC checksum that is used (if any).
///
/// Cyclical Redundancy Checking (CRC) is commonly used to ensure data integrity.
/// Enhanced ShockBurst cannot operate without it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrcLength {
    /// represents no CRC checksum is used
    Disabled,
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    pub(crate) const MASK: u8 = 0b1100;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 8,
            CrcLength::Bit16 => 12,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 | 4 => CrcLength::Disabled,
            8 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }

    /// The number of checksum bytes appended to every packet.
    pub const fn len(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 1,
            CrcLength::Bit16 => 2,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrcLength::Disabled => defmt::write!(fmt, "disabled"),
            CrcLength::Bit8 => defmt::write!(fmt, "8 bit"),
            CrcLength::Bit16 => defmt::write!(fmt, "16 bit"),
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Disabled => write!(f, "disabled"),
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// The width of every pipe address.
///
/// All six pipes share one width; pipes 2 - 5 only differ from pipe 1
/// in their trailing byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    Bytes3,
    Bytes4,
    Bytes5,
}

impl AddressWidth {
    /// The SETUP_AW code (1 - 3).
    pub const fn into_bits(self) -> u8 {
        match self {
            AddressWidth::Bytes3 => 1,
            AddressWidth::Bytes4 => 2,
            AddressWidth::Bytes5 => 3,
        }
    }

    /// Decode a SETUP_AW code. The reserved code `0` yields `None`.
    pub const fn from_bits(code: u8) -> Option<Self> {
        match code & 3 {
            1 => Some(AddressWidth::Bytes3),
            2 => Some(AddressWidth::Bytes4),
            3 => Some(AddressWidth::Bytes5),
            _ => None,
        }
    }

    /// The address width in bytes.
    pub const fn len(self) -> u8 {
        self.into_bits() + 2
    }

    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            3 => Some(AddressWidth::Bytes3),
            4 => Some(AddressWidth::Bytes4),
            5 => Some(AddressWidth::Bytes5),
            _ => None,
        }
    }
}

impl Display for AddressWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} bytes", self.len())
    }
}

/// The delay between automatic retransmissions, in steps of 250 microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetransmitDelay(u8);

impl RetransmitDelay {
    /// 250 microseconds
    pub const MIN: Self = Self(0);
    /// 4000 microseconds
    pub const MAX: Self = Self(15);

    /// Create a delay from its 4 bit SETUP_RETR code.
    pub const fn from_bits(code: u8) -> Option<Self> {
        if code > 15 {
            return None;
        }
        Some(Self(code))
    }

    pub const fn into_bits(self) -> u8 {
        self.0
    }

    /// The longest hardware delay that does not exceed `us`
    /// (never shorter than 250 microseconds).
    pub const fn from_us(us: u32) -> Self {
        let steps = us / 250;
        if steps > 16 {
            Self::MAX
        } else if steps == 0 {
            Self::MIN
        } else {
            Self(steps as u8 - 1)
        }
    }

    /// The delay in microseconds.
    pub const fn us(self) -> u16 {
        (self.0 as u16 + 1) * 250
    }
}

impl Display for RetransmitDelay {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} us", self.us())
    }
}

/// The possible states of a FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FifoState {
    /// Represent the state of a FIFO when it is full.
    Full,
    /// Represent the state of a FIFO when it is empty.
    Empty,
    /// Represent the state of a FIFO when it is not full but not empty either.
    Occupied,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FifoState::Empty => defmt::write!(fmt, "Empty"),
            FifoState::Full => defmt::write!(fmt, "Full"),
            FifoState::Occupied => defmt::write!(fmt, "Occupied"),
        }
    }
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FifoState::Empty => write!(f, "Empty"),
            FifoState::Full => write!(f, "Full"),
            FifoState::Occupied => write!(f, "Occupied"),
        }
    }
}

/// The operating states of the transceiver.
///
/// ```text
/// UNDEFINED -> POWER_DOWN <-> STANDBY_1 -> { STANDBY_2 | RX_MODE | TX_MODE }
///                                           STANDBY_2 <-> TX_MODE
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// The chip has not been touched since power-on.
    Undefined,
    PowerDown,
    Standby1,
    /// CE is high while the TX FIFO is empty.
    Standby2,
    RxMode,
    TxMode,
}

impl State {
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// A bitmask of the states reachable from `self` in one transition.
    pub(crate) const fn legal_targets(self) -> u8 {
        match self {
            State::Undefined => State::PowerDown.bit(),
            State::PowerDown => State::PowerDown.bit() | State::Standby1.bit(),
            State::Standby1 => {
                State::Standby1.bit()
                    | State::PowerDown.bit()
                    | State::Standby2.bit()
                    | State::RxMode.bit()
                    | State::TxMode.bit()
            }
            State::Standby2 => State::Standby2.bit() | State::TxMode.bit() | State::PowerDown.bit(),
            State::RxMode => State::RxMode.bit() | State::PowerDown.bit() | State::Standby1.bit(),
            State::TxMode => {
                State::TxMode.bit()
                    | State::PowerDown.bit()
                    | State::Standby1.bit()
                    | State::Standby2.bit()
            }
        }
    }

    /// Is `to` reachable from `self` in a single transition?
    pub const fn can_transition_to(self, to: State) -> bool {
        self.legal_targets() & to.bit() != 0
    }

    /// Configuration may only change while the radio is not transmitting.
    pub const fn is_configurable(self) -> bool {
        matches!(self, State::PowerDown | State::Standby1 | State::RxMode)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            State::Undefined => defmt::write!(fmt, "UNDEFINED"),
            State::PowerDown => defmt::write!(fmt, "POWER_DOWN"),
            State::Standby1 => defmt::write!(fmt, "STANDBY_1"),
            State::Standby2 => defmt::write!(fmt, "STANDBY_2"),
            State::RxMode => defmt::write!(fmt, "RX_MODE"),
            State::TxMode => defmt::write!(fmt, "TX_MODE"),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            State::Undefined => write!(f, "UNDEFINED"),
            State::PowerDown => write!(f, "POWER_DOWN"),
            State::Standby1 => write!(f, "STANDBY_1"),
            State::Standby2 => write!(f, "STANDBY_2"),
            State::RxMode => write!(f, "RX_MODE"),
            State::TxMode => write!(f, "TX_MODE"),
        }
    }
}

/// A snapshot of the STATUS register.
///
/// Every SPI transaction clocks this byte out first, so the driver always
/// holds the latest copy.
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if TX Data Failed (max retransmits reached).
    #[bits(1, access = RO)]
    pub tx_df: bool,

    /// The pipe that holds the payload at the top of the RX FIFO.
    /// `7` means the RX FIFO is empty.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    #[bits(1, access = RO)]
    pub tx_full: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// Is any of the three interrupt causes asserted?
    pub const fn any_irq(&self) -> bool {
        self.into_bits() & Self::IRQ_MASK != 0
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}
