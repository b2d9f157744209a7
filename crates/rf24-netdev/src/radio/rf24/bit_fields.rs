use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, TxPower};

#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// Keep the "RX Data Ready" event off the IRQ pin.
    pub mask_rx_dr: bool,

    /// Keep the "TX Data Sent" event off the IRQ pin.
    pub mask_tx_ds: bool,

    /// Keep the "TX Data Fail" event off the IRQ pin.
    pub mask_max_rt: bool,

    #[bits(2, access = None)]
    crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits())
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !CrcLength::MASK | length.into_bits();
        Self::from_bits(new_val)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4)]
    pub arc: u8,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    pub cont_wave: bool,

    #[bits(1)]
    _reserved: u8,

    #[bits(1, access = None)]
    rf_dr_low: bool,

    pub pll_lock: bool,

    #[bits(1, access = None)]
    rf_dr_high: bool,

    #[bits(2, access = None)]
    tx_power: u8,

    #[bits(1)]
    _obsolete: u8,
}

impl RfSetup {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self::from_bits(self.into_bits() & !DataRate::MASK | data_rate.into_bits())
    }

    pub const fn tx_power(&self) -> TxPower {
        TxPower::from_bits(self.into_bits())
    }

    pub fn with_tx_power(self, level: TxPower) -> Self {
        Self::from_bits(self.into_bits() & !TxPower::MASK | level.into_bits())
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct FifoStatus {
    #[bits(1)]
    _padding: u8,

    pub tx_reuse: bool,

    pub tx_full: bool,

    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    pub rx_full: bool,

    pub rx_empty: bool,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct ObserveTx {
    /// Lost packets since the last write to RF_CH (saturates at 15).
    #[bits(4)]
    pub plos_cnt: u8,

    /// Retransmissions of the current (or last) packet.
    #[bits(4)]
    pub arc_cnt: u8,
}
