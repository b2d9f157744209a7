//! Lookup tables and unit conversions that do not belong to a single register.

use crate::{frame::MAX_PAYLOAD_WIDTH, radio::RadioConfig, Protocol};

/// The number of virtual channels exposed to the network layer.
pub const NUM_CHANNELS: u8 = 16;

/// Virtual channel index to RF channel (MHz offset from 2400 MHz).
///
/// Neighbouring channels are 8 MHz apart, which leaves enough room for
/// the 2 MHz wide signal at 2 Mbps.
pub const CHANNEL_MAP: [u8; NUM_CHANNELS as usize] = [
    2, 10, 18, 26, 34, 42, 50, 58, 66, 74, 82, 90, 98, 106, 114, 122,
];

/// Translate a virtual channel index into the value written to RF_CH.
pub const fn rf_channel(index: u8) -> Option<u8> {
    if index >= NUM_CHANNELS {
        return None;
    }
    Some(CHANNEL_MAP[index as usize])
}

/// Find the virtual channel index of an RF_CH value.
pub fn channel_index(rf_channel: u8) -> Option<u8> {
    CHANNEL_MAP
        .iter()
        .position(|&ch| ch == rf_channel)
        .map(|index| index as u8)
}

/// The frequency in MHz of a virtual channel index.
pub const fn channel_frequency_mhz(index: u8) -> Option<u16> {
    match rf_channel(index) {
        Some(ch) => Some(2400 + ch as u16),
        None => None,
    }
}

/// The time (in microseconds) one packet with `payload_len` bytes
/// occupies the air, rounded up.
///
/// A packet consists of a 1 byte preamble, the address, the payload and
/// the CRC. Enhanced ShockBurst additionally sends a 9 bit packet control
/// field (6 bit length, 2 bit PID, 1 bit NO_ACK).
pub fn air_time_us(config: &RadioConfig, payload_len: u8) -> u32 {
    let payload_len = payload_len.min(MAX_PAYLOAD_WIDTH as u8) as u32;
    let mut bits = 8 * (1 + config.address_width().len() as u32 + payload_len);
    bits += 8 * config.crc_length().len() as u32;
    if config.protocol() == Protocol::Esb {
        bits += 9;
    }
    // kbps is bits per millisecond
    (bits * 1000).div_ceil(config.data_rate().kbps())
}
