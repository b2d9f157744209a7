#![doc(
    html_logo_url = "https://raw.githubusercontent.com/nRF24/rf24-rs/main/docs/src/images/logo-square.png"
)]
#![doc(html_favicon_url = "https://github.com/nRF24/rf24-rs/raw/main/docs/src/images/favicon.ico")]
#![doc = include_str!("../README.md")]
//!
//! ## Network device API
//!
//! - [`RF24::new()`](fn@crate::radio::RF24::new)
//! - [`RF24::init()`](radio/struct.RF24.html#method.init)
//! - [`RF24::send()`](radio/struct.RF24.html#method.send)
//! - [`RF24::recv()`](radio/struct.RF24.html#method.recv)
//! - [`RF24::receive()`](radio/struct.RF24.html#method.receive)
//! - [`RF24::drop_frame()`](radio/struct.RF24.html#method.drop_frame)
//! - [`RF24::frame_size_estimate()`](radio/struct.RF24.html#method.frame_size_estimate)
//! - [`RF24::on_interrupt()`](fn@crate::radio::RF24::on_interrupt)
//! - [`RF24::isr()`](radio/struct.RF24.html#method.isr)
//! - [`RF24::get()`](radio/struct.RF24.html#method.get)
//! - [`RF24::set()`](radio/struct.RF24.html#method.set)
//!
//! ## Radio API
//!
//! - [`RF24::get_state()`](radio/struct.RF24.html#method.get_state)
//! - [`RF24::set_state()`](radio/struct.RF24.html#method.set_state)
//! - [`RF24::set_channel()`](radio/struct.RF24.html#method.set_channel)
//! - [`RF24::set_rx_address()`](radio/struct.RF24.html#method.set_rx_address)
//! - [`RF24::close_rx_pipe()`](fn@crate::radio::RF24::close_rx_pipe)
//! - [`RF24::set_payload_width()`](radio/struct.RF24.html#method.set_payload_width)
//! - [`RF24::set_max_retransmits()`](radio/struct.RF24.html#method.set_max_retransmits)
//! - [`RF24::set_retransmit_delay()`](radio/struct.RF24.html#method.set_retransmit_delay)
//! - [`RF24::set_crc_length()`](radio/struct.RF24.html#method.set_crc_length)
//! - [`RF24::set_data_rate()`](radio/struct.RF24.html#method.set_data_rate)
//! - [`RF24::set_tx_power()`](radio/struct.RF24.html#method.set_tx_power)
//! - [`RF24::get_fifo_state()`](radio/struct.RF24.html#method.get_fifo_state)
//! - [`RF24::flush_rx()`](radio/struct.RF24.html#method.flush_rx)
//! - [`RF24::flush_tx()`](radio/struct.RF24.html#method.flush_tx)
//! - [`RF24::rpd()`](fn@crate::radio::RF24::rpd)
//! - [`RF24::observe_tx()`](fn@crate::radio::RF24::observe_tx)
//!
#![no_std]

mod types;
pub use types::{
    AddressWidth, CrcLength, DataRate, FifoState, Protocol, RetransmitDelay, State, StatusFlags,
    TxPower,
};
pub mod conversion;
pub mod frame;
pub mod netdev;
pub mod radio;
