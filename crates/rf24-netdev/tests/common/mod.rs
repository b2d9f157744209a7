//! A register-level model of the nRF24L01+ for driving the public API.
#![allow(dead_code)]

use core::convert::Infallible;
use std::{cell::RefCell, collections::VecDeque, rc::Rc, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType as PinErrorType, OutputPin},
    spi::{ErrorType as SpiErrorType, Operation, SpiDevice},
};
use rf24_netdev::radio::{prelude::IrqLine, RadioConfig, RF24};

const STATUS: usize = 0x07;
const RX_ADDR_P0: usize = 0x0A;
const RX_ADDR_P1: usize = 0x0B;
const TX_ADDR: usize = 0x10;
const FIFO_STATUS: usize = 0x17;

pub const RX_DR: u8 = 0x40;
pub const TX_DS: u8 = 0x20;
pub const MAX_RT: u8 = 0x10;

/// A queued TX payload and whether it asked for no acknowledgement.
#[derive(Clone, Debug, PartialEq)]
pub struct TxPayload {
    pub data: Vec<u8>,
    pub no_ack: bool,
}

#[derive(Default)]
pub struct Chip {
    pub regs: [u8; 0x1E],
    /// Multi-byte addresses as clocked in (LSByte first).
    pub addresses: [[u8; 5]; 3],
    pub rx_fifo: VecDeque<(u8, Vec<u8>)>,
    pub tx_fifo: VecDeque<TxPayload>,
    pub irq_flags: u8,
    pub ce: bool,
    /// Every byte on the bus reads back as zero.
    pub absent: bool,
    pub delay_ns: u64,
    pub irq_history: Vec<bool>,
}

impl Chip {
    fn status(&self) -> u8 {
        let pipe = self.rx_fifo.front().map_or(7, |(pipe, _)| *pipe);
        self.irq_flags | (pipe << 1) | (self.tx_fifo.len() >= 3) as u8
    }

    fn fifo_status(&self) -> u8 {
        let mut value = 0;
        if self.rx_fifo.is_empty() {
            value |= 1;
        }
        if self.rx_fifo.len() >= 3 {
            value |= 2;
        }
        if self.tx_fifo.is_empty() {
            value |= 0x10;
        }
        if self.tx_fifo.len() >= 3 {
            value |= 0x20;
        }
        value
    }

    fn address_slot(reg: usize) -> Option<usize> {
        match reg {
            RX_ADDR_P0 => Some(0),
            RX_ADDR_P1 => Some(1),
            TX_ADDR => Some(2),
            _ => None,
        }
    }

    fn read_register(&self, reg: usize, out: &mut [u8]) {
        if let Some(slot) = Self::address_slot(reg) {
            let len = out.len().min(5);
            out[..len].copy_from_slice(&self.addresses[slot][..len]);
            return;
        }
        let value = match reg {
            STATUS => self.status(),
            FIFO_STATUS => self.fifo_status(),
            _ => self.regs[reg],
        };
        out.iter_mut().for_each(|b| *b = value);
    }

    fn write_register(&mut self, reg: usize, data: &[u8]) {
        if let Some(slot) = Self::address_slot(reg) {
            self.addresses[slot] = [0; 5];
            self.addresses[slot][..data.len()].copy_from_slice(data);
            return;
        }
        match reg {
            STATUS => self.irq_flags &= !(data[0] & 0x70),
            _ => self.regs[reg] = data[0],
        }
    }

    fn execute(&mut self, buf: &mut [u8]) {
        if self.absent {
            buf.fill(0);
            return;
        }
        let command = buf[0];
        let status = self.status();
        let (_, data) = buf.split_at_mut(1);
        match command {
            0x00..=0x1F => self.read_register(command as usize, data),
            0x20..=0x3F => {
                let payload = data.to_vec();
                self.write_register((command & 0x1F) as usize, &payload);
            }
            0x60 => {
                let width = self.rx_fifo.front().map_or(0, |(_, p)| p.len() as u8);
                data.iter_mut().for_each(|b| *b = width);
            }
            0x61 => {
                if let Some((_, payload)) = self.rx_fifo.pop_front() {
                    for (dest, src) in data.iter_mut().zip(payload.iter()) {
                        *dest = *src;
                    }
                }
            }
            0xA0 | 0xB0 => {
                if self.tx_fifo.len() < 3 {
                    self.tx_fifo.push_back(TxPayload {
                        data: data.to_vec(),
                        no_ack: command == 0xB0,
                    });
                }
            }
            0xE1 => self.tx_fifo.clear(),
            0xE2 => self.rx_fifo.clear(),
            _ => (),
        }
        buf[0] = status;
    }

    /// The address of pipe 0 or 1 (or TX_ADDR with `2`), most significant byte first.
    pub fn address(&self, slot: usize) -> Vec<u8> {
        let width = self.regs[0x03] as usize + 2;
        self.addresses[slot][..width].iter().rev().copied().collect()
    }

    /// Put a payload on air: it leaves the TX FIFO and gets acknowledged.
    pub fn complete_tx(&mut self) -> Option<TxPayload> {
        let payload = self.tx_fifo.pop_front();
        self.irq_flags |= TX_DS;
        payload
    }

    /// No acknowledgement arrived; the payload stays in the TX FIFO.
    pub fn fail_tx(&mut self) {
        self.irq_flags |= MAX_RT;
    }

    pub fn inject_rx(&mut self, pipe: u8, payload: &[u8]) {
        self.rx_fifo.push_back((pipe, payload.to_vec()));
        self.irq_flags |= RX_DR;
    }
}

pub type Shared = Rc<RefCell<Chip>>;

pub struct SimSpi(pub Shared);
pub struct SimCe(pub Shared);
pub struct SimIrq(pub Shared);
pub struct SimDelay(pub Shared);

impl SpiErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter_mut() {
            if let Operation::TransferInPlace(buf) = op {
                self.0.borrow_mut().execute(buf);
            }
        }
        Ok(())
    }
}

impl PinErrorType for SimCe {
    type Error = Infallible;
}

impl OutputPin for SimCe {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().ce = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().ce = true;
        Ok(())
    }
}

impl IrqLine for SimIrq {
    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().irq_history.push(enabled);
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().delay_ns += ns as u64;
    }
}

pub type SimRadio = RF24<SimSpi, SimCe, SimIrq, SimDelay>;

pub fn sim_radio(config: RadioConfig) -> (SimRadio, Shared) {
    let chip = Shared::default();
    let radio = RF24::new(
        SimCe(chip.clone()),
        SimSpi(chip.clone()),
        SimIrq(chip.clone()),
        SimDelay(chip.clone()),
        config,
    );
    (radio, chip)
}
