//! Packing frames into (and out of) the 32 byte hardware FIFO.
//!
//! The nRF24L01+ only puts the destination address on air. With
//! [`Framing::CompactHeader`], a one byte header and the source address are
//! prepended to the payload so that receivers learn who sent a frame:
//!
//! ```text
//! | preamble (1) | reserved (1) | dst width (3) | src width (3) | src address | payload |
//! ```
//!
//! [`Framing::Raw`] puts the payload on air unmodified.
//!
//! Frames handed to (and taken from) the network layer are laid out as
//! `[header][dst][src][payload]` or `[dst][payload]` respectively.

use bitfield_struct::bitfield;
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::AddressWidth;

/// The capacity of one FIFO slot.
pub const MAX_PAYLOAD_WIDTH: usize = 32;
pub const MIN_ADDRESS_WIDTH: usize = 3;
pub const MAX_ADDRESS_WIDTH: usize = 5;
/// Frames sent to this address never expect an acknowledgement.
pub const BROADCAST_ADDRESS: [u8; MAX_ADDRESS_WIDTH] = [0xFF; MAX_ADDRESS_WIDTH];
/// Placeholder for an address that is derived from the device's
/// locally unique identifier at initialization.
pub const AUTO_ADDRESS: [u8; MAX_ADDRESS_WIDTH] = [0; MAX_ADDRESS_WIDTH];

/// How addressing information travels with a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Prepend a header byte and the source address.
    CompactHeader,
    /// The payload goes on air as is.
    Raw,
}

/// Errors reported by the pure framing functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The frame does not fit in the available space.
    TooLarge,
    /// Missing preamble, or an address width outside of 3 - 5 bytes.
    Malformed,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FrameError::TooLarge => write!(f, "frame too large"),
            FrameError::Malformed => write!(f, "malformed frame"),
        }
    }
}

/// The compact header byte.
#[bitfield(u8, order = Msb)]
pub struct Header {
    /// Always set. Marks the first byte after static-width padding.
    pub preamble: bool,

    #[bits(1)]
    _reserved: u8,

    #[bits(3)]
    pub dst_width: u8,

    #[bits(3)]
    pub src_width: u8,
}

impl Header {
    pub const fn for_widths(dst_width: u8, src_width: u8) -> Self {
        Self::new()
            .with_preamble(true)
            .with_dst_width(dst_width)
            .with_src_width(src_width)
    }

    pub fn is_valid(&self) -> bool {
        self.preamble()
            && is_valid_width(self.dst_width() as usize)
            && is_valid_width(self.src_width() as usize)
    }
}

/// Is `len` an address width the hardware supports?
pub fn is_valid_width(len: usize) -> bool {
    (MIN_ADDRESS_WIDTH..=MAX_ADDRESS_WIDTH).contains(&len)
}

/// A frame borrowed from somewhere else; nothing is copied until
/// [`Frame::encode()`] or [`Frame::write_to()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub dst: &'a [u8],
    /// Empty when unknown (raw framing) or when the device's own
    /// address shall be used.
    pub src: &'a [u8],
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    pub const fn new(dst: &'a [u8], src: &'a [u8], payload: &'a [u8]) -> Self {
        Self { dst, src, payload }
    }

    pub fn is_broadcast(&self) -> bool {
        !self.dst.is_empty() && self.dst.iter().all(|&b| b == 0xFF)
    }

    /// Pack this frame into a TX FIFO image and return the number of bytes to
    /// write.
    ///
    /// With a `static_width` (ShockBurst pipes have a fixed width), the result
    /// is exactly that wide: compact frames are left-padded with zeros so the
    /// payload ends at the last byte, raw frames are right-padded.
    pub fn encode(
        &self,
        framing: Framing,
        static_width: Option<u8>,
        out: &mut [u8; MAX_PAYLOAD_WIDTH],
    ) -> Result<usize, FrameError> {
        let width = static_width.map_or(MAX_PAYLOAD_WIDTH, |w| (w as usize).min(MAX_PAYLOAD_WIDTH));
        match framing {
            Framing::CompactHeader => {
                if !is_valid_width(self.dst.len()) || !is_valid_width(self.src.len()) {
                    return Err(FrameError::Malformed);
                }
                let len = 1 + self.src.len() + self.payload.len();
                if len > width {
                    return Err(FrameError::TooLarge);
                }
                let start = if static_width.is_some() { width - len } else { 0 };
                out[..start].fill(0);
                out[start] = Header::for_widths(self.dst.len() as u8, self.src.len() as u8).into_bits();
                let src_end = start + 1 + self.src.len();
                out[start + 1..src_end].copy_from_slice(self.src);
                out[src_end..start + len].copy_from_slice(self.payload);
                Ok(start + len)
            }
            Framing::Raw => {
                let len = self.payload.len();
                if len > width {
                    return Err(FrameError::TooLarge);
                }
                out[..len].copy_from_slice(self.payload);
                if static_width.is_some() {
                    out[len..width].fill(0);
                    return Ok(width);
                }
                Ok(len)
            }
        }
    }

    /// Unpack the content of an RX FIFO slot.
    ///
    /// `dst` is the address of the pipe that received `raw`. If `padded`,
    /// any bytes in front of the compact header are skipped.
    pub fn decode(
        framing: Framing,
        dst: &'a [u8],
        raw: &'a [u8],
        padded: bool,
    ) -> Result<Self, FrameError> {
        if framing == Framing::Raw {
            return Ok(Self::new(dst, &[], raw));
        }
        let start = if padded {
            raw.iter()
                .position(|&b| Header::from_bits(b).preamble())
                .ok_or(FrameError::Malformed)?
        } else {
            0
        };
        let header = Header::from_bits(*raw.get(start).ok_or(FrameError::Malformed)?);
        if !header.is_valid() {
            return Err(FrameError::Malformed);
        }
        let src_end = start + 1 + header.src_width() as usize;
        if src_end > raw.len() {
            return Err(FrameError::Malformed);
        }
        Ok(Self::new(dst, &raw[start + 1..src_end], &raw[src_end..]))
    }

    /// The size of this frame as laid out by [`Frame::write_to()`].
    pub fn size(&self, framing: Framing) -> usize {
        match framing {
            Framing::CompactHeader => 1 + self.dst.len() + self.src.len() + self.payload.len(),
            Framing::Raw => self.dst.len() + self.payload.len(),
        }
    }

    /// Lay this frame out for the network layer.
    pub fn write_to(&self, framing: Framing, out: &mut [u8]) -> Result<usize, FrameError> {
        let size = self.size(framing);
        if out.len() < size {
            return Err(FrameError::TooLarge);
        }
        let mut offset = 0;
        if framing == Framing::CompactHeader {
            out[0] = Header::for_widths(self.dst.len() as u8, self.src.len() as u8).into_bits();
            offset = 1;
        }
        for part in [self.dst, self.src, self.payload] {
            out[offset..offset + part.len()].copy_from_slice(part);
            offset += part.len();
        }
        Ok(size)
    }

    /// The inverse of [`Frame::write_to()`].
    ///
    /// Raw frames carry no header, so the destination width must be known.
    pub fn parse(framing: Framing, width: AddressWidth, buf: &'a [u8]) -> Result<Self, FrameError> {
        match framing {
            Framing::Raw => {
                let aw = width.len() as usize;
                if buf.len() < aw {
                    return Err(FrameError::Malformed);
                }
                Ok(Self::new(&buf[..aw], &[], &buf[aw..]))
            }
            Framing::CompactHeader => {
                let header = Header::from_bits(*buf.first().ok_or(FrameError::Malformed)?);
                if !header.is_valid() {
                    return Err(FrameError::Malformed);
                }
                let dst_end = 1 + header.dst_width() as usize;
                let src_end = dst_end + header.src_width() as usize;
                if src_end > buf.len() {
                    return Err(FrameError::Malformed);
                }
                Ok(Self::new(
                    &buf[1..dst_end],
                    &buf[dst_end..src_end],
                    &buf[src_end..],
                ))
            }
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    use super::{
        Frame, FrameError, Framing, Header, BROADCAST_ADDRESS, MAX_PAYLOAD_WIDTH,
    };
    use crate::AddressWidth;

    const DST: [u8; 5] = [0xE7, 0xE7, 0xE7, 0xE7, 0xE7];
    const SRC: [u8; 5] = [0xC2, 0xC2, 0xC2, 0xC2, 0x01];

    #[test]
    fn header_bits() {
        let header = Header::for_widths(5, 3);
        assert_eq!(header.into_bits(), 0xAB);
        assert!(header.is_valid());
        assert!(!Header::from_bits(0x2B).is_valid());
        assert!(!Header::from_bits(0xAA).is_valid());
    }

    #[test]
    fn compact_round_trip() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        for len in 3..=5 {
            let src = &SRC[..len];
            let p = &payload[..(MAX_PAYLOAD_WIDTH - 1 - len).min(payload.len())];
            let frame = Frame::new(&DST, src, p);
            let mut out = [0u8; MAX_PAYLOAD_WIDTH];
            let n = frame.encode(Framing::CompactHeader, None, &mut out).unwrap();
            assert_eq!(n, 1 + len + p.len());
            let decoded = Frame::decode(Framing::CompactHeader, &DST, &out[..n], false).unwrap();
            assert_eq!(decoded.src, src);
            assert_eq!(decoded.payload, p);
        }
    }

    #[test]
    fn compact_fills_fifo() {
        let payload = [0x55u8; 26];
        let frame = Frame::new(&DST, &SRC, &payload);
        let mut out = [0u8; MAX_PAYLOAD_WIDTH];
        assert_eq!(frame.encode(Framing::CompactHeader, None, &mut out), Ok(32));
        let frame = Frame::new(&DST, &SRC, &[0x55u8; 27]);
        assert_eq!(
            frame.encode(Framing::CompactHeader, None, &mut out),
            Err(FrameError::TooLarge)
        );
    }

    #[test]
    fn compact_static_width_padding() {
        let frame = Frame::new(&DST[..3], &SRC[..3], b"hi");
        let mut out = [0xAAu8; MAX_PAYLOAD_WIDTH];
        let n = frame
            .encode(Framing::CompactHeader, Some(32), &mut out)
            .unwrap();
        assert_eq!(n, 32);
        assert!(out[..26].iter().all(|&b| b == 0));
        assert_eq!(out[26], Header::for_widths(3, 3).into_bits());
        assert_eq!(&out[27..30], &SRC[..3]);
        assert_eq!(&out[30..], b"hi");

        let decoded = Frame::decode(Framing::CompactHeader, &DST[..3], &out, true).unwrap();
        assert_eq!(decoded.src, &SRC[..3]);
        assert_eq!(decoded.payload, b"hi");

        // padding is not skipped unless asked to
        assert_eq!(
            Frame::decode(Framing::CompactHeader, &DST[..3], &out, false),
            Err(FrameError::Malformed)
        );
    }

    #[test]
    fn compact_rejects_bad_widths() {
        let mut out = [0u8; MAX_PAYLOAD_WIDTH];
        let frame = Frame::new(&DST[..2], &SRC, b"x");
        assert_eq!(
            frame.encode(Framing::CompactHeader, None, &mut out),
            Err(FrameError::Malformed)
        );
        let frame = Frame::new(&DST, &[], b"x");
        assert_eq!(
            frame.encode(Framing::CompactHeader, None, &mut out),
            Err(FrameError::Malformed)
        );
        // src width of 6 in the header
        let raw = [0xAE, 1, 2, 3, 4, 5, 6];
        assert_eq!(
            Frame::decode(Framing::CompactHeader, &DST, &raw, false),
            Err(FrameError::Malformed)
        );
        // header claims more source bytes than were received
        let raw = [Header::for_widths(5, 5).into_bits(), 1, 2];
        assert_eq!(
            Frame::decode(Framing::CompactHeader, &DST, &raw, false),
            Err(FrameError::Malformed)
        );
        assert_eq!(
            Frame::decode(Framing::CompactHeader, &DST, &[0u8; 32], true),
            Err(FrameError::Malformed)
        );
    }

    #[test]
    fn raw_framing() {
        let mut out = [0xAAu8; MAX_PAYLOAD_WIDTH];
        let frame = Frame::new(&DST, &[], b"hello");
        assert_eq!(frame.encode(Framing::Raw, None, &mut out), Ok(5));
        assert_eq!(frame.encode(Framing::Raw, Some(8), &mut out), Ok(8));
        assert_eq!(&out[..8], b"hello\0\0\0");
        assert_eq!(
            frame.encode(Framing::Raw, Some(4), &mut out),
            Err(FrameError::TooLarge)
        );
        let decoded = Frame::decode(Framing::Raw, &DST, b"hello", false).unwrap();
        assert_eq!(decoded, Frame::new(&DST, &[], b"hello"));
    }

    #[test]
    fn network_layout() {
        let frame = Frame::new(&DST[..4], &SRC[..3], b"abc");
        let mut buf = [0u8; 16];
        assert_eq!(frame.size(Framing::CompactHeader), 11);
        assert_eq!(frame.write_to(Framing::CompactHeader, &mut buf), Ok(11));
        assert_eq!(buf[0], Header::for_widths(4, 3).into_bits());
        let parsed = Frame::parse(Framing::CompactHeader, AddressWidth::Bytes5, &buf[..11]).unwrap();
        assert_eq!(parsed, frame);
        assert_eq!(
            frame.write_to(Framing::CompactHeader, &mut buf[..10]),
            Err(FrameError::TooLarge)
        );

        let frame = Frame::new(&DST, &[], b"abc");
        assert_eq!(frame.write_to(Framing::Raw, &mut buf), Ok(8));
        let parsed = Frame::parse(Framing::Raw, AddressWidth::Bytes5, &buf[..8]).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn broadcast() {
        assert!(Frame::new(&BROADCAST_ADDRESS, &[], b"x").is_broadcast());
        assert!(Frame::new(&BROADCAST_ADDRESS[..3], &[], b"x").is_broadcast());
        assert!(!Frame::new(&DST, &[], b"x").is_broadcast());
        assert!(!Frame::new(&[], &[], b"x").is_broadcast());
    }
}
