//! The unit of compression.
//!
//! Every symbol type has a fixed width on the wire, so a serialized tree leaf
//! is always `1 + Symbol::BITS` bits long. The width is a property of the type,
//! the payload does not record it: data compressed as `u16` must be
//! decompressed as `u16`.

use core::convert::TryFrom;
use core::fmt::Debug;

/// A value that can be Huffman coded.
///
/// `Ord` is required so frequency tables and code tables have a well defined
/// key order; tree construction itself breaks ties by first occurrence, not by
/// symbol value.
pub trait Symbol: Copy + Ord + Debug {
    /// Serialized width in bits, between 1 and 32.
    const BITS: u32;

    /// The raw value, using at most the lowest [`Symbol::BITS`] bits.
    fn to_bits(self) -> u32;

    /// Reconstructs a symbol from `BITS` raw bits. Returns `None` if the bits
    /// do not describe a valid value of this type.
    fn from_bits(raw: u32) -> Option<Self>;
}

impl Symbol for u8 {
    const BITS: u32 = 8;

    fn to_bits(self) -> u32 {
        u32::from(self)
    }

    fn from_bits(raw: u32) -> Option<Self> {
        u8::try_from(raw).ok()
    }
}

impl Symbol for u16 {
    const BITS: u32 = 16;

    fn to_bits(self) -> u32 {
        u32::from(self)
    }

    fn from_bits(raw: u32) -> Option<Self> {
        u16::try_from(raw).ok()
    }
}

impl Symbol for u32 {
    const BITS: u32 = 32;

    fn to_bits(self) -> u32 {
        self
    }

    fn from_bits(raw: u32) -> Option<Self> {
        Some(raw)
    }
}

/// Unicode scalar values fit into 21 bits (max `0x10FFFF`).
impl Symbol for char {
    const BITS: u32 = 21;

    fn to_bits(self) -> u32 {
        u32::from(self)
    }

    fn from_bits(raw: u32) -> Option<Self> {
        char::from_u32(raw)
    }
}
