//! Turns a symbol sequence into the packed bit payload.

use super::bit_writer::BitWriter;
use crate::huffman::code_table::CodeTable;
use crate::symbol::Symbol;
use alloc::vec::Vec;

/// The concatenated codes of an input, packed MSB-first into bytes.
///
/// `len` is the exact number of meaningful bits. The bits after it in the
/// last byte are zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBits {
    bytes: Vec<u8>,
    len: usize,
}

impl EncodedBits {
    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The bit at `idx`, counting from the first bit written.
    pub fn bit(&self, idx: usize) -> bool {
        assert!(idx < self.len);
        (self.bytes[idx / 8] >> (7 - idx % 8)) & 1 == 1
    }
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The input contains a symbol the code table has no code for.
    MissingCode { position: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::MissingCode { position } => {
                write!(
                    f,
                    "Symbol at position {} has no code in the code table",
                    position,
                )
            }
        }
    }
}

/// Concatenates the code of every symbol in input order.
pub fn encode<S: Symbol>(symbols: &[S], codes: &CodeTable<S>) -> Result<EncodedBits, EncodeError> {
    let mut writer = BitWriter::with_capacity(symbols.len() / 2);
    for (position, symbol) in symbols.iter().enumerate() {
        let code = codes
            .get(symbol)
            .ok_or(EncodeError::MissingCode { position })?;
        writer.write_bits(code.bits(), usize::from(code.len()));
    }
    let len = writer.bits_written();
    Ok(EncodedBits {
        bytes: writer.dump(),
        len,
    })
}

/// Packs an explicit bit sequence MSB-first, zero-padding the last byte.
pub fn pack(bits: &[bool]) -> EncodedBits {
    let mut writer = BitWriter::with_capacity((bits.len() + 7) / 8);
    for &bit in bits {
        writer.write_bit(bit);
    }
    EncodedBits {
        bytes: writer.dump(),
        len: bits.len(),
    }
}
