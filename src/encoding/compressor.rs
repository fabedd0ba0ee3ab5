//! The compression entry points.

use super::symbol_encoder::{encode, EncodeError};
use crate::huffman::frequency::analyze;
use crate::huffman::tree::build;
use crate::payload::CompressedPayload;
use crate::symbol::Symbol;
use alloc::vec::Vec;
use core::convert::TryFrom;

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompressError {
    /// The packed symbols need more bits than the 32 bit length field can describe.
    InputTooLarge { bits: usize },
    EncodeError(EncodeError),
}

#[cfg(feature = "std")]
impl std::error::Error for CompressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompressError::EncodeError(source) => Some(source),
            _ => None,
        }
    }
}

impl core::fmt::Display for CompressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CompressError::InputTooLarge { bits } => {
                write!(
                    f,
                    "Input needs at least {} bits, the payload can describe at most {}",
                    bits,
                    u32::MAX,
                )
            }
            CompressError::EncodeError(e) => write!(f, "{}", e),
        }
    }
}

impl From<EncodeError> for CompressError {
    fn from(val: EncodeError) -> Self {
        Self::EncodeError(val)
    }
}

/// Compresses `input` into its structured payload.
///
/// ```
/// let payload = huffpack::compress_to_payload(b"abracadabra").unwrap();
/// let codes = payload.tree().unwrap().codes();
/// assert_eq!(codes.get(&b'a').unwrap().len(), 1);
/// assert_eq!(payload.header().bit_length, 23);
/// ```
pub fn compress_to_payload<S: Symbol>(input: &[S]) -> Result<CompressedPayload<S>, CompressError> {
    // every symbol takes at least one bit
    if input.len() > u32::MAX as usize {
        return Err(CompressError::InputTooLarge { bits: input.len() });
    }

    let frequencies = analyze(input);
    let tree = match build(&frequencies) {
        Some(tree) => tree,
        None => {
            vdebug!("input is empty, writing the empty marker");
            return Ok(CompressedPayload::empty());
        }
    };
    let codes = tree.codes();
    let bits = encode(input, &codes)?;
    let bit_length =
        u32::try_from(bits.len()).map_err(|_| CompressError::InputTooLarge { bits: bits.len() })?;

    vdebug!(
        "compressed {} symbols ({} distinct, longest code {} bits) into {} bits",
        input.len(),
        frequencies.len(),
        tree.depth(),
        bit_length
    );
    Ok(CompressedPayload::encoded(tree, bit_length, bits))
}

/// Compresses `input` into the self-describing byte format.
///
/// The output only depends on the input: compressing the same symbols twice
/// gives identical bytes.
pub fn compress<S: Symbol>(input: &[S]) -> Result<Vec<u8>, CompressError> {
    compress_to_payload(input).map(|payload| payload.to_bytes())
}

/// Compresses the characters of `text`. Decompress with [`crate::decompress_str`].
pub fn compress_str(text: &str) -> Result<Vec<u8>, CompressError> {
    let chars: Vec<char> = text.chars().collect();
    compress(&chars)
}
