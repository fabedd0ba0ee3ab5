//! The decompression entry points.

use super::symbol_decoder::DecodeError;
use crate::huffman::tree_serializer::TreeDecodeError;
use crate::payload::{CompressedPayload, PayloadHeaderError};
use crate::symbol::Symbol;
use alloc::string::String;
use alloc::vec::Vec;

/// Everything that can be wrong with a compressed stream.
///
/// All variants mean the input is malformed, see [`DecompressError::is_malformed`].
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecompressError {
    PayloadHeaderError(PayloadHeaderError),
    TreeDecodeError(TreeDecodeError),
    DecodeError(DecodeError),
}

impl DecompressError {
    /// True if the bytes are not a valid payload for the requested symbol type.
    pub fn is_malformed(&self) -> bool {
        match self {
            DecompressError::PayloadHeaderError(_)
            | DecompressError::TreeDecodeError(_)
            | DecompressError::DecodeError(_) => true,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecompressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecompressError::PayloadHeaderError(source) => Some(source),
            DecompressError::TreeDecodeError(source) => Some(source),
            DecompressError::DecodeError(source) => Some(source),
        }
    }
}

impl core::fmt::Display for DecompressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecompressError::PayloadHeaderError(e) => {
                write!(f, "Malformed stream, bad header: {}", e)
            }
            DecompressError::TreeDecodeError(e) => {
                write!(f, "Malformed stream, bad tree: {}", e)
            }
            DecompressError::DecodeError(e) => {
                write!(f, "Malformed stream, bad payload: {}", e)
            }
        }
    }
}

impl From<PayloadHeaderError> for DecompressError {
    fn from(val: PayloadHeaderError) -> Self {
        Self::PayloadHeaderError(val)
    }
}

impl From<TreeDecodeError> for DecompressError {
    fn from(val: TreeDecodeError) -> Self {
        Self::TreeDecodeError(val)
    }
}

impl From<DecodeError> for DecompressError {
    fn from(val: DecodeError) -> Self {
        Self::DecodeError(val)
    }
}

/// Restores the symbols from bytes produced by [`crate::compress`].
///
/// `S` must be the symbol type the data was compressed with, the format
/// does not record it. The whole header is validated before any symbol is
/// decoded, and on error nothing is returned.
pub fn decompress<S: Symbol>(bytes: &[u8]) -> Result<Vec<S>, DecompressError> {
    let payload = CompressedPayload::<S>::from_bytes(bytes)?;
    let output = payload.decode()?;
    vdebug!(
        "decompressed {} bytes into {} symbols",
        bytes.len(),
        output.len()
    );
    Ok(output)
}

/// Restores text compressed with [`crate::compress_str`].
pub fn decompress_str(bytes: &[u8]) -> Result<String, DecompressError> {
    let chars: Vec<char> = decompress(bytes)?;
    Ok(chars.into_iter().collect())
}
