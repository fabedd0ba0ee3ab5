//! A deterministic Huffman coder with a self-describing payload format.
//!
//! Compression counts symbol frequencies, builds a Huffman tree with a fixed
//! tie-break rule, derives a prefix-free code per symbol and packs the coded
//! symbols MSB-first behind a header that carries the tree itself. Decoding
//! therefore only needs the compressed bytes.
//!
//! ```
//! let input = b"Hello, World!";
//! let compressed = huffpack::compress(&input[..]).unwrap();
//! let restored: Vec<u8> = huffpack::decompress(&compressed).unwrap();
//! assert_eq!(&restored[..], &input[..]);
//! ```
//!
//! Identical input always yields byte-identical output.
#![no_std]
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Emits a `tracing` event when the `tracing` feature is enabled, and nothing otherwise.
macro_rules! vtrace {
    ($($x:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($x)*);
    }
}

/// Like [`vtrace`], at debug level.
macro_rules! vdebug {
    ($($x:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($x)*);
    }
}

pub mod decoding;
pub mod encoding;
pub mod huffman;
pub mod payload;
pub mod symbol;
#[cfg(test)]
mod tests;

pub use decoding::decompressor::{decompress, decompress_str, DecompressError};
pub use encoding::compressor::{compress, compress_str, compress_to_payload, CompressError};
pub use huffman::code_table::{Code, CodeTable};
pub use huffman::frequency::FrequencyTable;
pub use huffman::tree::{HuffmanNode, HuffmanTree};
pub use payload::CompressedPayload;
pub use symbol::Symbol;

/// Compresses and decompresses `data`, panicking if anything does not match.
///
/// Exported for the fuzz targets.
#[cfg(any(test, feature = "fuzz_exports"))]
pub fn round_trip(data: &[u8]) {
    let compressed = compress(data).unwrap();
    let again = compress(data).unwrap();
    assert_eq!(compressed, again, "compression is not deterministic");

    let decompressed: alloc::vec::Vec<u8> = decompress(&compressed).unwrap();
    assert_eq!(&decompressed[..], data);

    if let Ok(text) = core::str::from_utf8(data) {
        let compressed = compress_str(text).unwrap();
        assert_eq!(decompress_str(&compressed).unwrap(), text);
    }
}
