//! The self-describing compressed format.
//!
//! ```text
//! byte 0        flag: CONTENT_FLAG or EMPTY_FLAG
//! bytes 1..5    bit length of the packed symbols, u32 big-endian, at least 1
//! bytes 5..     tree description, see `huffman::tree_serializer`
//! rest          packed symbols, exactly ceil(bit length / 8) bytes
//! ```
//!
//! Empty input is the single byte [`EMPTY_FLAG`] and nothing else.

use crate::decoding::decompressor::DecompressError;
use crate::decoding::symbol_decoder;
use crate::encoding::symbol_encoder::EncodedBits;
use crate::huffman::tree::HuffmanTree;
use crate::huffman::tree_serializer;
use crate::symbol::Symbol;
use alloc::vec::Vec;

/// Marks a payload that carries a tree and packed symbols.
pub const CONTENT_FLAG: u8 = 0;
/// Marks the payload of an empty input.
pub const EMPTY_FLAG: u8 = 1;
/// Size of the flag and the bit length field.
pub const HEADER_SIZE: usize = 5;

/// The fixed fields at the start of every payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    pub empty: bool,
    /// Number of meaningful bits in the packed symbols, zero for empty input.
    pub bit_length: u32,
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadHeaderError {
    MissingFlag,
    BadFlag { flag: u8 },
    TrailingBytesAfterEmpty { count: usize },
    MissingBitLength { got: usize },
    ZeroBitLength,
    PayloadSizeMismatch { expected: usize, got: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for PayloadHeaderError {}

impl core::fmt::Display for PayloadHeaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PayloadHeaderError::MissingFlag => write!(f, "Input is empty, expected at least the flag byte"),
            PayloadHeaderError::BadFlag { flag } => {
                write!(
                    f,
                    "Invalid flag byte: 0x{:02X}, expected 0x{:02X} or 0x{:02X}",
                    flag, CONTENT_FLAG, EMPTY_FLAG,
                )
            }
            PayloadHeaderError::TrailingBytesAfterEmpty { count } => {
                write!(f, "Found {} bytes after the empty marker", count)
            }
            PayloadHeaderError::MissingBitLength { got } => {
                write!(f, "Bit length field is truncated: got {} of 4 bytes", got)
            }
            PayloadHeaderError::ZeroBitLength => {
                write!(f, "Bit length is zero but the payload is not marked as empty")
            }
            PayloadHeaderError::PayloadSizeMismatch { expected, got } => {
                write!(
                    f,
                    "Packed symbols should take {} bytes according to the bit length, found {}",
                    expected, got,
                )
            }
        }
    }
}

impl PayloadHeader {
    /// Parses the flag and the bit length field.
    ///
    /// Returns the header and how many bytes it used. For the empty marker
    /// this also checks that nothing follows it.
    pub fn read(source: &[u8]) -> Result<(PayloadHeader, usize), PayloadHeaderError> {
        let flag = *source.first().ok_or(PayloadHeaderError::MissingFlag)?;
        match flag {
            EMPTY_FLAG => {
                if source.len() > 1 {
                    return Err(PayloadHeaderError::TrailingBytesAfterEmpty {
                        count: source.len() - 1,
                    });
                }
                let header = PayloadHeader {
                    empty: true,
                    bit_length: 0,
                };
                Ok((header, 1))
            }
            CONTENT_FLAG => {
                if source.len() < HEADER_SIZE {
                    return Err(PayloadHeaderError::MissingBitLength {
                        got: source.len() - 1,
                    });
                }
                let bit_length =
                    u32::from_be_bytes([source[1], source[2], source[3], source[4]]);
                if bit_length == 0 {
                    return Err(PayloadHeaderError::ZeroBitLength);
                }
                let header = PayloadHeader {
                    empty: false,
                    bit_length,
                };
                Ok((header, HEADER_SIZE))
            }
            flag => Err(PayloadHeaderError::BadFlag { flag }),
        }
    }

    /// Size of the packed symbols in bytes.
    pub fn payload_size(&self) -> usize {
        (self.bit_length as usize).div_ceil(8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Content<S: Symbol> {
    tree: HuffmanTree<S>,
    bit_length: u32,
    packed: Vec<u8>,
}

/// A parsed or freshly built payload.
///
/// Built by [`crate::compress_to_payload`] or parsed with
/// [`CompressedPayload::from_bytes`]. Either way the tree, bit length and
/// packed bytes agree with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPayload<S: Symbol> {
    content: Option<Content<S>>,
}

impl<S: Symbol> CompressedPayload<S> {
    pub(crate) fn empty() -> Self {
        CompressedPayload { content: None }
    }

    /// `bits` must be non-empty and its length must fit a u32.
    pub(crate) fn encoded(tree: HuffmanTree<S>, bit_length: u32, bits: EncodedBits) -> Self {
        debug_assert_eq!(bits.len(), bit_length as usize);
        debug_assert!(bit_length > 0);
        CompressedPayload {
            content: Some(Content {
                tree,
                bit_length,
                packed: bits.into_bytes(),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn header(&self) -> PayloadHeader {
        match &self.content {
            None => PayloadHeader {
                empty: true,
                bit_length: 0,
            },
            Some(content) => PayloadHeader {
                empty: false,
                bit_length: content.bit_length,
            },
        }
    }

    pub fn tree(&self) -> Option<&HuffmanTree<S>> {
        self.content.as_ref().map(|content| &content.tree)
    }

    /// The packed symbols, including the zero padding of the last byte.
    pub fn packed(&self) -> &[u8] {
        match &self.content {
            None => &[],
            Some(content) => &content.packed,
        }
    }

    /// Writes the payload in the format described in the module docs.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content = match &self.content {
            None => return alloc::vec![EMPTY_FLAG],
            Some(content) => content,
        };

        let tree = tree_serializer::serialize(&content.tree);
        let mut output = Vec::with_capacity(HEADER_SIZE + tree.len() + content.packed.len());
        output.push(CONTENT_FLAG);
        output.extend_from_slice(&content.bit_length.to_be_bytes());
        output.extend_from_slice(&tree);
        output.extend_from_slice(&content.packed);
        output
    }

    /// Parses and validates a complete payload.
    ///
    /// Everything except the packed bits themselves is checked here: the
    /// header fields, the tree, and that the packed symbols take exactly the
    /// number of bytes the bit length announces.
    pub fn from_bytes(source: &[u8]) -> Result<Self, DecompressError> {
        let (header, header_size) = PayloadHeader::read(source)?;
        if header.empty {
            return Ok(Self::empty());
        }

        let rest = &source[header_size..];
        let (tree, tree_size) = tree_serializer::deserialize::<S>(rest)?;
        let packed = &rest[tree_size..];
        if packed.len() != header.payload_size() {
            return Err(PayloadHeaderError::PayloadSizeMismatch {
                expected: header.payload_size(),
                got: packed.len(),
            }
            .into());
        }
        vtrace!(
            "parsed payload: {} bits, tree of {} bytes, {} packed bytes",
            header.bit_length,
            tree_size,
            packed.len()
        );

        Ok(CompressedPayload {
            content: Some(Content {
                tree,
                bit_length: header.bit_length,
                packed: packed.to_vec(),
            }),
        })
    }

    /// Decodes the packed symbols. Returns all of them or an error.
    pub fn decode(&self) -> Result<Vec<S>, DecompressError> {
        match &self.content {
            None => Ok(Vec::new()),
            Some(content) => Ok(symbol_decoder::decode(
                &content.packed,
                content.bit_length as usize,
                &content.tree,
            )?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompressedPayload, PayloadHeader, PayloadHeaderError, HEADER_SIZE};
    use crate::decoding::decompressor::DecompressError;
    use crate::decoding::symbol_decoder::DecodeError;
    use crate::huffman::tree_serializer::TreeDecodeError;
    use crate::{compress, compress_to_payload};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn header_fields() {
        assert_eq!(
            PayloadHeader::read(&[0x01]),
            Ok((
                PayloadHeader {
                    empty: true,
                    bit_length: 0
                },
                1
            ))
        );
        let (header, used) = PayloadHeader::read(&[0x00, 0x00, 0x00, 0x01, 0x09, 0xAA]).unwrap();
        assert_eq!(used, HEADER_SIZE);
        assert_eq!(header.bit_length, 265);
        assert_eq!(header.payload_size(), 34);
    }

    #[test]
    fn largest_bit_length() {
        let (header, _) = PayloadHeader::read(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(header.bit_length, u32::MAX);
        assert_eq!(header.payload_size(), 0x2000_0000);
    }

    #[test]
    fn header_errors() {
        assert_eq!(PayloadHeader::read(&[]), Err(PayloadHeaderError::MissingFlag));
        assert_eq!(
            PayloadHeader::read(&[0x02, 0, 0, 0, 1]),
            Err(PayloadHeaderError::BadFlag { flag: 2 })
        );
        assert_eq!(
            PayloadHeader::read(&[0x01, 0x00]),
            Err(PayloadHeaderError::TrailingBytesAfterEmpty { count: 1 })
        );
        assert_eq!(
            PayloadHeader::read(&[0x00, 0x00, 0x00]),
            Err(PayloadHeaderError::MissingBitLength { got: 2 })
        );
        assert_eq!(
            PayloadHeader::read(&[0x00, 0, 0, 0, 0, 0x58]),
            Err(PayloadHeaderError::ZeroBitLength)
        );
    }

    #[test]
    fn from_bytes_inverts_to_bytes() {
        let payload = compress_to_payload(b"Hello, World!").unwrap();
        let bytes = payload.to_bytes();
        let parsed = CompressedPayload::<u8>::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.header(), payload.header());
        assert_eq!(parsed.packed(), payload.packed());
        assert_eq!(parsed.tree().unwrap().codes(), payload.tree().unwrap().codes());
        assert_eq!(parsed.decode().unwrap(), b"Hello, World!".to_vec());
    }

    #[test]
    fn empty_payload() {
        let payload = compress_to_payload::<u8>(&[]).unwrap();
        assert!(payload.is_empty());
        assert!(payload.tree().is_none());
        assert_eq!(payload.to_bytes(), vec![0x01]);
        let parsed = CompressedPayload::<u8>::from_bytes(&[0x01]).unwrap();
        assert!(parsed.decode().unwrap().is_empty());
    }

    #[test]
    fn packed_size_must_match() {
        let mut bytes = compress(b"ab").unwrap();
        bytes.push(0);
        assert_eq!(
            CompressedPayload::<u8>::from_bytes(&bytes),
            Err(DecompressError::PayloadHeaderError(
                PayloadHeaderError::PayloadSizeMismatch {
                    expected: 1,
                    got: 2
                }
            ))
        );
        bytes.truncate(bytes.len() - 2);
        assert_eq!(
            CompressedPayload::<u8>::from_bytes(&bytes),
            Err(DecompressError::PayloadHeaderError(
                PayloadHeaderError::PayloadSizeMismatch {
                    expected: 1,
                    got: 0
                }
            ))
        );
    }

    #[test]
    fn bad_tree_is_reported() {
        // root is a leaf
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x01, 0xB0, 0x80, 0x00];
        assert_eq!(
            CompressedPayload::<u8>::from_bytes(&bytes),
            Err(DecompressError::TreeDecodeError(TreeDecodeError::RootIsLeaf))
        );
    }

    #[test]
    fn bad_bits_surface_on_decode() {
        // valid "aaaa" header announcing 4 bits, but the third selects the placeholder
        let bytes: Vec<u8> = vec![0x00, 0x00, 0x00, 0x00, 0x04, 0x58, 0x6C, 0x20, 0b0010_0000];
        let payload = CompressedPayload::<u8>::from_bytes(&bytes).unwrap();
        assert_eq!(
            payload.decode(),
            Err(DecompressError::DecodeError(
                DecodeError::PlaceholderSelected { bit_position: 2 }
            ))
        );
    }
}
