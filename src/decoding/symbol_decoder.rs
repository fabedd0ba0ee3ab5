use super::bit_reader::{BitReader, GetBitsError};
use crate::huffman::tree::{HuffmanNode, HuffmanTree};
use crate::symbol::Symbol;
use alloc::vec::Vec;

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    GetBitsError(GetBitsError),
    /// The announced bits ran out in the middle of a code.
    IncompleteCode { bit_length: usize },
    /// A `1` bit in a single-symbol stream, which would select the placeholder leaf.
    PlaceholderSelected { bit_position: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::GetBitsError(source) => Some(source),
            _ => None,
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::GetBitsError(e) => write!(f, "Payload is truncated: {}", e),
            DecodeError::IncompleteCode { bit_length } => {
                write!(
                    f,
                    "Payload ends inside a code after {} bits. Probably caused by data corruption",
                    bit_length,
                )
            }
            DecodeError::PlaceholderSelected { bit_position } => {
                write!(
                    f,
                    "Bit {} selects the placeholder of a single-symbol tree",
                    bit_position,
                )
            }
        }
    }
}

impl From<GetBitsError> for DecodeError {
    fn from(val: GetBitsError) -> Self {
        Self::GetBitsError(val)
    }
}

/// Decodes exactly `bit_length` bits of `packed` by walking `tree` from the
/// root for every symbol: `0` goes left, `1` goes right, a leaf emits its
/// symbol. Bits after `bit_length` are padding and are never looked at.
///
/// Either every symbol is decoded or an error is returned, never a partial result.
pub fn decode<S: Symbol>(
    packed: &[u8],
    bit_length: usize,
    tree: &HuffmanTree<S>,
) -> Result<Vec<S>, DecodeError> {
    if packed.len() * 8 < bit_length {
        return Err(DecodeError::GetBitsError(
            GetBitsError::NotEnoughRemainingBits {
                requested: bit_length,
                remaining: packed.len() * 8,
            },
        ));
    }
    let mut br = BitReader::new(packed);

    if let Some(symbol) = tree.single_symbol() {
        return decode_single_symbol(&mut br, bit_length, symbol);
    }

    // every code is at least one bit
    let mut output = Vec::with_capacity(bit_length / 2);
    let mut node = tree.root();
    while br.bits_read() < bit_length {
        if let HuffmanNode::Internal { left, right, .. } = node {
            node = if br.get_bit()? { &**right } else { &**left };
        }
        if let HuffmanNode::Leaf { symbol, .. } = node {
            output.push(*symbol);
            node = tree.root();
        }
    }

    if !core::ptr::eq(node, tree.root()) {
        return Err(DecodeError::IncompleteCode { bit_length });
    }
    Ok(output)
}

/// The single-symbol tree has the codes `0` (the symbol) and `1` (the placeholder).
fn decode_single_symbol<S: Symbol>(
    br: &mut BitReader<'_>,
    bit_length: usize,
    symbol: S,
) -> Result<Vec<S>, DecodeError> {
    while br.bits_read() < bit_length {
        let bit_position = br.bits_read();
        if br.get_bit()? {
            return Err(DecodeError::PlaceholderSelected { bit_position });
        }
    }
    Ok(alloc::vec![symbol; bit_length])
}

#[cfg(test)]
mod tests {
    use super::{decode, DecodeError};
    use crate::encoding::symbol_encoder::encode;
    use crate::huffman::frequency::analyze;
    use crate::huffman::tree::build;
    use crate::huffman::tree_serializer::deserialize;
    use crate::huffman::tree_serializer::serialize;
    use alloc::vec::Vec;

    #[test]
    fn decodes_what_was_encoded() {
        let input = b"Hello, World!";
        let tree = build(&analyze(input)).unwrap();
        let bits = encode(input, &tree.codes()).unwrap();
        let decoded = decode(bits.as_bytes(), bits.len(), &tree).unwrap();
        assert_eq!(decoded, input.to_vec());
    }

    #[test]
    fn decodes_with_deserialized_tree() {
        let input: Vec<u16> = (0..500u16).map(|x| x % 17 * (x % 3)).collect();
        let tree = build(&analyze(&input)).unwrap();
        let bits = encode(&input, &tree.codes()).unwrap();
        let (rebuilt, _) = deserialize::<u16>(&serialize(&tree)).unwrap();
        assert_eq!(decode(bits.as_bytes(), bits.len(), &rebuilt).unwrap(), input);
    }

    #[test]
    fn padding_is_ignored() {
        // c=0, a=10, b=11, "cab" = 0 10 11 + padding of ones
        let tree = build(&analyze(b"abc")).unwrap();
        let decoded = decode(&[0b0101_1111], 5, &tree).unwrap();
        assert_eq!(decoded, b"cab".to_vec());
    }

    #[test]
    fn zero_bits_decode_to_nothing() {
        let tree = build(&analyze(b"abc")).unwrap();
        assert!(decode(&[], 0, &tree).unwrap().is_empty());
    }

    #[test]
    fn stream_ending_inside_a_code() {
        // "ca" followed by the first bit of another code
        let tree = build(&analyze(b"abc")).unwrap();
        assert_eq!(
            decode(&[0b0101_0000], 4, &tree),
            Err(DecodeError::IncompleteCode { bit_length: 4 })
        );
    }

    #[test]
    fn bit_length_past_buffer_end() {
        let tree = build(&analyze(b"abc")).unwrap();
        assert!(matches!(
            decode(&[0b0101_1111], 9, &tree),
            Err(DecodeError::GetBitsError(_))
        ));
    }

    #[test]
    fn single_symbol() {
        let tree = build(&analyze(b"zzz")).unwrap();
        assert_eq!(decode(&[0b0000_0000], 3, &tree).unwrap(), b"zzz".to_vec());
        // padding after the three bits is never looked at
        assert_eq!(decode(&[0b0001_1111], 3, &tree).unwrap(), b"zzz".to_vec());
        assert_eq!(
            decode(&[0b0010_0000], 3, &tree),
            Err(DecodeError::PlaceholderSelected { bit_position: 2 })
        );
    }
}
