//! Writes a [`HuffmanTree`] into the payload header and reads it back.
//!
//! The format is a pre-order walk with one tag bit per node:
//! - `1` is a leaf, followed by `Symbol::BITS` bits of its symbol
//! - `0` is an internal node, followed by its left and then its right subtree
//!
//! The encoding is self-delimiting. It is zero padded to a whole byte, and
//! [`deserialize`] reports how many bytes it consumed so the payload can
//! follow directly.
//!
//! Deserialized trees carry no weights, every node has weight zero.

use super::tree::{HuffmanNode, HuffmanTree};
use super::MAX_CODE_LENGTH;
use crate::decoding::bit_reader::{BitReader, GetBitsError};
use crate::encoding::bit_writer::BitWriter;
use crate::symbol::Symbol;
use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeDecodeError {
    GetBitsError(GetBitsError),
    /// A tree consisting of a single leaf would give its symbol an empty code.
    RootIsLeaf,
    InvalidSymbol { raw: u32 },
    /// A symbol appears on two leaves, outside of the single-symbol tree shape.
    DuplicateSymbol { raw: u32 },
    TooDeep { max_depth: u8 },
}

#[cfg(feature = "std")]
impl std::error::Error for TreeDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeDecodeError::GetBitsError(source) => Some(source),
            _ => None,
        }
    }
}

impl core::fmt::Display for TreeDecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TreeDecodeError::GetBitsError(e) => write!(f, "Tree description is truncated: {}", e),
            TreeDecodeError::RootIsLeaf => {
                write!(f, "Tree root is a leaf, every tree needs at least two leaves")
            }
            TreeDecodeError::InvalidSymbol { raw } => {
                write!(f, "Tree contains invalid symbol value: 0x{:X}", raw)
            }
            TreeDecodeError::DuplicateSymbol { raw } => {
                write!(f, "Tree contains symbol 0x{:X} on more than one leaf", raw)
            }
            TreeDecodeError::TooDeep { max_depth } => {
                write!(f, "Tree is deeper than the maximum code length of {}", max_depth)
            }
        }
    }
}

impl From<GetBitsError> for TreeDecodeError {
    fn from(val: GetBitsError) -> Self {
        Self::GetBitsError(val)
    }
}

/// Appends the tree description to `writer`, without padding.
pub fn write_tree<S: Symbol>(tree: &HuffmanTree<S>, writer: &mut BitWriter) {
    let mut stack = alloc::vec![tree.root()];
    while let Some(node) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                writer.write_bit(true);
                writer.write_bits(u64::from(symbol.to_bits()), S::BITS as usize);
            }
            HuffmanNode::Internal { left, right, .. } => {
                writer.write_bit(false);
                stack.push(&**right);
                stack.push(&**left);
            }
        }
    }
}

/// Serializes the tree into whole bytes.
pub fn serialize<S: Symbol>(tree: &HuffmanTree<S>) -> Vec<u8> {
    let mut writer = BitWriter::new();
    write_tree(tree, &mut writer);
    writer.dump()
}

/// Reconstructs a tree from the start of `source`.
///
/// Returns the tree and the number of bytes its (padded) description used.
pub fn deserialize<S: Symbol>(source: &[u8]) -> Result<(HuffmanTree<S>, usize), TreeDecodeError> {
    let mut br = BitReader::new(source);
    let tree = read_tree(&mut br)?;
    br.align_to_byte();
    Ok((tree, br.bits_read() / 8))
}

/// An internal node whose children are still being read.
struct Pending<S: Symbol> {
    left: Option<HuffmanNode<S>>,
}

/// Reads one tree description from `br`, leaving it right after the last node.
///
/// Works with an explicit stack so a hostile description can't overflow the
/// call stack, and rejects anything deeper than [`MAX_CODE_LENGTH`].
pub fn read_tree<S: Symbol>(br: &mut BitReader<'_>) -> Result<HuffmanTree<S>, TreeDecodeError> {
    let mut open: Vec<Pending<S>> = Vec::new();
    let mut seen = BTreeSet::new();
    let mut duplicate = None;

    let root = loop {
        let is_leaf = br.get_bit()?;
        let mut node = if is_leaf {
            let raw = br.get_bits(S::BITS as usize)? as u32;
            let symbol = S::from_bits(raw).ok_or(TreeDecodeError::InvalidSymbol { raw })?;
            if !seen.insert(symbol) && duplicate.is_none() {
                duplicate = Some(raw);
            }
            HuffmanNode::Leaf { symbol, weight: 0 }
        } else {
            if open.len() >= usize::from(MAX_CODE_LENGTH) {
                return Err(TreeDecodeError::TooDeep {
                    max_depth: MAX_CODE_LENGTH,
                });
            }
            open.push(Pending { left: None });
            continue;
        };

        // attach the finished node, closing every internal node it completes
        let finished = loop {
            let pending = match open.last_mut() {
                Some(pending) => pending,
                None => break Some(node),
            };
            match pending.left.take() {
                None => {
                    pending.left = Some(node);
                    break None;
                }
                Some(left) => {
                    open.pop();
                    node = HuffmanNode::Internal {
                        weight: 0,
                        left: Box::new(left),
                        right: Box::new(node),
                    };
                }
            }
        };

        if let Some(root) = finished {
            break root;
        }
    };

    if root.is_leaf() {
        return Err(TreeDecodeError::RootIsLeaf);
    }
    let tree = HuffmanTree::from_root(root);
    if let Some(raw) = duplicate {
        if !tree.is_single_symbol() {
            return Err(TreeDecodeError::DuplicateSymbol { raw });
        }
    }
    vtrace!(
        "read tree with {} symbols after {} bits",
        tree.symbol_count(),
        br.bits_read()
    );
    Ok(tree)
}
