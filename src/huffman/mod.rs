//! Huffman coding is a method of encoding where symbols are assigned a code,
//! and more commonly used symbols get shorter codes, and less commonly
//! used symbols get longer codes. Codes are prefix free, meaning no code
//! is the beginning of another code.
//!
//! The pieces live in separate modules, leaf to root:
//! - [frequency]: counts symbols in first-occurrence order
//! - [tree]: builds the tree by repeatedly merging the two lightest nodes
//! - [code_table]: walks the tree to assign each symbol its bit string
//! - [tree_serializer]: writes the tree into the payload header and reads it back

pub mod code_table;
pub mod frequency;
pub mod tree;
pub mod tree_serializer;

/// Longest code the coder will produce or accept.
///
/// A payload holds at most `u32::MAX` coded bits, which bounds the total
/// symbol weight and with it the tree depth to well below this value.
pub const MAX_CODE_LENGTH: u8 = 64;
