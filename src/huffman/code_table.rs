use super::tree::{HuffmanNode, HuffmanTree};
use super::MAX_CODE_LENGTH;
use crate::symbol::Symbol;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

/// A code word: the lowest `len` bits of `bits`, most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Takes the lowest `len` bits of `bits`, the rest are masked off.
    ///
    /// # Panics
    /// If `len` is bigger than [`MAX_CODE_LENGTH`].
    pub fn new(bits: u64, len: u8) -> Self {
        assert!(len <= MAX_CODE_LENGTH);
        let bits = if len == 64 { bits } else { bits & ((1 << len) - 1) };
        Code { bits, len }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends one bit, descending one level in the tree.
    fn push(self, bit: bool) -> Self {
        Code {
            bits: (self.bits << 1) | u64::from(bit),
            len: self.len + 1,
        }
    }

    /// The bit at `idx`, counting from the first (most significant) bit.
    pub fn bit(&self, idx: u8) -> bool {
        assert!(idx < self.len);
        (self.bits >> (self.len - 1 - idx)) & 1 == 1
    }

    /// The code as a sequence of bits, first bit first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.bit(idx))
    }

    /// True if `self` is a prefix of `other` (a code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        let shift = other.len - self.len;
        let other_head = if shift == 64 { 0 } else { other.bits >> shift };
        other_head == self.bits
    }
}

/// Displays the code as a string of `0` and `1`.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Maps each symbol to its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: BTreeMap<S, Code>,
}

impl<S: Symbol> CodeTable<S> {
    pub fn get(&self, symbol: &S) -> Option<Code> {
        self.codes.get(symbol).copied()
    }

    /// Entries sorted by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (S, Code)> + '_ {
        self.codes.iter().map(|(symbol, code)| (*symbol, *code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Checks that no code is a prefix of another code.
    ///
    /// Holds for every table derived from a full binary tree. Sorting the codes
    /// lexicographically puts a prefix directly before some code it prefixes,
    /// so comparing neighbours is enough.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<Code> = self.codes.values().copied().collect();
        codes.sort_by(|a, b| a.iter().cmp(b.iter()));
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(&pair[1]))
    }
}

/// Assigns every leaf the path that leads to it: `0` for left, `1` for right.
///
/// For the single-symbol tree only the real leaf on the left is recorded, so
/// its symbol gets the one-bit code `0`.
pub fn derive_codes<S: Symbol>(tree: &HuffmanTree<S>) -> CodeTable<S> {
    let mut codes = BTreeMap::new();
    let mut stack = alloc::vec![(tree.root(), Code::new(0, 0))];
    while let Some((node, code)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                // the placeholder repeats a symbol that already has a code
                codes.entry(*symbol).or_insert(code);
            }
            HuffmanNode::Internal { left, right, .. } => {
                debug_assert!(code.len() < MAX_CODE_LENGTH);
                // right first so the left subtree is visited first
                stack.push((&**right, code.push(true)));
                stack.push((&**left, code.push(false)));
            }
        }
    }
    vtrace!("derived {} codes", codes.len());
    CodeTable { codes }
}
