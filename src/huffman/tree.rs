//! Builds the Huffman tree from a [`FrequencyTable`].

use super::code_table::{derive_codes, CodeTable};
use super::frequency::FrequencyTable;
use crate::symbol::Symbol;
use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use core::cmp::Ordering;

/// A node of a full binary tree: every internal node has exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S: Symbol> {
    Leaf {
        symbol: S,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode<S>>,
        right: Box<HuffmanNode<S>>,
    },
}

impl<S: Symbol> HuffmanNode<S> {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Joins two subtrees under a new internal node. `left` is reached with a `0` bit.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A complete Huffman tree. The root is always an internal node, so every
/// symbol has a code of at least one bit.
///
/// A tree for a single distinct symbol has the shape `Internal(real, placeholder)`:
/// the real leaf on the left gets the code `0` and the placeholder on the right
/// is a leaf with the same symbol and weight zero. No valid stream ever
/// selects the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S: Symbol> {
    root: HuffmanNode<S>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Wraps a root node. Callers must uphold the invariants documented on
    /// [`HuffmanTree`]; [`build`] and the tree deserializer always do.
    pub(crate) fn from_root(root: HuffmanNode<S>) -> Self {
        debug_assert!(!root.is_leaf());
        HuffmanTree { root }
    }

    pub fn root(&self) -> &HuffmanNode<S> {
        &self.root
    }

    /// The symbol of a tree built for input with one distinct symbol, `None`
    /// for every other tree.
    pub fn single_symbol(&self) -> Option<S> {
        if let HuffmanNode::Internal { left, right, .. } = &self.root {
            if let (HuffmanNode::Leaf { symbol: a, .. }, HuffmanNode::Leaf { symbol: b, .. }) =
                (&**left, &**right)
            {
                if a == b {
                    return Some(*a);
                }
            }
        }
        None
    }

    pub fn is_single_symbol(&self) -> bool {
        self.single_symbol().is_some()
    }

    /// Number of distinct symbols the tree can decode.
    pub fn symbol_count(&self) -> usize {
        if self.is_single_symbol() {
            return 1;
        }
        let mut leaves = 0;
        let mut stack = alloc::vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => leaves += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(&**left);
                    stack.push(&**right);
                }
            }
        }
        leaves
    }

    /// Length of the longest root-to-leaf path, i.e. the longest code.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = alloc::vec![(&self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => max_depth = max_depth.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Derives the code table for this tree.
    pub fn codes(&self) -> CodeTable<S> {
        derive_codes(self)
    }
}

/// A node waiting in the working collection, ordered by `(weight, rank)`.
///
/// `rank` is the insertion sequence number: leaves get `0..k` in frequency
/// table order, merged nodes continue from `k` in creation order. Equal
/// weights therefore always resolve to the node that entered first.
struct HeapEntry<S: Symbol> {
    weight: u64,
    rank: usize,
    node: HuffmanNode<S>,
}

impl<S: Symbol> PartialEq for HeapEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Symbol> Eq for HeapEntry<S> {}

impl<S: Symbol> PartialOrd for HeapEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Symbol> Ord for HeapEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, reverse so the lightest, oldest entry is on top
        (other.weight, other.rank).cmp(&(self.weight, self.rank))
    }
}

/// Builds the Huffman tree for `freqs`, or `None` if the table is empty.
///
/// Repeatedly removes the two lightest nodes and merges them, the first
/// removed becoming the left child. Ties are broken by insertion order as
/// described on [`HeapEntry`], so the result depends only on the table.
pub fn build<S: Symbol>(freqs: &FrequencyTable<S>) -> Option<HuffmanTree<S>> {
    match freqs.len() {
        0 => return None,
        1 => {
            let (symbol, weight) = freqs.iter().next()?;
            vtrace!("single distinct symbol {:?}, adding placeholder leaf", symbol);
            let placeholder = HuffmanNode::Leaf { symbol, weight: 0 };
            return Some(HuffmanTree::from_root(HuffmanNode::merge(
                HuffmanNode::Leaf { symbol, weight },
                placeholder,
            )));
        }
        _ => {}
    }

    let mut heap = BinaryHeap::with_capacity(freqs.len());
    for (rank, (symbol, weight)) in freqs.iter().enumerate() {
        heap.push(HeapEntry {
            weight,
            rank,
            node: HuffmanNode::Leaf { symbol, weight },
        });
    }
    let mut next_rank = heap.len();

    while heap.len() > 1 {
        let first = heap.pop()?;
        let second = heap.pop()?;
        let node = HuffmanNode::merge(first.node, second.node);
        heap.push(HeapEntry {
            weight: node.weight(),
            rank: next_rank,
            node,
        });
        next_rank += 1;
    }

    heap.pop().map(|entry| HuffmanTree::from_root(entry.node))
}
