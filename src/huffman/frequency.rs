//! Contains [`analyze`], which counts how often each symbol occurs.

use crate::symbol::Symbol;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Occurrence counts per distinct symbol.
///
/// Iteration yields symbols in the order they were first seen in the input.
/// That order seeds the tree builder's tie-breaking, so it is what makes tree
/// construction reproducible for identical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    /// `(symbol, count)` in first-occurrence order
    entries: Vec<(S, u64)>,
    /// Position of each symbol in `entries`
    index: BTreeMap<S, usize>,
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        FrequencyTable {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Counts one more occurrence of `symbol`.
    pub fn add(&mut self, symbol: S) {
        match self.index.get(&symbol) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    /// The count for `symbol`, or `None` if it never occurred.
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.index.get(symbol).map(|&idx| self.entries[idx].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the length of the analyzed input.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Counts every symbol in `input`. An empty input gives an empty table.
pub fn analyze<S: Symbol>(input: &[S]) -> FrequencyTable<S> {
    let mut table = FrequencyTable::new();
    for &symbol in input {
        table.add(symbol);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::analyze;
    use alloc::vec::Vec;

    #[test]
    fn empty_input() {
        let table = analyze::<u8>(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn first_occurrence_order() {
        let table = analyze(b"Hello, World!");
        let order: Vec<u8> = table.iter().map(|(symbol, _)| symbol).collect();
        assert_eq!(order, b"Helo, Wrd!".to_vec());
        assert_eq!(table.get(&b'l'), Some(3));
        assert_eq!(table.get(&b'o'), Some(2));
        assert_eq!(table.get(&b'H'), Some(1));
        assert_eq!(table.get(&b'x'), None);
        assert_eq!(table.total(), 13);
    }

    #[test]
    fn order_ignores_symbol_value() {
        // 'z' sorts after 'a' but is seen first
        let table = analyze(&['z', 'a', 'a', 'z', 'q']);
        let entries: Vec<(char, u64)> = table.iter().collect();
        assert_eq!(entries, [('z', 2), ('a', 2), ('q', 1)]);
    }

    #[test]
    fn identical_input_gives_identical_tables() {
        let data: Vec<u16> = (0..1000).map(|x| (x * 7919 % 13) as u16).collect();
        assert_eq!(analyze(&data), analyze(&data));
    }
}
