use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use super::frequency::FrequencyTable;
use super::huffman::HuffmanTree::{self, *};
use crate::u8;

/// Longest code a `Code` can hold. Huffman trees over u64 weights stay well
/// below this (a leaf at depth d needs a total weight of at least Fib(d + 2)).
pub const MAX_CODE_LEN: u8 = 128;

/// A variable-length bit string, right-aligned in `bits`, MSB (first bit) highest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// `len` low bits of `bits` in MSB-first order. `None` if `len` is out
    /// of `1..=MAX_CODE_LEN` or `bits` has bits set above `len`.
    pub fn new(bits: u128, len: u8) -> Option<Self> {
        if len == 0 || len > MAX_CODE_LEN {
            return None;
        }
        if len < MAX_CODE_LEN && bits >> len != 0 {
            return None;
        }
        Some(Self { bits, len })
    }

    /// Parses a string of '0' and '1'
    pub fn from_bit_str(s: &str) -> Option<Self> {
        let len = u8::try_from(s.len()).ok()?;
        let bits = s.bytes().try_fold(0u128, |acc, c| match c {
            b'0' => Some(acc << 1),
            b'1' => Some((acc << 1) | 1),
            _ => None,
        })?;
        Self::new(bits, len)
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    /// The i-th bit, counting from the first (most significant) one
    pub fn bit(&self, i: u8) -> u8 {
        debug_assert!(i < self.len);
        u8!((self.bits >> (self.len - 1 - i)) & 1)
    }

    /// Bits in transmission order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| self.bit(i))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    fn child(&self, bit: u128) -> Self {
        Self { bits: (self.bits << 1) | bit, len: self.len + 1 }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|bit| write!(f, "{bit}"))
    }
}

/// Value to prefix code mapping, one entry per distinct value, ordered by value.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Assigns codes by walking the tree, '0' for left and '1' for right.
    /// A lone leaf gets the code "0" so every sample still costs one bit.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let zero = Code { bits: 0, len: 1 };
        if let Leaf { value, .. } = tree {
            return Self { codes: BTreeMap::from([(*value, zero)]) };
        }

        let mut codes = BTreeMap::new();
        let mut bfs = VecDeque::new();
        bfs.push_back((tree, None::<Code>));

        while let Some((node, code)) = bfs.pop_front() {
            match (node, code) {
                (Leaf { value, .. }, Some(code)) => {
                    codes.insert(*value, code);
                }
                (Node { left, right, .. }, code) => {
                    let (left_code, right_code) = match code {
                        Some(code) => (code.child(0), code.child(1)),
                        None => (zero, Code { bits: 1, len: 1 }),
                    };
                    bfs.push_back((left.as_ref(), Some(left_code)));
                    bfs.push_back((right.as_ref(), Some(right_code)));
                }
                (Leaf { .. }, None) => unreachable!("root leaf handled above"),
            }
        }
        Self { codes }
    }

    /// Huffman codes for a frequency table, empty if the table is
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        HuffmanTree::from_frequencies(frequencies)
            .map(|tree| Self::from_tree(&tree))
            .unwrap_or_default()
    }

    /// Builds a table from explicit entries, as read back from an artifact.
    /// Returns the first duplicated value as the error.
    pub fn from_entries(entries: impl IntoIterator<Item = (u8, Code)>) -> Result<Self, u8> {
        let mut codes = BTreeMap::new();
        for (value, code) in entries {
            if codes.insert(value, code).is_some() {
                return Err(value);
            }
        }
        Ok(Self { codes })
    }

    pub fn get(&self, value: u8) -> Option<Code> {
        self.codes.get(&value).copied()
    }

    /// `(value, code)` pairs in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes.iter().map(|(&value, &code)| (value, code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn max_len(&self) -> u8 {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Dense `value -> code` lookup for the packer's hot loop
    pub(crate) fn to_lookup(&self) -> [Option<Code>; 256] {
        let mut lookup = [None; 256];
        for (value, code) in self.iter() {
            lookup[usize::from(value)] = Some(code);
        }
        lookup
    }

    /// No code is a prefix of another (equal codes count as prefixes)
    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<Code> = self.codes.values().copied().collect();
        // left-align so lexicographic bit order is integer order, prefixes sort first
        sorted.sort_unstable_by_key(|code| (code.bits << (MAX_CODE_LEN - code.len), code.len));
        sorted.windows(2).all(|pair| !pair[0].is_prefix_of(&pair[1]))
    }

    /// Bits spent per sample when coding data distributed as `frequencies`
    pub fn average_code_length(&self, frequencies: &FrequencyTable) -> f64 {
        let total = frequencies.total();
        if total == 0 {
            return 0.0;
        }
        let bits: u64 = frequencies
            .iter()
            .filter_map(|(value, count)| self.get(value).map(|code| u64::from(code.len()) * count))
            .sum();
        bits as f64 / total as f64
    }
}
