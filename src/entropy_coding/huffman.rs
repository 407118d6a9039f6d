use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::frequency::FrequencyTable;
use HuffmanTree::*;

/// Prefix code tree. Each node is exclusively owned by its parent.
#[derive(PartialEq, Eq, Debug)]
pub enum HuffmanTree {
    Leaf { value: u8, weight: u64 },
    Node { weight: u64, left: Box<HuffmanTree>, right: Box<HuffmanTree> },
}

impl HuffmanTree {
    /// Greedy pairwise merging of the two lightest nodes until one is left.
    ///
    /// Ties on weight are broken by a sequence number: leaves get 0..n in
    /// ascending value order, merged nodes get n, n+1, .. in creation order.
    /// So among equally light nodes, leaves go first (lowest value first),
    /// then merged nodes (oldest first). The first node popped becomes the
    /// left child.
    ///
    /// Returns `None` for an empty table, a single leaf for a one-entry table.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        let mut heap: BinaryHeap<_> = frequencies
            .iter()
            .enumerate()
            .map(|(seq, (value, weight))| Pending { seq, tree: Leaf { value, weight } })
            .collect();
        let mut next_seq = heap.len();

        while heap.len() >= 2 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                unreachable!("heap holds at least two nodes")
            };
            // bounded by the table total, which fits in a u64
            let weight = left.tree.weight() + right.tree.weight();
            heap.push(Pending {
                seq: next_seq,
                tree: Node { weight, left: Box::new(left.tree), right: Box::new(right.tree) },
            });
            next_seq += 1;
        }

        heap.pop().map(|pending| pending.tree)
    }

    pub fn weight(&self) -> u64 {
        match self {
            Leaf { weight, .. } | Node { weight, .. } => *weight,
        }
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        match self {
            Leaf { .. } => 0,
            Node { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Leaf { .. } => 1,
            Node { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Heap entry ordered by `(weight, seq)`, reversed to make the max-heap a min-heap
struct Pending {
    seq: usize,
    tree: HuffmanTree,
}

impl Pending {
    fn key(&self) -> (u64, usize) {
        (self.tree.weight(), self.seq)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key()).reverse()
    }
}
