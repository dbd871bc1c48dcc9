use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::config::BranchOrder;
use crate::error::{DecodeError, Result};
use crate::metadata::FrequencyTable;
use crate::min_heap::MinHeap;

/// Symbol and weight of the placeholder leaf paired with a lone symbol.
const DUMMY_SYMBOL: u8 = 0x00;
const DUMMY_WEIGHT: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: u64) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// `a` becomes the `0` branch, `b` the `1` branch.
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    /// Follows one bit: `false` goes left, `true` goes right.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    fn generate_table(&self, table: &mut BTreeMap<u8, Vec<bool>>, code: &mut Vec<bool>) {
        match self {
            HuffNode::Leaf { byte, .. } => {
                table.insert(*byte, code.clone());
            }
            HuffNode::Internal { left, right, .. } => {
                code.push(false);
                left.generate_table(table, code);
                code.pop();
                code.push(true);
                right.generate_table(table, code);
                code.pop();
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
    /// For a one-symbol table, the branch under `root` holding the real leaf.
    lone_branch: Option<bool>,
}

impl HuffmanTree {
    /// Builds the tree the paired encoder built.
    ///
    /// Leaves enter the queue in header order; equal weights leave it in
    /// insertion order, merged nodes queueing behind existing equals. Of each
    /// extracted pair, the first goes on the branch `order` names. A single
    /// symbol is paired with a zero-weight `0x00` leaf so that it has a
    /// one-bit code.
    pub fn from_frequencies(frequencies: &FrequencyTable, order: BranchOrder) -> Result<Self> {
        let mut heap = MinHeap::with_capacity(frequencies.len() + 1);
        for (byte, freq) in frequencies.iter() {
            heap.insert(freq as u64, HuffNode::new(byte, freq as u64));
        }

        let lone_branch = match frequencies.iter().next() {
            Some((_, freq)) if frequencies.len() == 1 => {
                heap.insert(DUMMY_WEIGHT, HuffNode::new(DUMMY_SYMBOL, DUMMY_WEIGHT));
                // the real leaf is extracted first only when it ties the dummy
                let real_first = freq as u64 <= DUMMY_WEIGHT;
                Some(real_first == order.lighter_bit())
            }
            _ => None,
        };

        while heap.heap_size() > 1 {
            let (_, x) = heap.extract_min().map_err(|_| DecodeError::MalformedTree("queue drained"))?;
            let (_, y) = heap.extract_min().map_err(|_| DecodeError::MalformedTree("queue drained"))?;
            let z = if order.lighter_bit() {
                HuffNode::merge(y, x)
            } else {
                HuffNode::merge(x, y)
            };
            heap.insert(z.weight(), z);
        }

        let (_, root) = heap
            .extract_min()
            .map_err(|_| DecodeError::MalformedTree("no root survived"))?;

        let tree = HuffmanTree { root, lone_branch };
        let expected = frequencies.len() + lone_branch.map_or(0, |_| 1);
        if tree.root.leaf_count() != expected {
            return Err(DecodeError::MalformedTree("leaf count differs from symbol count"));
        }

        debug!(symbols = frequencies.len(), depth = tree.depth(), ?order, "tree built");
        Ok(tree)
    }

    /// Node a decode walk starts from.
    ///
    /// For a lone symbol this is the real leaf itself, so each copy is
    /// emitted without consuming payload bits.
    pub fn walk_root(&self) -> &HuffNode {
        match self.lone_branch {
            Some(bit) => self.root.child(bit).unwrap_or(&self.root),
            None => &self.root,
        }
    }

    /// Code of every real symbol, most significant bit first.
    pub fn code_table(&self) -> BTreeMap<u8, Vec<bool>> {
        let mut table = BTreeMap::new();
        match (self.lone_branch, self.walk_root()) {
            (Some(bit), HuffNode::Leaf { byte, .. }) => {
                table.insert(*byte, vec![bit]);
            }
            _ => self.root.generate_table(&mut table, &mut Vec::new()),
        }
        for (byte, code) in &table {
            trace!(byte, bits = code.len(), "code");
        }
        table
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

/// Renders a code as `0`/`1` characters.
pub fn format_code(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}
