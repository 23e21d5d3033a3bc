//! Huffman code tree and its greedy construction.
//!
//! ## Tie-breaking
//!
//! Nodes are merged lowest weight first. Among equal weights, leaves come
//! before internal nodes, leaves order by symbol value and internal nodes by
//! creation order. The first node taken becomes the left child. This makes
//! the tree, and so the compressed output, identical across runs.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;
use treehuff_core::{Error, Result};

use crate::frequency::FrequencyTable;
use crate::{Symbol, ALPH_SIZE, PSEUDO_EOF};

/// A node of the code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<CodeNode>,
        right: Box<CodeNode>,
    },
}

impl CodeNode {
    /// Create a leaf.
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        CodeNode::Leaf { symbol, weight }
    }

    /// Join two subtrees under a new internal node.
    pub fn merge(left: Self, right: Self) -> Self {
        CodeNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            CodeNode::Leaf { weight, .. } | CodeNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CodeNode::Leaf { .. })
    }

    /// Symbol of a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            CodeNode::Leaf { symbol, .. } => Some(*symbol),
            CodeNode::Internal { .. } => None,
        }
    }

    /// Child reached by following `bit` (0 = left, 1 = right).
    #[inline]
    pub fn child(&self, bit: u32) -> Option<&CodeNode> {
        match self {
            CodeNode::Leaf { .. } => None,
            CodeNode::Internal { left, right, .. } => {
                Some(if bit == 0 { left } else { right })
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            CodeNode::Leaf { .. } => 1,
            CodeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            CodeNode::Leaf { .. } => 0,
            CodeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            CodeNode::Leaf { symbol, .. } => out.push(*symbol),
            CodeNode::Internal { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }
}

/// Heap slot ordered by weight, then by tie-break key.
struct Pending {
    weight: u64,
    order: usize,
    node: CodeNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
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
        (self.weight, self.order).cmp(&(other.weight, other.order))
    }
}

/// A strict binary tree with at least two leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: CodeNode,
}

impl CodeTree {
    /// Build the Huffman tree for the given byte counts plus the pseudo-EOF.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut heap: BinaryHeap<Reverse<Pending>> = frequencies
            .iter()
            .map(|(byte, count)| Pending {
                weight: count,
                order: byte as usize,
                node: CodeNode::leaf(byte as Symbol, count),
            })
            .map(Reverse)
            .collect();

        heap.push(Reverse(Pending {
            weight: 1,
            order: PSEUDO_EOF as usize,
            node: CodeNode::leaf(PSEUDO_EOF, 1),
        }));

        // Empty input leaves the pseudo-EOF alone, which would give it an
        // empty code. A zero-weight filler keeps every code at least one bit.
        if heap.len() < 2 {
            heap.push(Reverse(Pending {
                weight: 0,
                order: 0,
                node: CodeNode::leaf(0, 0),
            }));
        }

        let mut next_order = ALPH_SIZE + 1;
        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(Reverse(a)), Some(Reverse(b))) => {
                    let node = CodeNode::merge(a.node, b.node);
                    heap.push(Reverse(Pending {
                        weight: node.weight(),
                        order: next_order,
                        node,
                    }));
                    next_order += 1;
                }
                (Some(Reverse(last)), None) => break last.node,
                (None, _) => unreachable!("pseudo-EOF leaf is always present"),
            }
        };
        let tree = CodeTree { root };

        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.weight(),
            "code tree built"
        );
        tree
    }

    /// Wrap a decoded root, rejecting a lone leaf.
    pub fn from_root(root: CodeNode) -> Result<Self> {
        if root.is_leaf() {
            return Err(Error::DegenerateTree);
        }
        Ok(CodeTree { root })
    }

    pub fn root(&self) -> &CodeNode {
        &self.root
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Weight of the root: bytes counted plus one for the pseudo-EOF.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Leaf symbols in left-to-right order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::with_capacity(ALPH_SIZE + 1);
        self.root.collect_symbols(&mut out);
        out
    }
}
