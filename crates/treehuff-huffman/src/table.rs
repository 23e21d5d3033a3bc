//! Symbol-to-code lookup derived from a code tree.

use std::fmt;

use treehuff_core::{BitWrite, Result};

use crate::frequency::FrequencyTable;
use crate::tree::{CodeNode, CodeTree};
use crate::{Symbol, ALPH_SIZE, MAX_TREE_DEPTH};

const CODE_WORDS: usize = MAX_TREE_DEPTH / 64;

/// A root-to-leaf path: bit `i` is the edge taken at depth `i`.
///
/// Stored MSB-first in 64-bit words so codes of any depth a 257-leaf tree
/// can have fit without allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    words: [u64; CODE_WORDS],
    len: u16,
}

impl Code {
    /// The empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a code from a `'0'`/`'1'` string. Other characters are ignored.
    pub fn from_bit_str(bits: &str) -> Self {
        let mut code = Self::new();
        for c in bits.chars() {
            match c {
                '0' => code.push(false),
                '1' => code.push(true),
                _ => {}
            }
        }
        code
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, false when out of range.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.words[index / 64] >> (63 - index % 64) & 1 == 1
    }

    /// Path extended by one edge.
    fn with(mut self, bit: bool) -> Self {
        self.push(bit);
        self
    }

    fn push(&mut self, bit: bool) {
        let index = self.len();
        debug_assert!(index < MAX_TREE_DEPTH, "code longer than any valid tree");
        if index >= MAX_TREE_DEPTH {
            return;
        }
        if bit {
            self.words[index / 64] |= 1 << (63 - index % 64);
        }
        self.len += 1;
    }

    /// Bits in path order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// True when `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }

    /// Emit the code in chunks of at most 32 bits.
    pub fn write_to<W: BitWrite + ?Sized>(&self, output: &mut W) -> Result<()> {
        let mut start = 0;
        while start < self.len() {
            let width = (self.len() - start).min(32);
            let mut value = 0u32;
            for i in start..start + width {
                value = (value << 1) | self.bit(i) as u32;
            }
            output.write_bits(width as u8, value)?;
            start += width;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// Codes for every leaf of a tree, indexed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk the tree depth-first, left edge `0`, right edge `1`.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut table = CodeTable {
            codes: vec![None; ALPH_SIZE + 1],
        };
        table.collect(tree.root(), Code::new());
        table
    }

    fn collect(&mut self, node: &CodeNode, path: Code) {
        match node {
            CodeNode::Leaf { symbol, .. } => {
                if let Some(slot) = self.codes.get_mut(*symbol as usize) {
                    *slot = Some(path);
                }
            }
            CodeNode::Internal { left, right, .. } => {
                self.collect(left, path.with(false));
                self.collect(right, path.with(true));
            }
        }
    }

    /// Code for `symbol`, if it is a leaf of the tree.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbols with their codes, in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }

    /// Payload size in bits for data with these frequencies, terminator included.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| frequencies.weight(symbol) * code.len() as u64)
            .sum()
    }
}
