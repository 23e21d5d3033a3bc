//! Header framing: magic number and pre-order tree serialization.
//!
//! Internal nodes are written as a single `0` bit followed by their left and
//! right subtrees; leaves as a `1` bit followed by the 9-bit symbol. The
//! encoding describes the tree shape completely, so the reader knows where
//! the header ends without a length field.

use tracing::debug;
use treehuff_core::{BitRead, BitWrite, Error, Result};

use crate::tree::{CodeNode, CodeTree};
use crate::{BITS_PER_INT, MAX_TREE_DEPTH, PSEUDO_EOF, SYMBOL_BITS};

/// Magic number of the count-table framing this format replaced.
pub const HUFF_NUMBER: u32 = 0xface_8200;

/// Magic number of the tree-header framing.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// Write the magic number and tree. Returns the number of bits written.
pub fn write_header<W: BitWrite + ?Sized>(tree: &CodeTree, output: &mut W) -> Result<u64> {
    output.write_bits(BITS_PER_INT, HUFF_TREE)?;
    let tree_bits = write_tree(tree, output)?;
    debug!(tree_bits, leaves = tree.leaf_count(), "header written");
    Ok(BITS_PER_INT as u64 + tree_bits)
}

/// Read and check the magic number, then parse the tree.
/// Returns the tree and the number of header bits consumed.
pub fn read_header<R: BitRead + ?Sized>(input: &mut R) -> Result<(CodeTree, u64)> {
    let magic = input
        .read_bits(BITS_PER_INT)?
        .ok_or_else(|| Error::truncated_tree(0))?;
    match magic {
        HUFF_TREE => {}
        HUFF_NUMBER => {
            return Err(Error::Unsupported(
                "count-table header (magic 0xface8200)".to_string(),
            ))
        }
        other => return Err(Error::bad_magic(other)),
    }

    let (tree, tree_bits) = read_tree(input)?;
    debug!(tree_bits, leaves = tree.leaf_count(), "header read");
    Ok((tree, BITS_PER_INT as u64 + tree_bits))
}

/// Serialize the tree in pre-order. Returns the number of bits written.
pub fn write_tree<W: BitWrite + ?Sized>(tree: &CodeTree, output: &mut W) -> Result<u64> {
    let mut bits = 0;
    write_node(tree.root(), output, &mut bits)?;
    Ok(bits)
}

fn write_node<W: BitWrite + ?Sized>(node: &CodeNode, output: &mut W, bits: &mut u64) -> Result<()> {
    match node {
        CodeNode::Internal { left, right, .. } => {
            output.write_bits(1, 0)?;
            *bits += 1;
            write_node(left, output, bits)?;
            write_node(right, output, bits)
        }
        CodeNode::Leaf { symbol, .. } => {
            output.write_bits(1, 1)?;
            output.write_bits(SYMBOL_BITS, *symbol as u32)?;
            *bits += 1 + SYMBOL_BITS as u64;
            Ok(())
        }
    }
}

/// Parse a pre-order tree. Returns the tree and the number of bits consumed.
///
/// Decoded nodes carry zero weight; only the shape matters for decoding.
pub fn read_tree<R: BitRead + ?Sized>(input: &mut R) -> Result<(CodeTree, u64)> {
    let mut parser = TreeParser { input, bits_read: 0 };
    let root = parser.node(0)?;
    let bits = parser.bits_read;
    Ok((CodeTree::from_root(root)?, bits))
}

struct TreeParser<'a, R: ?Sized> {
    input: &'a mut R,
    bits_read: u64,
}

impl<R: BitRead + ?Sized> TreeParser<'_, R> {
    fn bits(&mut self, width: u8) -> Result<u32> {
        let value = self
            .input
            .read_bits(width)?
            .ok_or_else(|| Error::truncated_tree(self.bits_read))?;
        self.bits_read += width as u64;
        Ok(value)
    }

    fn node(&mut self, depth: usize) -> Result<CodeNode> {
        if depth > MAX_TREE_DEPTH {
            return Err(Error::TreeTooDeep { depth });
        }
        if self.bits(1)? == 0 {
            let left = self.node(depth + 1)?;
            let right = self.node(depth + 1)?;
            Ok(CodeNode::merge(left, right))
        } else {
            let symbol = self.bits(SYMBOL_BITS)?;
            if symbol > PSEUDO_EOF as u32 {
                return Err(Error::InvalidSymbol { symbol });
            }
            Ok(CodeNode::leaf(symbol as u16, 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use treehuff_core::{BitReader, BitWriter};

    fn tree_for(data: &[u8]) -> CodeTree {
        CodeTree::build(&FrequencyTable::from_bytes(data))
    }

    /// Shape and symbols only; decoded trees carry no weights.
    fn shape(node: &CodeNode) -> String {
        match node {
            CodeNode::Leaf { symbol, .. } => symbol.to_string(),
            CodeNode::Internal { left, right, .. } => {
                format!("({} {})", shape(left), shape(right))
            }
        }
    }

    #[test]
    fn test_small_tree_bits() {
        // (65 (66 256)) -> 0 1:065 0 1:066 1:256
        let tree = tree_for(&[65, 65, 66]);
        let mut writer = BitWriter::new(Vec::new());
        let bits = write_tree(&tree, &mut writer).unwrap();
        assert_eq!(bits, 2 + 3 * 10);

        let data = writer.finish().unwrap();
        let mut reader = BitReader::from_slice(&data);
        assert_eq!(reader.read_bits(1).unwrap(), Some(0));
        assert_eq!(reader.read_bits(1).unwrap(), Some(1));
        assert_eq!(reader.read_bits(9).unwrap(), Some(65));
        assert_eq!(reader.read_bits(1).unwrap(), Some(0));
        assert_eq!(reader.read_bits(1).unwrap(), Some(1));
        assert_eq!(reader.read_bits(9).unwrap(), Some(66));
        assert_eq!(reader.read_bits(1).unwrap(), Some(1));
        assert_eq!(reader.read_bits(9).unwrap(), Some(256));
    }

    #[test]
    fn test_header_roundtrip_stops_at_tree_end() {
        let tree = tree_for(b"mississippi river");
        let mut writer = BitWriter::new(Vec::new());
        let written = write_header(&tree, &mut writer).unwrap();
        // sentinel right after the header must still be readable
        writer.write_bits(7, 0b1010101).unwrap();
        let data = writer.finish().unwrap();

        let mut reader = BitReader::from_slice(&data);
        let (decoded, consumed) = read_header(&mut reader).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(reader.bits_read(), written);
        assert_eq!(shape(decoded.root()), shape(tree.root()));
        assert_eq!(reader.read_bits(7).unwrap(), Some(0b1010101));
    }

    #[test]
    fn test_bad_magic() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(32, 0x1234_5678).unwrap();
        let data = writer.finish().unwrap();
        let err = read_header(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::BadMagic { found: 0x1234_5678 }));
    }

    #[test]
    fn test_legacy_magic_unsupported() {
        let data = HUFF_NUMBER.to_be_bytes();
        let err = read_header(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_short_magic_is_truncated() {
        let err = read_header(&mut BitReader::from_slice(&[0xfa, 0xce])).unwrap_err();
        assert!(matches!(err, Error::TruncatedTree { bits_read: 0 }));
    }

    #[test]
    fn test_truncated_tree() {
        let tree = tree_for(b"hello world");
        let mut writer = BitWriter::new(Vec::new());
        write_tree(&tree, &mut writer).unwrap();
        let mut data = writer.finish().unwrap();
        data.truncate(data.len() / 2);

        let err = read_tree(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::TruncatedTree { .. }));
    }

    #[test]
    fn test_invalid_symbol() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 0).unwrap();
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(9, 300).unwrap();
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(9, 256).unwrap();
        let data = writer.finish().unwrap();

        let err = read_tree(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { symbol: 300 }));
    }

    #[test]
    fn test_single_leaf_rejected() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(9, 256).unwrap();
        let data = writer.finish().unwrap();

        let err = read_tree(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::DegenerateTree));
    }

    #[test]
    fn test_runaway_nesting_rejected() {
        // nothing but internal-node markers
        let data = vec![0u8; 64];
        let err = read_tree(&mut BitReader::from_slice(&data)).unwrap_err();
        assert!(matches!(err, Error::TreeTooDeep { .. }));
    }
}
