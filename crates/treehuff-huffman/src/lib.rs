//! # treehuff Huffman
//!
//! Two-pass Huffman compression of arbitrary byte streams.
//!
//! The compressor counts byte frequencies, builds a prefix code tree from
//! them, writes the tree into the output header and then re-reads the input
//! to emit one code per byte followed by the code of a pseudo-EOF symbol.
//! The decompressor rebuilds the tree from the header and walks it bit by
//! bit until it reaches the pseudo-EOF leaf.
//!
//! ## Wire Format
//!
//! ```text
//! [32-bit magic 0xFACE8201]
//! [tree, pre-order: '0' per internal node, '1' + 9-bit symbol per leaf]
//! [one code per input byte]
//! [code of symbol 256 (pseudo-EOF)]
//! [zero padding to a byte boundary]
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use treehuff_core::{BitReader, BitWriter, Codec};
//! use treehuff_huffman::{compress, decompress, HuffmanCodec};
//!
//! // One-shot, in memory
//! let codec = HuffmanCodec::new();
//! let packed = codec.compress(b"hello huffman")?;
//! assert_eq!(codec.decompress(&packed)?, b"hello huffman");
//!
//! // Over bit channels
//! let mut input = BitReader::from_slice(data);
//! let mut output = BitWriter::new(Vec::new());
//! let report = compress(&mut input, &mut output)?;
//! ```

pub mod codec;
pub mod compress;
pub mod decompress;
pub mod frequency;
pub mod header;
pub mod table;
pub mod tree;

/// A coded symbol: a byte value or [`PSEUDO_EOF`].
pub type Symbol = u16;

/// Bits per input/output word.
pub const BITS_PER_WORD: u8 = 8;

/// Bits in the magic number.
pub const BITS_PER_INT: u8 = 32;

/// Number of literal byte symbols.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

/// Sentinel symbol marking the logical end of the payload.
pub const PSEUDO_EOF: Symbol = ALPH_SIZE as Symbol;

/// Width of a leaf symbol in the tree header.
pub const SYMBOL_BITS: u8 = BITS_PER_WORD + 1;

/// Deepest leaf a tree over 257 symbols can have.
pub const MAX_TREE_DEPTH: usize = ALPH_SIZE;

// Re-export main types
pub use codec::HuffmanCodec;
pub use compress::{compress, CompressionReport};
pub use decompress::{decompress, DecompressionReport};
pub use frequency::FrequencyTable;
pub use header::{read_header, write_header, HUFF_NUMBER, HUFF_TREE};
pub use table::{Code, CodeTable};
pub use tree::{CodeNode, CodeTree};
