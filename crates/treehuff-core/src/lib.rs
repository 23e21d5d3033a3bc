//! # treehuff core
//!
//! Core traits, error types, configuration and bit-level I/O shared by the
//! treehuff crates.
//!
//! ## Core Traits
//!
//! - [`Compressor`] - One-shot compression operations
//! - [`Decompressor`] - One-shot decompression operations
//! - [`Codec`] - Combined compress/decompress capability
//! - [`BitRead`] / [`BitWrite`] - Bit channels the Huffman coder runs over
//!
//! ## Example
//!
//! ```ignore
//! use treehuff_core::Codec;
//! use treehuff_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(data)?;
//! let original = codec.decompress(&compressed)?;
//! ```

pub mod bits;
pub mod config;
pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

pub use bits::{BitRead, BitReader, BitWrite, BitWriter};
pub use config::StreamConfig;
pub use error::{Error, Result};
pub use stats::CompressionStats;
pub use traits::{Codec, Compressor, Decompressor};
pub use types::CompressionRatio;
