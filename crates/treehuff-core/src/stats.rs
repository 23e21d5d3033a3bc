//! Statistics for compression operations.

use crate::types::CompressionRatio;

/// Statistics from a compression/decompression operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionStats {
    /// Original (uncompressed) size in bytes.
    pub original_size: usize,

    /// Compressed size in bytes.
    pub compressed_size: usize,

    /// Bits spent on the magic number and serialized code tree.
    pub header_bits: u64,

    /// Bits spent on encoded symbols, terminator included.
    pub payload_bits: u64,

    /// Distinct byte values seen in the original data.
    pub distinct_symbols: usize,

    /// Time taken in microseconds.
    pub time_us: u64,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Average encoded bits per original byte, header excluded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.original_size as f64
    }
}
