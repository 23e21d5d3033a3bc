//! One-shot Huffman codec over byte slices.

use std::sync::Mutex;
use std::time::Instant;

use tracing::trace;
use treehuff_core::{
    BitReader, BitWriter, Codec, CompressionStats, Compressor, Decompressor, Result,
};

use crate::compress::{compress, CompressionReport};
use crate::decompress::decompress;
use crate::{ALPH_SIZE, BITS_PER_INT, MAX_TREE_DEPTH, SYMBOL_BITS};

/// Largest serialized tree: 257 leaves and 256 internal nodes.
const MAX_TREE_BITS: u64 = (ALPH_SIZE as u64 + 1) * (1 + SYMBOL_BITS as u64) + ALPH_SIZE as u64;

/// Upper bound on the code length of any symbol in a tree of `total_weight`.
///
/// A Huffman tree of depth `d` with positive leaf weights weighs at least
/// `F(d + 2)`, so the depth is bounded by the Fibonacci index of the weight.
fn max_code_length(total_weight: u64) -> u64 {
    let (mut prev, mut next) = (1u64, 2u64);
    let mut depth = 1u64;
    while next <= total_weight && depth < MAX_TREE_DEPTH as u64 {
        let sum = prev.saturating_add(next);
        prev = next;
        next = sum;
        depth += 1;
    }
    // one level of slack for the zero-weight filler leaf
    (depth + 1).min(MAX_TREE_DEPTH as u64)
}

/// Huffman codec.
#[derive(Debug, Default)]
pub struct HuffmanCodec {
    last_stats: Mutex<Option<CompressionStats>>,
}

impl HuffmanCodec {
    /// Create a new Huffman codec.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, stats: CompressionStats) {
        if let Ok(mut slot) = self.last_stats.lock() {
            *slot = Some(stats);
        }
    }

    /// Compress and return the per-run report alongside the output.
    pub fn compress_with_report(&self, input: &[u8]) -> Result<(Vec<u8>, CompressionReport)> {
        let start = Instant::now();
        let mut reader = BitReader::from_slice(input);
        let mut writer = BitWriter::new(Vec::with_capacity(input.len() / 2 + 64));
        let report = compress(&mut reader, &mut writer)?;
        let output = writer.finish()?;

        let stats = CompressionStats {
            original_size: input.len(),
            compressed_size: output.len(),
            header_bits: report.header_bits,
            payload_bits: report.payload_bits,
            distinct_symbols: report.distinct_symbols,
            time_us: start.elapsed().as_micros() as u64,
        };
        trace!(
            input = input.len(),
            output = output.len(),
            ratio = stats.ratio().ratio(),
            bits_per_symbol = stats.bits_per_symbol(),
            "huffman compress"
        );
        self.record(stats);
        Ok((output, report))
    }
}

impl Compressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_report(input).map(|(output, _)| output)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        let symbols = input_len as u64 + 1;
        let bits = BITS_PER_INT as u64 + MAX_TREE_BITS + symbols * max_code_length(symbols);
        bits.div_ceil(8) as usize
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.last_stats.lock().ok().and_then(|s| s.clone())
    }
}

impl Decompressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    /// Decode into a scratch buffer so a malformed stream yields no output.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut reader = BitReader::from_slice(input);
        let mut writer = BitWriter::new(Vec::with_capacity(input.len() * 2));
        let report = decompress(&mut reader, &mut writer)?;
        let output = writer.finish()?;

        self.record(CompressionStats {
            original_size: output.len(),
            compressed_size: input.len(),
            header_bits: report.header_bits,
            payload_bits: report.payload_bits,
            distinct_symbols: report.leaves.saturating_sub(1),
            time_us: start.elapsed().as_micros() as u64,
        });
        trace!(input = input.len(), output = output.len(), "huffman decompress");
        Ok(output)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.last_stats.lock().ok().and_then(|s| s.clone())
    }
}

impl Codec for HuffmanCodec {
    fn new() -> Self {
        HuffmanCodec::new()
    }
}
