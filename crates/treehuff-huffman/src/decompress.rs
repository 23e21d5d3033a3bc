//! Tree-walking Huffman decompression over bit channels.

use tracing::debug;
use treehuff_core::{BitRead, BitWrite, Error, Result};

use crate::header::read_header;
use crate::tree::CodeNode;
use crate::{BITS_PER_WORD, PSEUDO_EOF};

/// Sizes observed during one decompression run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompressionReport {
    /// Magic number plus serialized tree.
    pub header_bits: u64,
    /// Code bits consumed, terminator included.
    pub payload_bits: u64,
    /// Bytes written to the output.
    pub output_bytes: u64,
    /// Leaves in the decoded tree, pseudo-EOF included.
    pub leaves: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Walking,
    Done,
}

/// Decode `input` into `output`, then close `output`.
///
/// Bytes decoded before a format error is detected have already been
/// written to `output`; callers that must not expose partial data should
/// decode into a scratch buffer.
pub fn decompress<R, W>(input: &mut R, output: &mut W) -> Result<DecompressionReport>
where
    R: BitRead + ?Sized,
    W: BitWrite + ?Sized,
{
    let (tree, header_bits) = read_header(input)?;
    let root = tree.root();

    let mut current = root;
    let mut state = WalkState::Walking;
    let mut payload_bits = 0u64;
    let mut output_bytes = 0u64;

    while state == WalkState::Walking {
        let bit = input
            .read_bits(1)?
            .ok_or_else(|| Error::missing_terminator(output_bytes))?;
        payload_bits += 1;

        // decoded trees are strict, so every walk position is internal
        current = current
            .child(bit)
            .ok_or_else(|| Error::missing_terminator(output_bytes))?;

        if let CodeNode::Leaf { symbol, .. } = current {
            if *symbol == PSEUDO_EOF {
                state = WalkState::Done;
            } else {
                output.write_bits(BITS_PER_WORD, *symbol as u32)?;
                output_bytes += 1;
                current = root;
            }
        }
    }

    output.close()?;

    debug!(header_bits, payload_bits, output_bytes, "payload decoded");
    Ok(DecompressionReport {
        header_bits,
        payload_bits,
        output_bytes,
        leaves: tree.leaf_count(),
    })
}
