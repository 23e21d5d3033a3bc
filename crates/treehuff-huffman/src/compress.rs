//! Two-pass Huffman compression over bit channels.

use tracing::debug;
use treehuff_core::{BitRead, BitWrite, Error, Result};

use crate::frequency::FrequencyTable;
use crate::header::write_header;
use crate::table::CodeTable;
use crate::tree::CodeTree;
use crate::{BITS_PER_WORD, PSEUDO_EOF};

/// Sizes observed during one compression run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionReport {
    /// Bytes read from the input in the encoding pass.
    pub input_bytes: u64,
    /// Bytes written, final padding included.
    pub output_bytes: u64,
    /// Magic number plus serialized tree.
    pub header_bits: u64,
    /// Encoded symbols plus terminator.
    pub payload_bits: u64,
    /// Distinct byte values in the input.
    pub distinct_symbols: usize,
}

impl CompressionReport {
    /// Total bits written before padding.
    pub fn total_bits(&self) -> u64 {
        self.header_bits + self.payload_bits
    }
}

/// Compress everything `input` yields into `output`, then close `output`.
///
/// Reads the input twice: once to count byte frequencies and, after a
/// rewind, once more to encode. The input is rewound again before
/// returning.
pub fn compress<R, W>(input: &mut R, output: &mut W) -> Result<CompressionReport>
where
    R: BitRead + ?Sized,
    W: BitWrite + ?Sized,
{
    let frequencies = FrequencyTable::scan(input)?;
    input.reset()?;

    let tree = CodeTree::build(&frequencies);
    let table = CodeTable::from_tree(&tree);

    let header_bits = write_header(&tree, output)?;

    let mut input_bytes = 0u64;
    let mut payload_bits = 0u64;
    while let Some(word) = input.read_bits(BITS_PER_WORD)? {
        let code = table
            .get(word as u16)
            .ok_or_else(|| Error::io(format!("byte {} changed between passes", word)))?;
        code.write_to(output)?;
        payload_bits += code.len() as u64;
        input_bytes += 1;
    }
    input.reset()?;

    if input_bytes != frequencies.total() {
        return Err(Error::io(format!(
            "input changed between passes: counted {} bytes, encoded {}",
            frequencies.total(),
            input_bytes
        )));
    }

    let eof = table
        .get(PSEUDO_EOF)
        .ok_or_else(|| Error::io("pseudo-EOF missing from code table"))?;
    eof.write_to(output)?;
    payload_bits += eof.len() as u64;

    output.close()?;

    let report = CompressionReport {
        input_bytes,
        output_bytes: (header_bits + payload_bits).div_ceil(8),
        header_bits,
        payload_bits,
        distinct_symbols: frequencies.distinct(),
    };
    debug!(
        symbols = input_bytes,
        header_bits,
        payload_bits,
        output_bytes = report.output_bytes,
        "payload encoded"
    );
    Ok(report)
}
