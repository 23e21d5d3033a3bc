//! Byte frequency counting.

use tracing::debug;
use treehuff_core::{BitRead, Result};

use crate::{Symbol, ALPH_SIZE, BITS_PER_WORD, PSEUDO_EOF};

/// Occurrence count for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPH_SIZE],
}

impl FrequencyTable {
    /// Create an all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPH_SIZE],
        }
    }

    /// Count the bytes of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.record(byte);
        }
        table
    }

    /// Count 8-bit words until the channel reports end of stream.
    ///
    /// The channel is left at its end; callers rewind it before the next pass.
    pub fn scan<R: BitRead + ?Sized>(input: &mut R) -> Result<Self> {
        let mut table = Self::new();
        while let Some(word) = input.read_bits(BITS_PER_WORD)? {
            table.record(word as u8);
        }
        debug!(
            bytes = table.total(),
            distinct = table.distinct(),
            "frequency pass complete"
        );
        Ok(table)
    }

    /// Count one occurrence of `byte`.
    #[inline]
    pub fn record(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
    }

    /// Occurrences of `byte`.
    #[inline]
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Tree weight of `symbol`. The pseudo-EOF always weighs 1.
    pub fn weight(&self, symbol: Symbol) -> u64 {
        if symbol == PSEUDO_EOF {
            1
        } else {
            self.counts.get(symbol as usize).copied().unwrap_or(0)
        }
    }

    /// Total bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Seen byte values with their counts, in byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

impl From<[u64; ALPH_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPH_SIZE]) -> Self {
        Self { counts }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treehuff_core::BitReader;

    #[test]
    fn test_scan_counts_bytes() {
        let data = b"AAB";
        let mut reader = BitReader::from_slice(data);
        let table = FrequencyTable::scan(&mut reader).unwrap();

        assert_eq!(table.count(b'A'), 2);
        assert_eq!(table.count(b'B'), 1);
        assert_eq!(table.count(b'C'), 0);
        assert_eq!(table.total(), 3);
        assert_eq!(table.distinct(), 2);
        assert_eq!(table, FrequencyTable::from_bytes(data));
    }

    #[test]
    fn test_scan_empty() {
        let mut reader = BitReader::from_slice(&[]);
        let table = FrequencyTable::scan(&mut reader).unwrap();
        assert_eq!(table.total(), 0);
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_pseudo_eof_weight() {
        let table = FrequencyTable::from_bytes(b"xyz");
        assert_eq!(table.weight(PSEUDO_EOF), 1);
        assert_eq!(table.weight(b'x' as Symbol), 1);
        assert_eq!(table.weight(b'a' as Symbol), 0);
    }

    #[test]
    fn test_iter_in_byte_order() {
        let table = FrequencyTable::from_bytes(&[200, 3, 3, 0]);
        let seen: Vec<_> = table.iter().collect();
        assert_eq!(seen, vec![(0, 1), (3, 2), (200, 1)]);
    }

    #[test]
    fn test_all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        let table = FrequencyTable::from_bytes(&data);
        assert_eq!(table.distinct(), 256);
        assert!(table.iter().all(|(_, c)| c == 1));
    }
}
