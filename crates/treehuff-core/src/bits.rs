//! Bit-granular I/O over byte streams.
//!
//! Bits are packed most-significant first within each byte, so a 32-bit
//! value written with [`BitWrite::write_bits`] appears big-endian in the
//! output. The final partial byte is padded with zero bits on close.

use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// Widest value a single call may move.
pub const MAX_WIDTH: u8 = 32;

/// Read side of a bit channel.
pub trait BitRead {
    /// Read the next `width` bits as an unsigned value.
    ///
    /// Returns `Ok(None)` once the stream cannot supply `width` more bits.
    fn read_bits(&mut self, width: u8) -> Result<Option<u32>>;

    /// Rewind to the start of the stream for another pass.
    fn reset(&mut self) -> Result<()>;
}

/// Write side of a bit channel.
pub trait BitWrite {
    /// Write the low `width` bits of `value`.
    fn write_bits(&mut self, width: u8, value: u32) -> Result<()>;

    /// Pad to a byte boundary and flush. Further writes fail.
    fn close(&mut self) -> Result<()>;
}

impl<T: BitRead + ?Sized> BitRead for &mut T {
    fn read_bits(&mut self, width: u8) -> Result<Option<u32>> {
        (**self).read_bits(width)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

impl<T: BitWrite + ?Sized> BitWrite for &mut T {
    fn write_bits(&mut self, width: u8, value: u32) -> Result<()> {
        (**self).write_bits(width, value)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

fn check_width(width: u8) -> Result<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("bit width {} outside 1..={}", width, MAX_WIDTH),
        )));
    }
    Ok(())
}

#[inline]
fn low_mask(bits: u8) -> u64 {
    (1u64 << bits) - 1
}

/// Bit reader over any seekable byte source.
pub struct BitReader<R> {
    inner: R,
    bit_buf: u64,
    bit_count: u8,
    bits_read: u64,
}

impl<R: Read + Seek> BitReader<R> {
    /// Create a new bit reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bit_buf: 0,
            bit_count: 0,
            bits_read: 0,
        }
    }

    /// Total bits handed out since creation or the last reset.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Consume the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Ensure at least `n` bits are buffered. Returns false at end of input.
    fn fill(&mut self, n: u8) -> Result<bool> {
        let mut byte = [0u8; 1];
        while self.bit_count < n {
            let got = loop {
                match self.inner.read(&mut byte) {
                    Ok(got) => break got,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            if got == 0 {
                return Ok(false);
            }
            self.bit_buf = (self.bit_buf << 8) | byte[0] as u64;
            self.bit_count += 8;
        }
        Ok(true)
    }
}

impl<'a> BitReader<Cursor<&'a [u8]>> {
    /// Create a bit reader over an in-memory buffer.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> BitRead for BitReader<R> {
    fn read_bits(&mut self, width: u8) -> Result<Option<u32>> {
        check_width(width)?;
        if !self.fill(width)? {
            return Ok(None);
        }
        let shift = self.bit_count - width;
        let value = (self.bit_buf >> shift) & low_mask(width);
        self.bit_count = shift;
        self.bit_buf &= low_mask(shift);
        self.bits_read += width as u64;
        Ok(Some(value as u32))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.bit_buf = 0;
        self.bit_count = 0;
        self.bits_read = 0;
        Ok(())
    }
}

/// Bit writer over any byte sink.
pub struct BitWriter<W: Write> {
    inner: W,
    bit_buf: u64,
    bit_count: u8,
    bits_written: u64,
    closed: bool,
}

impl<W: Write> BitWriter<W> {
    /// Create a new bit writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bit_buf: 0,
            bit_count: 0,
            bits_written: 0,
            closed: false,
        }
    }

    /// Total bits accepted, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Bytes the output occupies once closed.
    pub fn byte_len(&self) -> u64 {
        self.bits_written.div_ceil(8)
    }

    /// Close the writer and return the underlying sink.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitWrite for BitWriter<W> {
    fn write_bits(&mut self, width: u8, value: u32) -> Result<()> {
        check_width(width)?;
        if self.closed {
            return Err(Error::io("write to closed bit stream"));
        }

        self.bit_buf = (self.bit_buf << width) | (value as u64 & low_mask(width));
        self.bit_count += width;
        self.bits_written += width as u64;

        let mut out = [0u8; 5];
        let mut len = 0;
        while self.bit_count >= 8 {
            self.bit_count -= 8;
            out[len] = (self.bit_buf >> self.bit_count) as u8;
            len += 1;
        }
        self.bit_buf &= low_mask(self.bit_count);

        if len > 0 {
            self.inner.write_all(&out[..len])?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.bit_count > 0 {
            let byte = (self.bit_buf << (8 - self.bit_count)) as u8;
            self.inner.write_all(&[byte])?;
            self.bit_buf = 0;
            self.bit_count = 0;
        }
        self.inner.flush()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reader_basic() {
        let data = [0b10110100, 0b11001010];
        let mut reader = BitReader::from_slice(&data);

        assert_eq!(reader.read_bits(4).unwrap(), Some(0b1011));
        assert_eq!(reader.read_bits(4).unwrap(), Some(0b0100));
        assert_eq!(reader.read_bits(8).unwrap(), Some(0b11001010));
        assert_eq!(reader.read_bits(1).unwrap(), None);
        assert_eq!(reader.bits_read(), 16);
    }

    #[test]
    fn test_bit_reader_partial_word_is_eof() {
        let data = [0xff];
        let mut reader = BitReader::from_slice(&data);
        assert_eq!(reader.read_bits(3).unwrap(), Some(0b111));
        // five bits remain, so a nine bit read cannot be satisfied
        assert_eq!(reader.read_bits(9).unwrap(), None);
    }

    #[test]
    fn test_bit_reader_reset() {
        let data = [0xab, 0xcd];
        let mut reader = BitReader::from_slice(&data);
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xab));
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xcd));
        assert_eq!(reader.read_bits(8).unwrap(), None);

        reader.reset().unwrap();
        assert_eq!(reader.bits_read(), 0);
        assert_eq!(reader.read_bits(16).unwrap(), Some(0xabcd));
    }

    #[test]
    fn test_bit_writer_basic() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(4, 0b1011).unwrap();
        writer.write_bits(4, 0b0100).unwrap();
        writer.write_bits(8, 0b11001010).unwrap();

        let data = writer.finish().unwrap();
        assert_eq!(data, vec![0b10110100, 0b11001010]);
    }

    #[test]
    fn test_bit_writer_pads_final_byte() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(3, 0b101).unwrap();
        assert_eq!(writer.bits_written(), 3);
        assert_eq!(writer.byte_len(), 1);
        assert_eq!(writer.finish().unwrap(), vec![0b10100000]);
    }

    #[test]
    fn test_bit_writer_masks_high_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(4, 0xfff3).unwrap();
        writer.write_bits(4, 0).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0x30]);
    }

    #[test]
    fn test_full_width_words() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(32, 0xface_8201).unwrap();
        let data = writer.finish().unwrap();
        assert_eq!(data.len(), 5);

        let mut reader = BitReader::from_slice(&data);
        assert_eq!(reader.read_bits(1).unwrap(), Some(1));
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xface_8201));
    }

    #[test]
    fn test_invalid_width_rejected() {
        let mut writer = BitWriter::new(Vec::new());
        assert!(writer.write_bits(0, 1).is_err());
        assert!(writer.write_bits(33, 1).is_err());

        let mut reader = BitReader::from_slice(&[0u8; 8]);
        assert!(reader.read_bits(33).is_err());
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(8, 7).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(writer.write_bits(1, 1).is_err());
    }
}
