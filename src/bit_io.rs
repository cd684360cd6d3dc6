//! Bit-level ports the codec writes to and reads from.
//!
//! All multi-bit values are MSB first. [`BitWriter`] and [`BitReader`] work
//! in memory, [`StreamBitWriter`] and [`StreamBitReader`] adapt any
//! `io::Write` / `io::Read`.

use std::io::{self, Read, Write};

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// Destination for an ordered sequence of bits.
pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> Result<()>;

    /// Pads the trailing partial byte with zero bits and flushes.
    fn close(&mut self) -> Result<()>;

    /// Writes the low `width` bits of `value`.
    fn write_byte(&mut self, value: u8, width: u8) -> Result<()> {
        for bit_pos in (0..width.min(8)).rev() {
            self.write_bit((value >> bit_pos) & 1 != 0)?;
        }
        Ok(())
    }

    fn write_int(&mut self, value: i32) -> Result<()> {
        let value = value as u32;
        for bit_pos in (0..32).rev() {
            self.write_bit((value >> bit_pos) & 1 != 0)?;
        }
        Ok(())
    }

    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }
}

/// Origin of an ordered sequence of bits.
pub trait BitSource {
    /// Next bit, or `None` once the source is exhausted.
    fn next_bit(&mut self) -> Result<Option<bool>>;

    fn is_empty(&mut self) -> Result<bool>;

    /// Like [`BitSource::next_bit`], but running out is an error.
    fn read_bit(&mut self) -> Result<bool> {
        self.next_bit()?
            .ok_or_else(|| HuffmanError::truncated("bit stream"))
    }

    fn read_byte(&mut self, width: u8) -> Result<u8> {
        let mut value = 0u8;
        for _ in 0..width.min(8) {
            value = (value << 1) | u8::from(self.read_bit()?);
        }
        Ok(value)
    }

    fn read_int(&mut self) -> Result<i32> {
        let mut value = 0u32;
        for _ in 0..32 {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value as i32)
    }
}

impl<S: BitSink + ?Sized> BitSink for &mut S {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        (**self).write_bit(bit)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn next_bit(&mut self) -> Result<Option<bool>> {
        (**self).next_bit()
    }

    fn is_empty(&mut self) -> Result<bool> {
        (**self).is_empty()
    }
}

/// In-memory sink.
#[derive(Default, Debug, Clone)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            bits: BitVec::new(),
        }
    }

    /// Bits written so far, padding included once closed.
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// Pads to a byte boundary and hands back the bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.pad();
        self.bits.into_vec()
    }

    fn pad(&mut self) {
        let padding = (8 - self.bits.len() % 8) % 8;
        self.bits.resize(self.bits.len() + padding, false);
    }
}

impl BitSink for BitWriter {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.bits.push(bit);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.pad();
        Ok(())
    }

    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        self.bits.extend_from_bitslice(bits);
        Ok(())
    }
}

/// In-memory source over a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::from_bits(bytes.view_bits::<Msb0>())
    }

    pub fn from_bits(bits: &'a BitSlice<u8, Msb0>) -> Self {
        BitReader { bits, position: 0 }
    }

    /// Number of bits consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }
}

impl BitSource for BitReader<'_> {
    fn next_bit(&mut self) -> Result<Option<bool>> {
        let bit = self.bits.get(self.position).map(|bit| *bit);
        if bit.is_some() {
            self.position += 1;
        }
        Ok(bit)
    }

    fn is_empty(&mut self) -> Result<bool> {
        Ok(self.remaining() == 0)
    }
}

/// Sink over a byte stream. Bits are packed into bytes as they arrive.
///
/// Dropping the writer closes it, so a partial trailing byte is never lost.
/// Call [`BitSink::close`] explicitly to observe flush errors.
#[derive(Debug)]
pub struct StreamBitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u8,
}

impl<W: Write> StreamBitWriter<W> {
    pub fn new(inner: W) -> Self {
        StreamBitWriter {
            inner,
            current: 0,
            filled: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn emit(&mut self) -> io::Result<()> {
        self.inner.write_all(&[self.current])?;
        self.current = 0;
        self.filled = 0;
        Ok(())
    }
}

impl<W: Write> BitSink for StreamBitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.emit()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.filled > 0 {
            self.current <<= 8 - self.filled;
            self.emit()?;
        }
        self.inner.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for StreamBitWriter<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Source over a byte stream, pulled one byte at a time.
#[derive(Debug)]
pub struct StreamBitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
    eof: bool,
}

impl<R: Read> StreamBitReader<R> {
    pub fn new(inner: R) -> Self {
        StreamBitReader {
            inner,
            current: 0,
            remaining: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.remaining > 0 || self.eof {
            return Ok(());
        }
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => {
                self.current = byte[0];
                self.remaining = 8;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl<R: Read> BitSource for StreamBitReader<R> {
    fn next_bit(&mut self) -> Result<Option<bool>> {
        self.fill()?;
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1 != 0))
    }

    fn is_empty(&mut self) -> Result<bool> {
        self.fill()?;
        Ok(self.remaining == 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bits_are_packed_msb_first() {
        let mut writer = BitWriter::new();
        writer.write_bit(true).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        writer.close().unwrap();

        assert_eq!(writer.bit_count(), 8);
        assert_eq!(writer.into_bytes(), vec![0b1010_0000]);
    }

    #[test]
    fn narrow_bytes_and_ints() {
        let mut writer = BitWriter::new();
        writer.write_byte(0b10110, 5).unwrap();
        writer.write_int(-2).unwrap();
        writer.write_int(11).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 9);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_byte(5).unwrap(), 0b10110);
        assert_eq!(reader.read_int().unwrap(), -2);
        assert_eq!(reader.read_int().unwrap(), 11);
        assert_eq!(reader.position(), 69);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn reading_past_the_end_is_an_error() {
        let mut reader = BitReader::new(&[0xff]);
        assert_eq!(reader.read_byte(8).unwrap(), 0xff);
        assert!(reader.is_empty().unwrap());
        assert_eq!(reader.next_bit().unwrap(), None);
        assert!(matches!(
            reader.read_bit(),
            Err(HuffmanError::Truncated { .. })
        ));
    }

    fn write_sample(sink: &mut dyn BitSink) {
        sink.write_bit(true).unwrap();
        sink.write_byte(b'x', 8).unwrap();
        sink.write_int(1234).unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn stream_writer_matches_in_memory_writer() {
        let mut memory = BitWriter::new();
        write_sample(&mut memory);

        let mut out = Vec::new();
        {
            let mut stream = StreamBitWriter::new(&mut out);
            write_sample(&mut stream);
        }
        assert_eq!(out, memory.into_bytes());
    }

    #[test]
    fn stream_writer_flushes_on_drop() {
        let mut out = Vec::new();
        {
            let mut stream = StreamBitWriter::new(&mut out);
            stream.write_bit(true).unwrap();
            stream.write_bit(true).unwrap();
            assert!(stream.get_ref().is_empty());
        }
        assert_eq!(out, vec![0b1100_0000]);
    }

    #[test]
    fn stream_reader_walks_bytes() {
        let data = [0b1000_0001u8, 0x7f];
        let mut reader = StreamBitReader::new(&data[..]);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_byte(7).unwrap(), 0b000_0001);
        assert_eq!(reader.read_byte(8).unwrap(), 0x7f);
        assert!(reader.is_empty().unwrap());
        assert!(reader.read_bit().is_err());
        assert!(reader.into_inner().is_empty());
    }
}
