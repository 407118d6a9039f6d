//! MSB-first bit IO over `std::io` streams.
//!
//! The first bit written lands in the highest bit of the first byte. A
//! partially filled last byte is padded with zeros on `finish`.

use core::slice;
use std::io::{self, ErrorKind, Read, Write};

/// Up to 8 bits waiting to be written, or left over from the last read byte
#[derive(Debug, Default)]
struct BitQueue {
    /// Byte buffer
    t: u8,
    /// Number of bits being held
    count: u32,
}

impl BitQueue {
    fn push(&mut self, bit: u8) {
        debug_assert!(bit <= 1, "Tried to push invalid bit");
        debug_assert!(!self.is_full());
        self.t = (self.t << 1) | bit;
        self.count += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.count -= 1;
        Some((self.t >> self.count) & 1)
    }

    fn fill(&mut self, byte: u8) {
        debug_assert!(self.is_empty());
        self.t = byte;
        self.count = u8::BITS;
    }

    /// Takes the byte once 8 bits are queued
    fn try_take(&mut self) -> Option<u8> {
        if !self.is_full() {
            return None;
        }
        self.count = 0;
        Some(self.t)
    }

    /// Queued bits shifted into the high end of a byte, low bits zeroed
    fn padded(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.t << (u8::BITS - self.count);
        self.count = 0;
        Some(byte)
    }

    /// The still unread bits, right-aligned
    fn remainder(&self) -> u8 {
        self.t & ((1u16 << self.count) - 1) as u8
    }

    fn is_full(&self) -> bool {
        self.count == u8::BITS
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Writes bits to an inner `Write`, one byte at a time
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    queue: BitQueue,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, queue: BitQueue::default(), bits_written: 0 }
    }

    pub fn write_bit(&mut self, bit: u8) -> io::Result<()> {
        self.queue.push(bit);
        self.bits_written += 1;
        match self.queue.try_take() {
            Some(byte) => self.inner.write_all(&[byte]),
            None => Ok(()),
        }
    }

    /// Total bits written so far, padding excluded
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the last byte with zeros, flushes and returns the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(byte) = self.queue.padded() {
            self.inner.write_all(&[byte])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[derive(Debug)]
pub enum ReadError {
    Eof,
    Other(io::Error),
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => Self::Eof,
            _ => Self::Other(err),
        }
    }
}

/// Reads bits from an inner `Read`, one byte at a time
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    queue: BitQueue,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, queue: BitQueue::default() }
    }

    /// Reads the next bit or `ReadError::Eof` once the stream is exhausted
    pub fn read_bit(&mut self) -> Result<u8, ReadError> {
        if let Some(bit) = self.queue.pop() {
            return Ok(bit);
        }

        let mut byte = 0;
        self.inner.read_exact(slice::from_mut(&mut byte))?;
        self.queue.fill(byte);
        Ok(self.queue.pop().unwrap_or_default())
    }

    /// Unread bits of the current byte, right-aligned
    pub fn remainder(&self) -> u8 {
        self.queue.remainder()
    }

    /// Returns the inner reader, dropping any unread bits of the current byte
    pub fn into_inner(self) -> R {
        self.inner
    }
}
