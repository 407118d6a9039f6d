//! The compressed artifact and its private wire format.
//!
//! All integers are big-endian, code and payload bits MSB-first:
//!
//! ```text
//! magic       4 bytes  "HPX1"
//! width       u32
//! height      u32
//! entries     u16      code table size, 0..=256
//! entry *     value u8, len u8 (1..=128), ceil(len / 8) code bytes,
//!             left-aligned with zero low bits
//! packed_len  u64
//! packed      packed_len bytes
//! ```
//!
//! Entries are written in ascending value order.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::{u16, u64, usize};
use crate::entropy_coding::prefix_codes::{Code, CodeTable, MAX_CODE_LEN};
use crate::error::{CodecError, Result};

pub const MAGIC: &[u8; 4] = b"HPX1";

/// Matrix dimensions, decoding table and packed code bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    width: u32,
    height: u32,
    codes: CodeTable,
    packed: Vec<u8>,
}

impl Artifact {
    /// Fails with `TooLarge` if a dimension doesn't fit the wire format
    pub fn new(width: usize, height: usize, codes: CodeTable, packed: Vec<u8>) -> Result<Self> {
        let too_large = || CodecError::TooLarge { width, height };
        let w = u32::try_from(width).map_err(|_| too_large())?;
        let h = u32::try_from(height).map_err(|_| too_large())?;
        // the decoder materializes width * height samples
        usize::try_from(u64::from(w) * u64::from(h)).map_err(|_| too_large())?;
        Ok(Self { width: w, height: h, codes, packed })
    }

    pub fn width(&self) -> usize {
        usize!(self.width)
    }

    pub fn height(&self) -> usize {
        usize!(self.height)
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn packed(&self) -> &[u8] {
        &self.packed
    }

    /// The packed stream as a string of '0'/'1', padding included
    pub fn bit_string(&self) -> String {
        self.packed.iter().map(|byte| format!("{byte:08b}")).collect()
    }

    pub fn stats(&self) -> CompressionStats {
        let samples = u64::from(self.width) * u64::from(self.height);
        let packed_bytes = u64!(self.packed.len());
        let artifact_bytes = self.encoded_len();
        let ratio = |bytes: u64| if samples == 0 { 0.0 } else { bytes as f64 / samples as f64 };
        CompressionStats {
            samples,
            raw_bytes: samples,
            packed_bytes,
            artifact_bytes,
            bits_per_sample: ratio(packed_bytes) * 8.0,
            ratio: ratio(artifact_bytes),
        }
    }

    /// Size of the serialized artifact in bytes
    pub fn encoded_len(&self) -> u64 {
        let table: u64 = self.codes.iter().map(|(_, code)| 2 + u64::from(code_bytes(code.len()))).sum();
        4 + 4 + 4 + 2 + table + 8 + u64!(self.packed.len())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(usize!(self.encoded_len()));
        self.write_to(&mut buf).unwrap_or_else(|_| unreachable!("writing to a Vec can't fail"));
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let artifact = Self::read_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(CodecError::corrupt(format!("{} bytes after the packed data", reader.len())));
        }
        Ok(artifact)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&self.width.to_be_bytes())?;
        writer.write_all(&self.height.to_be_bytes())?;
        writer.write_all(&u16!(self.codes.len()).to_be_bytes())?;

        for (value, code) in self.codes.iter() {
            let len = code.len();
            let aligned = code.bits() << (MAX_CODE_LEN - len);
            let bytes = aligned.to_be_bytes();
            writer.write_all(&[value, len])?;
            writer.write_all(&bytes[..usize::from(code_bytes(len))])?;
        }

        writer.write_all(&u64!(self.packed.len()).to_be_bytes())?;
        writer.write_all(&self.packed)?;
        Ok(())
    }

    /// Reads one artifact, leaving the reader right after it
    pub fn read_from(reader: &mut impl Read) -> Result<Self> {
        let mut magic = [0; 4];
        read_exact(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(CodecError::corrupt("not a huffpix artifact (bad magic)"));
        }

        let width = u32::from_be_bytes(read_array(reader)?);
        let height = u32::from_be_bytes(read_array(reader)?);
        let entries = u16::from_be_bytes(read_array(reader)?);
        if entries > 256 {
            return Err(CodecError::corrupt(format!("{entries} code table entries, at most 256 allowed")));
        }

        let mut codes = Vec::with_capacity(usize::from(entries));
        for _ in 0..entries {
            let [value, len] = read_array::<2>(reader)?;
            if len == 0 || len > MAX_CODE_LEN {
                return Err(CodecError::corrupt(format!("code length {len} for value {value}")));
            }
            let mut bytes = [0; 16];
            read_exact(reader, &mut bytes[..usize::from(code_bytes(len))])?;
            let aligned = u128::from_be_bytes(bytes);
            let unused = MAX_CODE_LEN - len;
            if aligned & ((1u128 << unused) - 1) != 0 {
                return Err(CodecError::corrupt(format!("non-zero padding in the code of value {value}")));
            }
            let code = Code::new(aligned >> unused, len)
                .ok_or_else(|| CodecError::corrupt(format!("invalid code for value {value}")))?;
            codes.push((value, code));
        }
        let codes = CodeTable::from_entries(codes)
            .map_err(|value| CodecError::corrupt(format!("value {value} has two codes")))?;

        let packed_len = u64::from_be_bytes(read_array(reader)?);
        // every sample costs at least one bit
        let samples = u64::from(width) * u64::from(height);
        if samples > packed_len.saturating_mul(8) {
            return Err(CodecError::corrupt(format!("{samples} samples can't fit in {packed_len} packed bytes")));
        }
        let mut packed = Vec::new();
        let read = reader.take(packed_len).read_to_end(&mut packed)?;
        if u64!(read) != packed_len {
            return Err(CodecError::corrupt(format!("packed data truncated, {read} of {packed_len} bytes")));
        }

        Self::new(usize!(width), usize!(height), codes, packed)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let artifact = Self::read_from(&mut reader)?;
        let mut rest = [0; 1];
        if reader.read(&mut rest)? != 0 {
            return Err(CodecError::corrupt("trailing bytes after the packed data"));
        }
        Ok(artifact)
    }
}

/// Bytes needed for a code of `len` bits
fn code_bytes(len: u8) -> u8 {
    len.div_ceil(8)
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => CodecError::corrupt("artifact truncated"),
        _ => err.into(),
    })
}

fn read_array<const N: usize>(reader: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0; N];
    read_exact(reader, &mut buf)?;
    Ok(buf)
}

/// Size figures of one compression
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionStats {
    pub samples: u64,
    /// One byte per sample
    pub raw_bytes: u64,
    pub packed_bytes: u64,
    /// Packed bytes plus header and code table
    pub artifact_bytes: u64,
    pub bits_per_sample: f64,
    /// `artifact_bytes / raw_bytes`
    pub ratio: f64,
}
