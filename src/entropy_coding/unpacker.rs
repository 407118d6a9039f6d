use log::debug;

use super::io::{BitReader, ReadError};
use super::prefix_codes::{Code, CodeTable};
use crate::artifact::Artifact;
use crate::error::{CodecError, Result};
use crate::matrix::SampleMatrix;

/// Decoding trie over the code table's bit strings
#[derive(Debug, Default)]
enum Trie {
    #[default]
    Empty,
    Leaf(u8),
    Branch(Box<Trie>, Box<Trie>),
}

impl Trie {
    fn from_codes(codes: &CodeTable) -> Result<Self> {
        let mut root = Trie::Empty;
        for (value, code) in codes.iter() {
            root.insert(value, code)?;
        }
        Ok(root)
    }

    fn insert(&mut self, value: u8, code: Code) -> Result<()> {
        let conflict = || CodecError::corrupt(format!("code {code} for value {value} clashes with another code"));
        let mut node = self;
        for bit in code.iter() {
            if let Trie::Empty = node {
                *node = Trie::Branch(Box::default(), Box::default());
            }
            node = match node {
                Trie::Branch(left, right) => {
                    if bit == 0 {
                        left.as_mut()
                    } else {
                        right.as_mut()
                    }
                }
                _ => return Err(conflict()),
            };
        }
        match node {
            Trie::Empty => {
                *node = Trie::Leaf(value);
                Ok(())
            }
            _ => Err(conflict()),
        }
    }
}

/// Walks the trie one bit at a time, yielding a value on each leaf
struct TrieDecoder<'a> {
    root: &'a Trie,
    node: &'a Trie,
}

impl<'a> TrieDecoder<'a> {
    fn new(root: &'a Trie) -> Self {
        Self { root, node: root }
    }

    fn update(&mut self, bit: u8) -> Result<Option<u8>> {
        self.node = match (self.node, bit) {
            (Trie::Branch(left, _), 0) => left.as_ref(),
            (Trie::Branch(_, right), _) => right.as_ref(),
            _ => unreachable!("decoder always rests on a branch"),
        };
        match self.node {
            Trie::Leaf(value) => {
                self.node = self.root;
                Ok(Some(*value))
            }
            Trie::Branch(..) => Ok(None),
            Trie::Empty => Err(CodecError::corrupt("bit sequence matches no code")),
        }
    }
}

/// Decodes exactly `width * height` samples from the packed stream.
///
/// The sample count is the stop condition. Whatever follows the last
/// sample must be the zero padding of its byte; anything else (missing
/// bits, dead-end bit paths, extra bytes, non-zero padding) is reported
/// as `CorruptArtifact`.
pub fn unpack(artifact: &Artifact) -> Result<SampleMatrix> {
    let (width, height) = (artifact.width(), artifact.height());
    let samples = width * height;
    if samples == 0 {
        return Ok(SampleMatrix::empty(width, height));
    }

    let max_samples = artifact.packed().len().saturating_mul(8);
    if samples > max_samples {
        return Err(CodecError::corrupt(format!(
            "{samples} samples can't fit in {} packed bytes",
            artifact.packed().len()
        )));
    }

    let trie = Trie::from_codes(artifact.codes())?;
    if !matches!(trie, Trie::Branch(..)) {
        return Err(CodecError::corrupt("no codes to decode samples with"));
    }

    let mut decoder = TrieDecoder::new(&trie);
    let mut reader = BitReader::new(artifact.packed());
    let mut data = Vec::with_capacity(samples);

    while data.len() < samples {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(ReadError::Eof) => {
                return Err(CodecError::corrupt(format!(
                    "packed bits ran out after {} of {} samples",
                    data.len(),
                    samples
                )))
            }
            Err(ReadError::Other(err)) => return Err(err.into()),
        };
        if let Some(value) = decoder.update(bit)? {
            data.push(value);
        }
    }

    if reader.remainder() != 0 {
        return Err(CodecError::corrupt("non-zero padding after the last sample"));
    }
    let trailing = reader.into_inner().len();
    if trailing != 0 {
        return Err(CodecError::corrupt(format!("{trailing} bytes after the last sample")));
    }

    debug!("unpacked {} samples from {} bytes", data.len(), artifact.packed().len());
    SampleMatrix::from_raw(width, height, data)
}
