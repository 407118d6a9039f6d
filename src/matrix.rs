use crate::error::{CodecError, Result};

/// A rectangular grid of 8-bit intensity samples, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SampleMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl SampleMatrix {
    /// Builds a matrix from rows, which must all have the same length
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(width * rows.len());

        for (row, samples) in rows.iter().enumerate() {
            let samples = samples.as_ref();
            if samples.len() != width {
                return Err(CodecError::RaggedMatrix { row, expected: width, found: samples.len() });
            }
            data.extend_from_slice(samples);
        }

        Ok(Self { width, height: rows.len(), data })
    }

    /// Wraps a row-major sample buffer of exactly `width * height` samples
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height);
        if expected != Some(data.len()) {
            return Err(CodecError::DimensionMismatch { width, height, found: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// An empty matrix that still remembers its (degenerate) dimensions
    pub(crate) fn empty(width: usize, height: usize) -> Self {
        debug_assert!(width == 0 || height == 0);
        Self { width, height, data: Vec::new() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples, `width * height`
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Samples in row-major order
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on 0, and a 0-wide matrix has no samples anyway
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
