//! The single error type of the crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// An operation that needs at least one sample got none.
    #[error("input has no samples")]
    EmptyInput,

    /// The packer met a sample the code table has no code for.
    #[error("code table has no code for sample value {value}")]
    InconsistentCodeTable { value: u8 },

    /// The artifact can't be decoded back into a matrix.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    #[error("row {row} has {found} samples, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("buffer of {found} samples doesn't match a {width}x{height} matrix")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found: usize,
    },

    #[error("{width}x{height} matrix exceeds the artifact's 32-bit dimensions")]
    TooLarge { width: usize, height: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CodecError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptArtifact(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
