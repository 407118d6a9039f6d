//! Lossless Huffman compression of grayscale sample matrices.
//!
//! ```ignore
//! let matrix = SampleMatrix::from_rows(&[[10u8, 10], [20, 30]])?;
//! let artifact = huffpix::compress(&matrix)?;
//! assert_eq!(huffpix::decompress(&artifact)?, matrix);
//! ```

pub mod artifact;
pub mod codec;
pub mod entropy_coding;
pub mod error;
pub mod grayscale;
pub mod macros;
pub mod matrix;

pub use artifact::{Artifact, CompressionStats};
pub use codec::{compress, decompress};
pub use error::{CodecError, Result};
pub use grayscale::GrayscaleRule;
pub use matrix::SampleMatrix;
