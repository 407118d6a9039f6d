//! Huffman coding of sample matrices.
//!
//! matrix -> `FrequencyTable` -> `HuffmanTree` -> `CodeTable` -> `pack` -> `Artifact`
//! and back with `unpack`. Tree building and code assignment depend on the
//! frequency table only, so equal matrices always give equal artifacts.

pub mod frequency;
pub mod huffman;
pub mod io;
pub mod packer;
pub mod prefix_codes;
pub mod unpacker;

#[cfg(test)]
mod tests;

pub use frequency::FrequencyTable;
pub use huffman::HuffmanTree;
pub use packer::pack;
pub use prefix_codes::{Code, CodeTable};
pub use unpacker::unpack;
