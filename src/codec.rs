use log::{debug, trace};

use crate::artifact::Artifact;
use crate::entropy_coding::{pack, unpack, CodeTable, FrequencyTable, HuffmanTree};
use crate::error::Result;
use crate::matrix::SampleMatrix;

/// Matrices with at least this many samples are counted in parallel
pub const PARALLEL_THRESHOLD: usize = 1 << 16;
const ROWS_PER_CHUNK: usize = 64;

/// Huffman codes the matrix with a table built from its own histogram.
///
/// An empty matrix gives an empty artifact (no codes, no bytes).
pub fn compress(matrix: &SampleMatrix) -> Result<Artifact> {
    let frequencies = if matrix.len() >= PARALLEL_THRESHOLD {
        FrequencyTable::from_matrix_par(matrix, ROWS_PER_CHUNK)
    } else {
        FrequencyTable::from_matrix(matrix)
    };

    let codes = match HuffmanTree::from_frequencies(&frequencies) {
        Some(tree) => {
            debug!(
                "{}x{}: {} distinct values, tree depth {}",
                matrix.width(),
                matrix.height(),
                tree.leaf_count(),
                tree.depth()
            );
            CodeTable::from_tree(&tree)
        }
        None => {
            debug!("{}x{}: nothing to compress", matrix.width(), matrix.height());
            CodeTable::default()
        }
    };
    for (value, code) in codes.iter() {
        trace!("{value:3} -> {code}");
    }

    pack(matrix, &codes)
}

/// Inverse of `compress`
pub fn decompress(artifact: &Artifact) -> Result<SampleMatrix> {
    unpack(artifact)
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress, PARALLEL_THRESHOLD};
    use crate::artifact::Artifact;
    use crate::matrix::SampleMatrix;

    #[test]
    fn through_the_wire() {
        let matrix = SampleMatrix::from_rows(&[[10u8, 10], [20, 30]]).unwrap();
        let bytes = compress(&matrix).unwrap().to_bytes();
        let artifact = Artifact::from_bytes(&bytes).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), matrix);
    }

    #[test]
    fn large_matrix_uses_parallel_counting() {
        let width = 512;
        let height = PARALLEL_THRESHOLD / width + 3;
        let data = (0..width * height).map(|i| ((i / 7) % 13 * 19) as u8).collect();
        let matrix = SampleMatrix::from_raw(width, height, data).unwrap();
        let artifact = compress(&matrix).unwrap();
        assert_eq!(artifact.codes().len(), 13);
        assert_eq!(decompress(&artifact).unwrap(), matrix);
        assert_eq!(compress(&matrix).unwrap(), artifact);
    }

    #[test]
    fn gradient_compresses_below_raw_size() {
        // 4 distinct values -> 2 bits per sample
        let data = (0..64 * 64).map(|i| (i % 4 * 60) as u8).collect();
        let matrix = SampleMatrix::from_raw(64, 64, data).unwrap();
        let stats = compress(&matrix).unwrap().stats();
        assert_eq!(stats.bits_per_sample, 2.0);
        assert!(stats.ratio < 0.3);
    }
}
