use log::debug;

use super::io::BitWriter;
use super::prefix_codes::CodeTable;
use crate::artifact::Artifact;
use crate::error::{CodecError, Result};
use crate::matrix::SampleMatrix;

/// Packs the matrix row-major into MSB-first code bits.
///
/// Every sample value must have a code in `codes`, otherwise fails with
/// `InconsistentCodeTable` and returns nothing.
pub fn pack(matrix: &SampleMatrix, codes: &CodeTable) -> Result<Artifact> {
    let lookup = codes.to_lookup();
    let mut writer = BitWriter::new(Vec::new());

    for &sample in matrix.samples() {
        let code = lookup[usize::from(sample)]
            .ok_or(CodecError::InconsistentCodeTable { value: sample })?;
        for bit in code.iter() {
            writer.write_bit(bit)?;
        }
    }

    let bits = writer.bits_written();
    let packed = writer.finish()?;
    debug!("packed {} samples into {} bits ({} bytes)", matrix.len(), bits, packed.len());

    Artifact::new(matrix.width(), matrix.height(), codes.clone(), packed)
}
