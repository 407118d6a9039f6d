use super::{pack, unpack, CodeTable, FrequencyTable, HuffmanTree};
use crate::error::CodecError;
use crate::matrix::SampleMatrix;

/// xorshift64, enough to make varied but reproducible matrices
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Skewed samples: mostly a few dark values, sometimes anything
    fn sample(&mut self) -> u8 {
        let r = self.next();
        match r % 8 {
            0..=4 => (r >> 8) as u8 % 4,
            5 | 6 => 100 + (r >> 8) as u8 % 16,
            _ => (r >> 8) as u8,
        }
    }

    fn matrix(&mut self, width: usize, height: usize) -> SampleMatrix {
        let data = (0..width * height).map(|_| self.sample()).collect();
        SampleMatrix::from_raw(width, height, data).unwrap()
    }
}

fn encode(matrix: &SampleMatrix) -> crate::artifact::Artifact {
    let codes = CodeTable::from_frequencies(&FrequencyTable::from_matrix(matrix));
    pack(matrix, &codes).unwrap()
}

#[test]
fn scenario_two_by_two() {
    let matrix = SampleMatrix::from_rows(&[[10u8, 10], [20, 30]]).unwrap();
    let frequencies = FrequencyTable::from_matrix(&matrix);
    assert_eq!(frequencies.iter().collect::<Vec<_>>(), [(10, 2), (20, 1), (30, 1)]);

    let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
    let codes = CodeTable::from_tree(&tree);
    let lens: Vec<_> = codes.iter().map(|(value, code)| (value, code.len())).collect();
    assert_eq!(lens, [(10, 1), (20, 2), (30, 2)]);

    let artifact = pack(&matrix, &codes).unwrap();
    assert_eq!(unpack(&artifact).unwrap(), matrix);
}

#[test]
fn round_trip_random_matrices() {
    let mut rng = Rng(0x9e37_79b9_7f4a_7c15);
    for (width, height) in [(1, 1), (1, 7), (7, 1), (3, 5), (16, 16), (33, 17), (255, 3)] {
        let matrix = rng.matrix(width, height);
        let artifact = encode(&matrix);
        assert_eq!(unpack(&artifact).unwrap(), matrix, "{width}x{height}");
    }
}

#[test]
fn round_trip_all_values() {
    let data: Vec<u8> = (0..=255).chain((0..=255).rev()).chain([0, 0, 0, 255]).collect();
    let matrix = SampleMatrix::from_raw(data.len(), 1, data).unwrap();
    assert_eq!(unpack(&encode(&matrix)).unwrap(), matrix);
}

#[test]
fn round_trip_skewed_distribution() {
    // Fibonacci counts give the longest codes a table of this size can get
    let mut counts = vec![1usize, 1];
    while counts.len() < 24 {
        counts.push(counts[counts.len() - 1] + counts[counts.len() - 2]);
    }
    let data: Vec<u8> = counts
        .iter()
        .enumerate()
        .flat_map(|(value, &count)| std::iter::repeat(value as u8).take(count))
        .collect();
    let matrix = SampleMatrix::from_raw(data.len(), 1, data).unwrap();
    let artifact = encode(&matrix);
    assert_eq!(artifact.codes().max_len(), 23);
    assert_eq!(unpack(&artifact).unwrap(), matrix);
}

#[test]
fn deterministic_artifacts() {
    let matrix = Rng(42).matrix(40, 30);
    let first = encode(&matrix);
    let second = encode(&matrix.clone());
    assert_eq!(first, second);
    assert_eq!(first.to_bytes(), second.to_bytes());
}

#[test]
fn generated_codes_are_prefix_free() {
    let mut rng = Rng(7);
    for symbols in [1, 2, 3, 5, 17, 100, 256] {
        let counts = (0..symbols).map(|v| (v as u8, 1 + rng.next() % 1000));
        let frequencies = FrequencyTable::from_counts(counts).unwrap();
        let codes = CodeTable::from_frequencies(&frequencies);
        assert_eq!(codes.len(), symbols);
        assert!(codes.is_prefix_free(), "{symbols} symbols");
    }
}

#[test]
fn frequencies_sum_to_sample_count() {
    let mut rng = Rng(3);
    for (width, height) in [(0, 0), (0, 9), (1, 1), (12, 31)] {
        let matrix = rng.matrix(width, height);
        assert_eq!(FrequencyTable::from_matrix(&matrix).total(), (width * height) as u64);
    }
}

#[test]
fn single_value_matrix() {
    let matrix = SampleMatrix::from_raw(5, 4, vec![128; 20]).unwrap();
    let artifact = encode(&matrix);
    let codes: Vec<_> = artifact.codes().iter().map(|(v, c)| (v, c.to_string())).collect();
    assert_eq!(codes, [(128, "0".to_string())]);
    // one bit per sample, 20 bits -> 3 bytes
    assert_eq!(artifact.packed(), &[0, 0, 0]);
    assert_eq!(unpack(&artifact).unwrap(), matrix);
}

#[test]
fn empty_matrix() {
    let matrix = SampleMatrix::from_raw(0, 0, Vec::new()).unwrap();
    let artifact = encode(&matrix);
    assert!(artifact.codes().is_empty());
    assert!(artifact.packed().is_empty());
    assert!(unpack(&artifact).unwrap().is_empty());
}

#[test]
fn truncated_artifact_is_corrupt() {
    let matrix = Rng(11).matrix(20, 20);
    let artifact = encode(&matrix);
    let mut bytes = artifact.to_bytes();
    assert!(artifact.packed().len() > 1);

    // drop the last packed byte and fix up the length field so the header still parses
    bytes.pop();
    let len_at = bytes.len() - (artifact.packed().len() - 1) - 8;
    let new_len = (artifact.packed().len() - 1) as u64;
    bytes[len_at..len_at + 8].copy_from_slice(&new_len.to_be_bytes());

    let truncated = crate::artifact::Artifact::from_bytes(&bytes).unwrap();
    assert!(matches!(unpack(&truncated), Err(CodecError::CorruptArtifact(_))));
}
