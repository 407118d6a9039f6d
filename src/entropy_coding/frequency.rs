use rayon::prelude::*;

use crate::matrix::SampleMatrix;

/// Occurrence count of every intensity value in a matrix.
///
/// Stored as a dense histogram, but only values with a non-zero count are
/// ever reported: an unseen value is absent, not present with count 0.
/// The sum of all counts always fits in a `u64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl FrequencyTable {
    pub fn from_matrix(matrix: &SampleMatrix) -> Self {
        Self::from_samples(matrix.samples())
    }

    /// Same result as `from_matrix`, counted on row-aligned chunks in parallel.
    /// Partial tables are summed in chunk order.
    pub fn from_matrix_par(matrix: &SampleMatrix, rows_per_chunk: usize) -> Self {
        let chunk_len = matrix.width().max(1) * rows_per_chunk.max(1);
        matrix
            .samples()
            .par_chunks(chunk_len)
            .map(Self::from_samples)
            .reduce(Self::default, Self::merge)
    }

    pub fn from_samples(samples: &[u8]) -> Self {
        let mut counts = [0; 256];
        for &sample in samples {
            counts[usize::from(sample)] += 1;
        }
        Self { counts }
    }

    /// Builds a table from `(value, count)` pairs, summing repeated values.
    /// `None` if the counts add up to more than `u64::MAX`.
    pub fn from_counts(pairs: impl IntoIterator<Item = (u8, u64)>) -> Option<Self> {
        let mut table = Self::default();
        let mut total = 0u64;
        for (value, count) in pairs {
            total = total.checked_add(count)?;
            table.counts[usize::from(value)] += count;
        }
        Some(table)
    }

    fn merge(mut self, other: Self) -> Self {
        for (count, &rhs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += rhs;
        }
        self
    }

    pub fn get(&self, value: u8) -> Option<u64> {
        match self.counts[usize::from(value)] {
            0 => None,
            count => Some(count),
        }
    }

    /// `(value, count)` pairs in ascending value order, observed values only
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }

    /// Number of distinct values observed
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Sum of all counts, equal to the number of samples analyzed
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::FrequencyTable;
    use crate::matrix::SampleMatrix;

    #[test]
    fn counts_observed_values_only() {
        let matrix = SampleMatrix::from_rows(&[[10u8, 10], [20, 30]]).unwrap();
        let table = FrequencyTable::from_matrix(&matrix);
        assert_eq!(table.iter().collect::<Vec<_>>(), [(10, 2), (20, 1), (30, 1)]);
        assert_eq!(table.get(10), Some(2));
        assert_eq!(table.get(0), None);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn empty_matrix_gives_empty_table() {
        let table = FrequencyTable::from_matrix(&SampleMatrix::default());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn extreme_values() {
        let table = FrequencyTable::from_samples(&[0, 255, 255]);
        assert_eq!(table.iter().collect::<Vec<_>>(), [(0, 1), (255, 2)]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let data: Vec<u8> = (0..97 * 61u32).map(|i| (i * 7 % 251) as u8).collect();
        let matrix = SampleMatrix::from_raw(97, 61, data).unwrap();
        let sequential = FrequencyTable::from_matrix(&matrix);
        for rows_per_chunk in [0, 1, 5, 61, 100] {
            assert_eq!(FrequencyTable::from_matrix_par(&matrix, rows_per_chunk), sequential);
        }
        assert_eq!(sequential.total(), 97 * 61);
    }

    #[test]
    fn from_counts_sums_duplicates() {
        let table = FrequencyTable::from_counts([(3, 1), (3, 4), (9, 2)]).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), [(3, 5), (9, 2)]);
    }

    #[test]
    fn from_counts_rejects_overflowing_total() {
        assert_eq!(FrequencyTable::from_counts([(0, u64::MAX), (1, 1)]), None);
        assert_eq!(FrequencyTable::from_counts([(4, u64::MAX), (4, 1)]), None);
        let full = FrequencyTable::from_counts([(0, u64::MAX - 1), (1, 1)]).unwrap();
        assert_eq!(full.total(), u64::MAX);
    }
}
