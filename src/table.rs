use crate::error::{Error, Result};
use rand::prelude::*;
use rand_distr::Uniform;

/// Event/signal frequency table of a single agent.
///
/// Holds the raw counts (matrix `n_events x n_signals`) together with their
/// row-normalized form. A row without any count normalizes to all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    counts: Vec<Vec<u64>>,
    probs: Vec<Vec<f64>>,
}

impl SignalTable {
    /// Create a table whose counts are sampled from `count_dist`.
    pub fn random<R: Rng + ?Sized>(
        n_events: usize,
        n_signals: usize,
        count_dist: &Uniform<u64>,
        rng: &mut R,
    ) -> Result<Self> {
        let counts = (0..n_events)
            .map(|_| (0..n_signals).map(|_| count_dist.sample(rng)).collect())
            .collect();
        Self::from_counts(counts)
    }

    /// Create a table from explicit counts.
    ///
    /// Fails unless there is at least one row and all rows hold the same,
    /// non-zero number of signals.
    pub fn from_counts(counts: Vec<Vec<u64>>) -> Result<Self> {
        let expected = counts.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(Error::EmptyTable);
        }
        if let Some((row, counts_row)) = counts
            .iter()
            .enumerate()
            .find(|(_, counts_row)| counts_row.len() != expected)
        {
            return Err(Error::RaggedTable {
                row,
                len: counts_row.len(),
                expected,
            });
        }

        let probs = counts.iter().map(|row| normalize(row)).collect();
        Ok(Self { counts, probs })
    }

    pub fn n_events(&self) -> usize {
        self.counts.len()
    }

    pub fn n_signals(&self) -> usize {
        self.counts[0].len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_events(), self.n_signals())
    }

    /// Add one observation of `signal` for `event` and renormalize that row.
    ///
    /// Indices must be in range.
    pub fn increment(&mut self, event: usize, signal: usize) {
        self.counts[event][signal] += 1;
        self.probs[event] = normalize(&self.counts[event]);
    }

    pub fn counts_row(&self, event: usize) -> &[u64] {
        &self.counts[event]
    }

    pub fn probability_row(&self, event: usize) -> &[f64] {
        &self.probs[event]
    }

    /// Signal with the highest raw count for `event` (lowest index on ties).
    pub fn max_signal(&self, event: usize) -> usize {
        let mut max_val = None;
        let mut max_arg = 0;
        for (signal, &val) in self.counts[event].iter().enumerate() {
            if max_val.is_none_or(|max| val > max) {
                max_val = Some(val);
                max_arg = signal;
            }
        }
        max_arg
    }
}

fn normalize(row: &[u64]) -> Vec<f64> {
    let total: u64 = row.iter().sum();
    if total == 0 {
        return vec![0.0; row.len()];
    }
    row.iter().map(|&val| val as f64 / total as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha12Rng;

    fn table(counts: Vec<Vec<u64>>) -> SignalTable {
        SignalTable::from_counts(counts).unwrap()
    }

    #[test]
    fn rows_are_normalized() {
        let table = table(vec![vec![1, 3], vec![2, 2]]);
        assert_eq!(table.probability_row(0), &[0.25, 0.75]);
        assert_eq!(table.probability_row(1), &[0.5, 0.5]);
    }

    #[test]
    fn increment_touches_one_cell() {
        let mut table = table(vec![vec![3, 7], vec![1, 1]]);
        table.increment(0, 0);
        assert_eq!(table.counts_row(0), &[4, 7]);
        assert_eq!(table.counts_row(1), &[1, 1]);

        let sum: f64 = table.probability_row(0).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_row_normalizes_to_zeros() {
        let mut table = table(vec![vec![0, 0, 0]]);
        assert_eq!(table.probability_row(0), &[0.0, 0.0, 0.0]);

        table.increment(0, 2);
        assert_eq!(table.probability_row(0), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn max_signal_prefers_first_on_ties() {
        let table = table(vec![vec![2, 5, 5, 1], vec![0, 0, 0, 0]]);
        assert_eq!(table.max_signal(0), 1);
        assert_eq!(table.max_signal(1), 0);
    }

    #[test]
    fn malformed_counts_are_rejected() {
        assert_eq!(SignalTable::from_counts(vec![]), Err(Error::EmptyTable));
        assert_eq!(SignalTable::from_counts(vec![vec![]]), Err(Error::EmptyTable));
        assert_eq!(
            SignalTable::from_counts(vec![vec![1, 1], vec![1, 1], vec![1]]),
            Err(Error::RaggedTable {
                row: 2,
                len: 1,
                expected: 2
            })
        );
        assert_eq!(
            SignalTable::from_counts(vec![vec![1], vec![]]),
            Err(Error::RaggedTable {
                row: 1,
                len: 0,
                expected: 1
            })
        );
    }

    #[test]
    fn random_counts_stay_in_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let count_dist = Uniform::new(0, 10).unwrap();
        let table = SignalTable::random(4, 3, &count_dist, &mut rng).unwrap();

        assert_eq!(table.shape(), (4, 3));
        for event in 0..4 {
            assert!(table.counts_row(event).iter().all(|&val| val < 10));
        }

        let empty = SignalTable::random(4, 0, &count_dist, &mut rng);
        assert_eq!(empty, Err(Error::EmptyTable));
    }

    #[test]
    fn normalization_is_stable_between_increments() {
        let mut table = table(vec![vec![2, 7, 1], vec![4, 0, 3]]);
        let before = table.probability_row(0).to_vec();

        table.increment(1, 1);
        assert_eq!(table.probability_row(0), before.as_slice());
        assert_eq!(table.probability_row(0), before.as_slice());
        assert_ne!(table.probability_row(1), &[4.0 / 7.0, 0.0, 3.0 / 7.0]);
    }
}
