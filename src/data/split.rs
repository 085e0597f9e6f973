use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SplitOptions;
use crate::error::{DataError, FitError};

/// Train/test partitions produced by a single split. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

impl SplitDataset {
    pub fn n_train(&self) -> usize {
        self.y_train.len()
    }

    pub fn n_test(&self) -> usize {
        self.y_test.len()
    }

    /// Training and test features stacked, training rows first.
    pub fn combined_features(&self) -> Result<Array2<f64>, FitError> {
        if self.x_train.ncols() != self.x_test.ncols() {
            return Err(FitError::DimensionMismatch {
                expected: self.x_train.ncols(),
                got: self.x_test.ncols(),
            });
        }
        ndarray::concatenate(Axis(0), &[self.x_train.view(), self.x_test.view()])
            .map_err(|_| FitError::DimensionMismatch {
                expected: self.x_train.ncols(),
                got: self.x_test.ncols(),
            })
    }
}

/// Number of test rows for `n` samples: `ceil(fraction * n)`.
pub fn test_count(n: usize, fraction: f64) -> usize {
    ((fraction * n as f64).ceil() as usize).min(n)
}

/// Shuffle row indices with a seeded ChaCha8 generator; the first
/// [`test_count`] shuffled rows become the test partition, the rest (in
/// shuffled order) the training partition.
///
/// The same seed and input order always produce the same partition.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    options: &SplitOptions,
) -> Result<SplitDataset, DataError> {
    if !(options.test_fraction > 0.0 && options.test_fraction < 1.0) {
        return Err(DataError::InvalidSplitFraction(options.test_fraction));
    }
    if x.nrows() != y.len() {
        return Err(DataError::MalformedRecord {
            row: x.nrows().min(y.len()),
            reason: format!("{} feature rows but {} targets", x.nrows(), y.len()),
        });
    }

    let n = y.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(test_count(n, options.test_fraction));

    log::info!(
        "Data split: {} training samples, {} test samples",
        train_idx.len(),
        test_idx.len()
    );

    Ok(SplitDataset {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64);
        let y = Array::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn same_seed_same_partition() {
        let (x, y) = data(50);
        let options = SplitOptions {
            test_fraction: 0.2,
            seed: 42,
        };
        let a = train_test_split(&x, &y, &options).unwrap();
        let b = train_test_split(&x, &y, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_usually_differs() {
        let (x, y) = data(50);
        let a = train_test_split(&x, &y, &SplitOptions { test_fraction: 0.2, seed: 1 }).unwrap();
        let b = train_test_split(&x, &y, &SplitOptions { test_fraction: 0.2, seed: 2 }).unwrap();
        assert_ne!(a.y_test, b.y_test);
    }

    #[test]
    fn partitions_cover_every_row_once() {
        let (x, y) = data(23);
        let split = train_test_split(&x, &y, &SplitOptions::default()).unwrap();
        assert_eq!(split.n_train() + split.n_test(), 23);
        assert_eq!(split.n_test(), 5); // ceil(0.2 * 23)

        let mut seen: Vec<f64> = split.y_train.iter().chain(split.y_test.iter()).copied().collect();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, (0..23).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn rows_stay_aligned_with_targets() {
        let (x, y) = data(10);
        let split = train_test_split(&x, &y, &SplitOptions::default()).unwrap();
        for (row, target) in split.x_train.rows().into_iter().zip(split.y_train.iter()) {
            assert_eq!(row[0], target * 10.0);
        }
    }

    #[test]
    fn combined_features_stack_train_then_test() {
        let (x, y) = data(10);
        let split = train_test_split(&x, &y, &SplitOptions::default()).unwrap();
        let combined = split.combined_features().unwrap();
        assert_eq!(combined.nrows(), 10);
        assert_eq!(combined.row(0), split.x_train.row(0));
        assert_eq!(combined.row(split.n_train()), split.x_test.row(0));
    }

    #[test]
    fn combined_features_reject_mismatched_widths() {
        let split = SplitDataset {
            x_train: Array2::zeros((3, 2)),
            x_test: Array2::zeros((1, 1)),
            y_train: Array1::zeros(3),
            y_test: Array1::zeros(1),
        };
        assert!(matches!(
            split.combined_features(),
            Err(FitError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn rounding_rule() {
        assert_eq!(test_count(5, 0.2), 1);
        assert_eq!(test_count(11, 0.2), 3);
        assert_eq!(test_count(0, 0.2), 0);
        assert_eq!(test_count(1, 0.2), 1);
    }

    #[test]
    fn empty_input_gives_empty_partitions() {
        let (x, y) = data(0);
        let split = train_test_split(&x, &y, &SplitOptions::default()).unwrap();
        assert_eq!(split.n_train(), 0);
        assert_eq!(split.n_test(), 0);
    }

    #[test]
    fn fraction_must_be_inside_unit_interval() {
        let (x, y) = data(10);
        let err = train_test_split(&x, &y, &SplitOptions { test_fraction: 0.0, seed: 0 });
        assert!(matches!(err, Err(DataError::InvalidSplitFraction(_))));
    }
}
