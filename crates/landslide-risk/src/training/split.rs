//! Reproducible train/test split.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Row indices of a shuffled train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded generator and cut off the test share.
///
/// The test set holds `ceil(test_fraction * n_rows)` rows, capped so that at
/// least one training row remains. With fewer than two rows everything is
/// training data.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> SplitIndices {
    let mut idx: Vec<usize> = (0..n_rows).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let n_test = if n_rows < 2 {
        0
    } else {
        ((n_rows as f64) * test_fraction).ceil().clamp(1.0, (n_rows - 1) as f64) as usize
    };
    let train = idx.split_off(n_test);
    SplitIndices { train, test: idx }
}
