//! Train/test partitioning
//!
//! Windows are shuffled with a seeded Fisher-Yates pass, then the first
//! `ceil(len * test_size)` shuffled positions become the test set. The same
//! seed always yields the same partition.

use fallsense_core::WindowSet;
use serde::{Deserialize, Serialize};

use crate::{MLError, MLResult, Rng};

/// Fraction of windows held out for testing
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Seed used when none is given
pub const DEFAULT_SEED: u32 = 42;

/// Window indices on each side of a split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    /// Indices used for training, in shuffled order
    pub train: Vec<usize>,
    /// Indices held out for testing, in shuffled order
    pub test: Vec<usize>,
}

/// Shuffle `0..len` with `seed` and hold out `ceil(len * test_size)` indices
///
/// Both sides must end up non-empty, so `len` has to be at least 2.
pub fn train_test_split(len: usize, test_size: f64, seed: u32) -> MLResult<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MLError::InvalidFraction { value: test_size });
    }

    let test_len = (len as f64 * test_size).ceil() as usize;
    if test_len == 0 || test_len >= len {
        return Err(MLError::InsufficientData {
            required: 2,
            available: len,
        });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    Rng::new(seed).shuffle(&mut indices);
    let train = indices.split_off(test_len);

    log_debug!("split {} windows into {} train / {} test", len, train.len(), indices.len());

    Ok(SplitIndices { train, test: indices })
}

/// Split a window set into `(train, test)` sets
pub fn split_windows(windows: &WindowSet, test_size: f64, seed: u32) -> MLResult<(WindowSet, WindowSet)> {
    let split = train_test_split(windows.len(), test_size, seed)?;
    Ok((windows.subset(&split.train)?, windows.subset(&split.test)?))
}
