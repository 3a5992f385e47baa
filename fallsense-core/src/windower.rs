//! Sliding Windows for Sequence Classification
//!
//! ## Overview
//!
//! A sequence classifier consumes fixed-length runs of consecutive feature
//! rows. The windower slides a window of `seq_len` rows over a (standardized)
//! feature matrix one row at a time and pairs each window with the label of
//! the row that immediately *follows* it:
//!
//! ```text
//! rows:    0   1   2   3   4   5   6   7
//! seq_len = 3
//!
//! window 0: [0 1 2] -> label[3]
//! window 1:   [1 2 3] -> label[4]
//! ...
//! window 4:           [4 5 6] -> label[7]
//! ```
//!
//! For `N` rows this yields `N - seq_len` windows. The label row is never
//! inside its own window, and no window is built whose label index would
//! fall past the end of the recording. A `seq_len` of `N` or more therefore
//! produces an empty set rather than an error.
//!
//! Labelling by the *next* row treats a fall as an instantaneous event that
//! the preceding `seq_len` samples should predict. If a recording's labels
//! mark whole intervals instead, that assumption needs revisiting against the
//! real annotations; it is kept as-is here.
//!
//! ## Output Layout
//!
//! [`WindowSet::flat_features`] exports a contiguous row-major buffer of
//! shape `(num_windows, seq_len, features)`, and [`WindowSet::labels`] the
//! matching `(num_windows,)` label array.

use serde::{Deserialize, Serialize};

use crate::dataset::{Label, FALL};
use crate::errors::{CoreResult, InvalidInputError};

/// Row-major `rows x cols` matrix of feature values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl FeatureMatrix {
    /// Wrap a row-major buffer
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> CoreResult<Self> {
        if data.len() != rows * cols {
            return Err(InvalidInputError::LengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from rows; every row must have the same width
    pub fn from_rows(rows: &[Vec<f32>]) -> CoreResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(InvalidInputError::LengthMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, rows: rows.len(), cols })
    }

    /// Build from columns; every column must have the same length
    pub fn from_columns(columns: &[Vec<f32>]) -> CoreResult<Self> {
        let rows = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(InvalidInputError::LengthMismatch {
                expected: rows,
                actual: bad.len(),
            });
        }
        let cols = columns.len();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            data.extend(columns.iter().map(|column| column[r]));
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of rows (samples)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (features)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One row; panics if `index >= rows()`
    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Contiguous rows `[start, end)`
    pub fn row_range(&self, start: usize, end: usize) -> &[f32] {
        &self.data[start * self.cols..end * self.cols]
    }

    /// Rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact(0) panics; a zero-width matrix has no row data to yield
        let cols = self.cols.max(1);
        self.data.chunks_exact(cols)
    }

    /// Values of one column
    pub fn column(&self, index: usize) -> Vec<f32> {
        self.iter_rows().map(|row| row[index]).collect()
    }

    /// Underlying row-major buffer
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// One training example: `seq_len` consecutive feature rows and the label of
/// the following row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start: usize,
    features_per_step: usize,
    features: Vec<f32>,
    label: Label,
}

impl Window {
    /// Index of the first row in the source matrix
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the row the label was taken from
    pub fn label_index(&self) -> usize {
        self.start + self.seq_len()
    }

    /// Number of time steps
    pub fn seq_len(&self) -> usize {
        if self.features_per_step == 0 {
            0
        } else {
            self.features.len() / self.features_per_step
        }
    }

    /// Label of the row after the window
    pub fn label(&self) -> Label {
        self.label
    }

    /// Features of time step `t`
    pub fn step(&self, t: usize) -> &[f32] {
        &self.features[t * self.features_per_step..(t + 1) * self.features_per_step]
    }

    /// Row-major `(seq_len, features)` buffer
    pub fn features(&self) -> &[f32] {
        &self.features
    }
}

/// Ordered windows over one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSet {
    seq_len: usize,
    features_per_step: usize,
    windows: Vec<Window>,
}

impl WindowSet {
    /// Windows in start-index order
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no window could be formed
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Window length in rows
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Features per time step
    pub fn features_per_step(&self) -> usize {
        self.features_per_step
    }

    /// `(num_windows, seq_len, features)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.windows.len(), self.seq_len, self.features_per_step)
    }

    /// Label array, one per window
    pub fn labels(&self) -> Vec<Label> {
        self.windows.iter().map(Window::label).collect()
    }

    /// Number of windows labelled as a fall
    pub fn positives(&self) -> usize {
        self.windows.iter().filter(|w| w.label == FALL).count()
    }

    /// Contiguous `(num_windows, seq_len, features)` buffer
    pub fn flat_features(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.windows.len() * self.seq_len * self.features_per_step);
        for window in &self.windows {
            flat.extend_from_slice(&window.features);
        }
        flat
    }

    /// New set holding the windows at `indices`, in the order given
    pub fn subset(&self, indices: &[usize]) -> CoreResult<Self> {
        let windows = indices
            .iter()
            .map(|&i| {
                self.windows.get(i).cloned().ok_or(InvalidInputError::LengthMismatch {
                    expected: self.windows.len(),
                    actual: i + 1,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            seq_len: self.seq_len,
            features_per_step: self.features_per_step,
            windows,
        })
    }
}

/// Slide a `seq_len` window over `matrix`, labelling each window with the
/// label of the row that follows it
///
/// Produces `rows - seq_len` windows in start order, or none when
/// `seq_len >= rows`. Fails if `seq_len` is zero or if `labels` does not
/// have exactly one entry per row.
pub fn build_windows(matrix: &FeatureMatrix, labels: &[Label], seq_len: usize) -> CoreResult<WindowSet> {
    if seq_len == 0 {
        return Err(InvalidInputError::NonPositiveWindow { seq_len });
    }
    if labels.len() != matrix.rows() {
        return Err(InvalidInputError::LengthMismatch {
            expected: matrix.rows(),
            actual: labels.len(),
        });
    }

    let count = matrix.rows().saturating_sub(seq_len);
    let windows = (0..count)
        .map(|start| Window {
            start,
            features_per_step: matrix.cols(),
            features: matrix.row_range(start, start + seq_len).to_vec(),
            label: labels[start + seq_len],
        })
        .collect::<Vec<_>>();

    log_debug!(
        "built {} windows of {} x {} from {} rows",
        windows.len(),
        seq_len,
        matrix.cols(),
        matrix.rows()
    );

    Ok(WindowSet {
        seq_len,
        features_per_step: matrix.cols(),
        windows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row `i` holds `[i, 10 * i]`
    fn ramp(rows: usize) -> FeatureMatrix {
        let rows: Vec<Vec<f32>> = (0..rows).map(|i| vec![i as f32, 10.0 * i as f32]).collect();
        FeatureMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn twelve_rows_window_ten() {
        let matrix = ramp(12);
        let labels: Vec<Label> = (0..12).map(|i| (i % 2) as Label).collect();

        let set = build_windows(&matrix, &labels, 10).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.shape(), (2, 10, 2));

        let first = &set.windows()[0];
        assert_eq!(first.start(), 0);
        assert_eq!(first.features(), matrix.row_range(0, 10));
        assert_eq!(first.label(), labels[10]);
        assert_eq!(first.label_index(), 10);

        let second = &set.windows()[1];
        assert_eq!(second.features(), matrix.row_range(1, 11));
        assert_eq!(second.label(), labels[11]);
        assert_eq!(second.step(0), &[1.0, 10.0]);
        assert_eq!(second.step(9), &[10.0, 100.0]);
    }

    #[test]
    fn window_never_contains_label_row() {
        let matrix = ramp(6);
        let set = build_windows(&matrix, &[0; 6], 3).unwrap();
        for window in set.windows() {
            let label_row = matrix.row(window.label_index());
            assert!(window.features().chunks(2).all(|step| step != label_row));
        }
    }

    #[test]
    fn long_window_yields_nothing() {
        let matrix = ramp(5);
        assert!(build_windows(&matrix, &[0; 5], 5).unwrap().is_empty());
        assert!(build_windows(&matrix, &[0; 5], 50).unwrap().is_empty());
    }

    #[test]
    fn zero_window_is_rejected() {
        let matrix = ramp(5);
        assert_eq!(
            build_windows(&matrix, &[0; 5], 0),
            Err(InvalidInputError::NonPositiveWindow { seq_len: 0 })
        );
    }

    #[test]
    fn label_count_must_match_rows() {
        let matrix = ramp(5);
        assert_eq!(
            build_windows(&matrix, &[0; 4], 2),
            Err(InvalidInputError::LengthMismatch { expected: 5, actual: 4 })
        );
    }

    #[test]
    fn flat_export_and_subset() {
        let matrix = ramp(4);
        let set = build_windows(&matrix, &[0, 0, 1, 0], 2).unwrap();
        assert_eq!(set.labels(), vec![1, 0]);
        assert_eq!(set.positives(), 1);
        assert_eq!(
            set.flat_features(),
            vec![0.0, 0.0, 1.0, 10.0, 1.0, 10.0, 2.0, 20.0]
        );

        let reversed = set.subset(&[1, 0]).unwrap();
        assert_eq!(reversed.labels(), vec![0, 1]);
        assert!(set.subset(&[2]).is_err());
    }

    #[test]
    fn matrix_construction() {
        let by_columns = FeatureMatrix::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(by_columns.row(0), &[1.0, 3.0]);
        assert_eq!(by_columns.column(1), vec![3.0, 4.0]);
        assert!(FeatureMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(FeatureMatrix::from_columns(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(FeatureMatrix::new(vec![1.0; 5], 2, 3).is_err());
    }
}
