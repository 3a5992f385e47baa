//! Recording data model
//!
//! A [`Dataset`] is the time-ordered list of [`Sample`]s read from one
//! recording, plus the ground-truth labels when the recording carried a
//! `LABEL` column. Row order is time order and every derived view (columns,
//! feature matrices, windows, peaks) preserves it.
//!
//! Missing cells are stored as NaN. Reading a column reports them as
//! [`InvalidInputError::NonFiniteValue`], while a column that never appeared
//! in the input header is reported as [`InvalidInputError::MissingField`].

use serde::{Deserialize, Serialize};

use crate::errors::{CoreResult, InvalidInputError};
use crate::fields::{SensorField, FIELD_COUNT};
use crate::stream::{Record, StreamError};
use crate::traits::{Stream, Validatable};
use crate::windower::FeatureMatrix;

/// Timestamp in milliseconds, as exported by the wearable
pub type Timestamp = u64;

/// Binary fall label: [`NO_FALL`] or [`FALL`]
pub type Label = u8;

/// Label for ordinary activity
pub const NO_FALL: Label = 0;

/// Label for a fall event
pub const FALL: Label = 1;

/// One sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Capture time, if the recording had a timestamp column
    pub timestamp: Option<Timestamp>,
    /// One value per [`SensorField`], indexed by [`SensorField::index`]
    values: [f32; FIELD_COUNT],
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            timestamp: None,
            values: [f32::NAN; FIELD_COUNT],
        }
    }
}

impl Sample {
    /// Sample with every field set
    pub fn new(values: [f32; FIELD_COUNT]) -> Self {
        Self { timestamp: None, values }
    }

    /// Sample with only the given fields set; the rest are missing
    pub fn from_pairs(pairs: &[(SensorField, f32)]) -> Self {
        let mut sample = Self::default();
        for &(field, value) in pairs {
            sample.set(field, value);
        }
        sample
    }

    /// Attach a capture time
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Value of `field` (NaN when missing)
    pub fn get(&self, field: SensorField) -> f32 {
        self.values[field.index()]
    }

    /// Overwrite the value of `field`
    pub fn set(&mut self, field: SensorField, value: f32) {
        self.values[field.index()] = value;
    }

    /// Whether `field` holds a finite value
    pub fn has_value(&self, field: SensorField) -> bool {
        self.get(field).is_valid()
    }
}

/// Time-ordered recording
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
    /// Columns present in the input header
    present: [bool; FIELD_COUNT],
    /// Ground truth, one per sample
    labels: Option<Vec<Label>>,
}

impl Dataset {
    /// Dataset where every field is considered present
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            present: [true; FIELD_COUNT],
            labels: None,
        }
    }

    /// Dataset whose input only had the listed columns
    pub fn with_columns(samples: Vec<Sample>, columns: &[SensorField]) -> Self {
        let mut present = [false; FIELD_COUNT];
        for field in columns {
            present[field.index()] = true;
        }
        Self {
            samples,
            present,
            labels: None,
        }
    }

    /// Attach ground-truth labels, one per sample
    pub fn with_labels(mut self, labels: Vec<Label>) -> CoreResult<Self> {
        if labels.len() != self.samples.len() {
            return Err(InvalidInputError::LengthMismatch {
                expected: self.samples.len(),
                actual: labels.len(),
            });
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Drain a record stream into a dataset
    ///
    /// Labels are kept only if every record carried one. Rows the source
    /// rejected as malformed are expected to be skipped by the source itself;
    /// any other stream error aborts the read.
    ///
    /// Blocks until the stream ends: `WouldBlock` is retried immediately,
    /// which suits file and memory sources. Live sources should drive a
    /// [`RecordCollector`] instead and poll again when data arrives.
    pub fn from_stream<S, E>(stream: &mut S, columns: &[SensorField]) -> Result<Self, StreamError<E>>
    where
        S: Stream<Item = Record, Error = StreamError<E>>,
    {
        let (lower, _) = stream.size_hint();
        let mut collector = RecordCollector::with_capacity(lower);
        loop {
            match collector.poll(stream) {
                Ok(()) => return Ok(collector.finish(columns)),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the recording has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Ground-truth labels, if the recording had them
    pub fn labels(&self) -> Option<&[Label]> {
        self.labels.as_deref()
    }

    /// Whether `field` was present in the input
    pub fn has_field(&self, field: SensorField) -> bool {
        self.present[field.index()]
    }

    /// Fields present in the input, in storage order
    pub fn fields(&self) -> Vec<SensorField> {
        SensorField::ALL
            .iter()
            .copied()
            .filter(|&f| self.has_field(f))
            .collect()
    }

    /// Values of one column in time order
    ///
    /// Fails if the column was absent or if any cell is missing or
    /// non-finite.
    pub fn column(&self, field: SensorField) -> CoreResult<Vec<f32>> {
        if !self.has_field(field) {
            return Err(InvalidInputError::MissingField { field });
        }
        self.samples
            .iter()
            .enumerate()
            .map(|(row, sample)| {
                let value = sample.get(field);
                if value.is_valid() {
                    Ok(value)
                } else {
                    Err(InvalidInputError::NonFiniteValue { field, row })
                }
            })
            .collect()
    }

    /// Row-major matrix of the given columns, one row per sample
    pub fn feature_matrix(&self, fields: &[SensorField]) -> CoreResult<FeatureMatrix> {
        if fields.is_empty() {
            return Err(InvalidInputError::InvalidConfig { reason: "no feature fields" });
        }
        let columns = fields
            .iter()
            .map(|&field| self.column(field))
            .collect::<CoreResult<Vec<_>>>()?;
        FeatureMatrix::from_columns(&columns)
    }
}

/// Incremental reader for sources that may not have data yet
///
/// Each [`poll`](Self::poll) takes every record currently available. It
/// returns `WouldBlock` when the source is still filling, keeping what was
/// read so far, and `Ok(())` once the stream has ended.
#[derive(Debug, Default)]
pub struct RecordCollector {
    samples: Vec<Sample>,
    labels: Vec<Label>,
    unlabeled: usize,
    finished: bool,
}

impl RecordCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collector with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Pull records until the source blocks, fails or ends
    pub fn poll<S, E>(&mut self, stream: &mut S) -> nb::Result<(), StreamError<E>>
    where
        S: Stream<Item = Record, Error = StreamError<E>>,
    {
        if self.finished {
            return Ok(());
        }
        loop {
            match stream.poll_next() {
                Ok(record) => {
                    self.samples.push(record.sample);
                    match record.label {
                        Some(label) => self.labels.push(label),
                        None => self.unlabeled += 1,
                    }
                }
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(StreamError::EndOfStream)) => {
                    self.finished = true;
                    return Ok(());
                }
                Err(nb::Error::Other(e)) => return Err(nb::Error::Other(e)),
            }
        }
    }

    /// Records collected so far
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been collected yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the stream has reported its end
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Build the dataset from the records collected so far
    pub fn finish(self, columns: &[SensorField]) -> Dataset {
        if self.unlabeled > 0 && !self.labels.is_empty() {
            log_warn!(
                "{} of {} rows have no label; ignoring ground truth",
                self.unlabeled,
                self.samples.len()
            );
        }
        log_debug!("read {} samples from stream", self.samples.len());

        let complete = self.unlabeled == 0 && !self.labels.is_empty();
        let mut dataset = Dataset::with_columns(self.samples, columns);
        if complete {
            dataset.labels = Some(self.labels);
        }
        dataset
    }
}
