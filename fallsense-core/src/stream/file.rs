//! File-based streaming for recordings
//!
//! Reads the tabular export of a wearable recording. The first row is a
//! header naming the columns; sensor columns are matched by name (see
//! [`SensorField::from_column`]), `LABEL` and `TIMESTAMP` are recognised, and
//! anything else is ignored.
//!
//! ## Supported Formats
//!
//! 1. **CSV**: comma-separated values
//! 2. **TSV**: tab-separated values
//!
//! ```csv
//! TIMESTAMP,ACC_X,ACC_Y,ACC_Z,...,JERK_MAG,GYRO_MAG,LABEL
//! 1000,0.02,-0.98,0.11,...,0.35,12.4,0
//! ```
//!
//! ## Missing and Malformed Cells
//!
//! An empty or non-numeric sensor cell is kept as a missing value (NaN) so
//! the row stays in time order; later column reads report it. Rows that are
//! structurally broken (too few cells, unreadable label) are skipped and
//! counted in [`FileStreamStats`].

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{Record, Stream, StreamError};
use crate::dataset::{Dataset, Label, Sample, Timestamp, FALL, NO_FALL};
use crate::fields::{SensorField, LABEL_COLUMN, TIMESTAMP_COLUMN};

/// File formats supported by FileStream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
}

impl FileFormat {
    fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// Statistics for file streaming
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FileStreamStats {
    /// Rows turned into records
    pub rows_read: usize,
    /// Rows skipped as malformed
    pub parse_errors: usize,
    /// Sensor cells that were empty or non-numeric
    pub missing_cells: usize,
}

/// File-based record stream
///
/// ## Example
///
/// ```rust,no_run
/// use fallsense_core::stream::{FileStream, Stream};
///
/// let mut stream = FileStream::from_csv("glasses1_part1_features_added.csv")?;
/// while let Ok(record) = stream.poll_next() {
///     // Process record
/// }
/// # Ok::<(), fallsense_core::stream::StreamError<csv::Error>>(())
/// ```
pub struct FileStream {
    reader: csv::Reader<File>,
    /// Cell index -> sensor field
    columns: Vec<(usize, SensorField)>,
    label_column: Option<usize>,
    timestamp_column: Option<usize>,
    header_len: usize,
    record: StringRecord,
    eof: bool,
    stats: FileStreamStats,
}

impl FileStream {
    /// Open a recording and read its header
    pub fn new(path: impl AsRef<Path>, format: FileFormat) -> Result<Self, StreamError<csv::Error>> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(format.delimiter())
            .flexible(true)
            .trim(Trim::All)
            .from_path(path.as_ref())
            .map_err(StreamError::Transport)?;
        Self::from_reader(reader)
    }

    /// Open a CSV recording
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, StreamError<csv::Error>> {
        Self::new(path, FileFormat::Csv)
    }

    fn from_reader(mut reader: csv::Reader<File>) -> Result<Self, StreamError<csv::Error>> {
        let headers = reader.headers().map_err(StreamError::Transport)?.clone();

        let mut columns = Vec::new();
        let mut label_column = None;
        let mut timestamp_column = None;
        for (idx, name) in headers.iter().enumerate() {
            if let Some(field) = SensorField::from_column(name) {
                if columns.iter().any(|&(_, seen)| seen == field) {
                    return Err(StreamError::Format("Duplicate sensor column"));
                }
                columns.push((idx, field));
            } else if name.eq_ignore_ascii_case(LABEL_COLUMN) {
                label_column = Some(idx);
            } else if name.eq_ignore_ascii_case(TIMESTAMP_COLUMN) {
                timestamp_column = Some(idx);
            }
        }

        if columns.is_empty() {
            return Err(StreamError::Format("No sensor columns in header"));
        }
        log_debug!(
            "recording header: {} sensor columns, label={}, timestamp={}",
            columns.len(),
            label_column.is_some(),
            timestamp_column.is_some()
        );

        Ok(Self {
            reader,
            columns,
            label_column,
            timestamp_column,
            header_len: headers.len(),
            record: StringRecord::new(),
            eof: false,
            stats: FileStreamStats::default(),
        })
    }

    /// Read a whole recording into a dataset
    pub fn read_dataset(path: impl AsRef<Path>, format: FileFormat) -> Result<Dataset, StreamError<csv::Error>> {
        let mut stream = Self::new(path, format)?;
        let columns = stream.columns();
        let dataset = Dataset::from_stream(&mut stream, &columns)?;
        let stats = stream.stats();
        if stats.parse_errors > 0 || stats.missing_cells > 0 {
            log_warn!(
                "recording read with {} skipped rows and {} missing cells",
                stats.parse_errors,
                stats.missing_cells
            );
        }
        Ok(dataset)
    }

    /// Sensor fields found in the header, in file order
    pub fn columns(&self) -> Vec<SensorField> {
        self.columns.iter().map(|&(_, field)| field).collect()
    }

    /// Whether the header has a `LABEL` column
    pub fn has_labels(&self) -> bool {
        self.label_column.is_some()
    }

    /// Get statistics
    pub fn stats(&self) -> &FileStreamStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = FileStreamStats::default();
    }

    /// Parse the current row into a record
    fn parse_record(&mut self) -> Result<Record, StreamError<csv::Error>> {
        if self.record.len() < self.header_len {
            return Err(StreamError::Format("Not enough cells"));
        }

        let mut sample = Sample::default();
        for &(idx, field) in &self.columns {
            // Missing cells stay NaN
            match self.record[idx].parse::<f32>() {
                Ok(value) => sample.set(field, value),
                Err(_) => self.stats.missing_cells += 1,
            }
        }

        if let Some(idx) = self.timestamp_column {
            sample.timestamp = parse_timestamp(&self.record[idx]);
        }

        let label = match self.label_column {
            Some(idx) => Some(parse_label(&self.record[idx]).ok_or(StreamError::Format("Invalid label"))?),
            None => None,
        };

        Ok(Record { sample, label })
    }
}

fn parse_timestamp(cell: &str) -> Option<Timestamp> {
    cell.parse::<Timestamp>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().filter(|t| t.is_finite() && *t >= 0.0).map(|t| t as Timestamp))
}

/// Accepts `0`/`1` written as integers or floats
fn parse_label(cell: &str) -> Option<Label> {
    match cell.parse::<f32>().ok()? {
        v if v == 0.0 => Some(NO_FALL),
        v if v == 1.0 => Some(FALL),
        _ => None,
    }
}

impl Stream for FileStream {
    type Item = Record;
    type Error = StreamError<csv::Error>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        loop {
            if self.eof {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }

            match self.reader.read_record(&mut self.record) {
                Ok(false) => {
                    self.eof = true;
                }
                Ok(true) => match self.parse_record() {
                    Ok(record) => {
                        self.stats.rows_read += 1;
                        return Ok(record);
                    }
                    Err(_e) => {
                        log_debug!("skipping row {}: {}", self.stats.rows_read + self.stats.parse_errors + 1, _e);
                        self.stats.parse_errors += 1;
                    }
                },
                Err(e) if e.is_io_error() => return Err(nb::Error::Other(StreamError::Transport(e))),
                Err(_e) => {
                    // Invalid UTF-8 and similar per-row problems
                    self.stats.parse_errors += 1;
                }
            }
        }
    }
}
