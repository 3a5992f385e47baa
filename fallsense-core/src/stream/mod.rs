//! Ingest streams for recordings
//!
//! Rows reach the core through the pull-based [`Stream`] trait:
//! - `memory` - replay of in-memory records (tests, synthetic recordings)
//! - `file` - CSV/TSV exports of the wearable spreadsheet (requires
//!   `stream-file`)
//!
//! [`Dataset::from_stream`](crate::dataset::Dataset::from_stream) drains any
//! of them into a [`Dataset`](crate::dataset::Dataset).

use core::fmt;

use crate::dataset::{Label, Sample};

pub mod memory;

#[cfg(feature = "stream-file")]
pub mod file;

pub use memory::MemoryStream;

#[cfg(feature = "stream-file")]
pub use file::{FileFormat, FileStream, FileStreamStats};

pub use crate::traits::Stream;

/// One row of a recording as produced by a stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Sensor values of the row
    pub sample: Sample,
    /// Ground-truth label, when the source has a label column
    pub label: Option<Label>,
}

impl Record {
    /// Row with a ground-truth label
    pub fn labeled(sample: Sample, label: Label) -> Self {
        Self { sample, label: Some(label) }
    }

    /// Row without ground truth
    pub fn unlabeled(sample: Sample) -> Self {
        Self { sample, label: None }
    }
}

/// Errors that can occur while reading a recording
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g., I/O error)
    Transport(E),
    /// Data format error
    Format(&'static str),
    /// End of stream reached
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for StreamError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_display() {
        let err: StreamError<&str> = StreamError::Transport("file vanished");
        assert_eq!(format!("{}", err), "Transport error: file vanished");

        let err: StreamError<&str> = StreamError::EndOfStream;
        assert_eq!(format!("{}", err), "End of stream");
    }
}
