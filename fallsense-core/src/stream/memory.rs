//! Memory-based streams for testing and replay

use super::{Record, Stream, StreamError};

/// Replays a slice of records in order
///
/// ```rust
/// use fallsense_core::dataset::Sample;
/// use fallsense_core::fields::SensorField;
/// use fallsense_core::stream::{MemoryStream, Record, Stream};
///
/// let records = vec![
///     Record::unlabeled(Sample::from_pairs(&[(SensorField::JerkMag, 0.4)])),
///     Record::unlabeled(Sample::from_pairs(&[(SensorField::JerkMag, 7.9)])),
/// ];
///
/// let mut stream = MemoryStream::new(&records);
/// while let Ok(record) = stream.poll_next() {
///     // Process record
/// }
/// ```
pub struct MemoryStream<'a> {
    records: &'a [Record],
    position: usize,
}

impl<'a> MemoryStream<'a> {
    /// Create new memory stream from slice
    pub fn new(records: &'a [Record]) -> Self {
        Self { records, position: 0 }
    }

    /// Reset to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if stream is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.records.len()
    }
}

impl<'a> Stream for MemoryStream<'a> {
    type Item = Record;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let record = self
            .records
            .get(self.position)
            .copied()
            .ok_or(nb::Error::Other(StreamError::EndOfStream))?;
        self.position += 1;
        Ok(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.records.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
