//! Core traits
//!
//! Small, shared abstractions: pull-based record sources and finiteness
//! checks for raw readings.

/// Pull-based source of recording rows
///
/// Streams use `nb::Result` so a source that is still filling (a live
/// capture, a socket) can report `WouldBlock` without an async runtime,
/// while file and memory sources simply never block.
///
/// ## Error Handling
///
/// - `nb::Error::WouldBlock` - no row available yet, poll again
/// - `nb::Error::Other(e)` - the stream failed or ended
///
/// End of data is reported through the error type (see
/// [`StreamError::EndOfStream`](crate::stream::StreamError::EndOfStream))
/// and is sticky: once returned, every later poll returns it again.
pub trait Stream {
    /// Type of items produced by the stream
    type Item;

    /// Type of errors that can occur
    type Error;

    /// Attempt to pull the next item from the stream
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Returns bounds on remaining items, like `Iterator::size_hint()`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Values that can be checked for physical validity
pub trait Validatable {
    /// `false` for NaN (a missing cell) and infinities
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
