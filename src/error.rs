//! Unified error types for chatview.
//!
//! Every fallible operation in the library returns [`ChatviewError`] through
//! the [`Result`] alias. The binary turns it into a one-line message and a
//! non-zero exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatview operations.
///
/// # Example
///
/// ```rust
/// use chatview::error::Result;
/// use chatview::Message;
///
/// fn load() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatviewError>;

/// The error type for all chatview operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatviewError {
    /// An I/O error occurred while reading the export or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The chat file could not be read.
    #[error("Failed to read chat export {}: {source}", path.display())]
    ReadExport {
        /// Path of the export
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A date given by the user could not be understood.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A filter value (message type, load count) was not recognized.
    #[error("Invalid {what} '{input}'. Expected one of: {expected}")]
    InvalidValue {
        /// What was being parsed, e.g. "message type"
        what: &'static str,
        /// The rejected input
        input: String,
        /// Accepted values
        expected: &'static str,
    },

    /// A message index outside the loaded chat.
    #[error("Message #{index} does not exist (chat has {len} messages)")]
    MessageOutOfRange {
        /// Requested index
        index: usize,
        /// Number of loaded messages
        len: usize,
    },

    /// A bookmark position that does not exist.
    #[error("Bookmark {position} does not exist ({len} bookmarks)")]
    BookmarkNotFound {
        /// Requested position
        position: usize,
        /// Number of bookmarks
        len: usize,
    },

    /// A session command that does not exist.
    #[error("Unknown command '{0}'. Type `help` for a list")]
    UnknownCommand(String),

    /// Date navigation was requested on a chat without dated messages.
    #[error("No dated messages to navigate")]
    NoDates,

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatviewError {
    /// Creates a read error for the given export path.
    pub fn read_export(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatviewError::ReadExport {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatviewError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        what: &'static str,
        input: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        ChatviewError::InvalidValue {
            what,
            input: input.into(),
            expected,
        }
    }

    /// Creates an out-of-range message error.
    pub fn message_out_of_range(index: usize, len: usize) -> Self {
        ChatviewError::MessageOutOfRange { index, len }
    }

    /// Creates a missing bookmark error.
    pub fn bookmark_not_found(position: usize, len: usize) -> Self {
        ChatviewError::BookmarkNotFound { position, len }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ChatviewError::Io(_) | ChatviewError::ReadExport { .. }
        )
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatviewError::InvalidDate { .. } | ChatviewError::NoDates)
    }

    /// Returns `true` if this error refers to a missing message or bookmark.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChatviewError::MessageOutOfRange { .. } | ChatviewError::BookmarkNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = ChatviewError::from(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_read_export_display_includes_path() {
        let err = ChatviewError::read_export(
            "/tmp/chat.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = err.to_string();
        assert!(display.contains("/tmp/chat.txt"));
        assert!(display.contains("denied"));
        assert!(err.is_io());
    }

    #[test]
    fn test_invalid_date_display() {
        let err = ChatviewError::invalid_date("31-31-2024");
        let display = err.to_string();
        assert!(display.contains("31-31-2024"));
        assert!(display.contains("YYYY-MM-DD"));
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ChatviewError::invalid_value("message type", "gif", "all, text");
        assert_eq!(
            err.to_string(),
            "Invalid message type 'gif'. Expected one of: all, text"
        );
    }

    #[test]
    fn test_not_found_predicates() {
        assert!(ChatviewError::message_out_of_range(10, 3).is_not_found());
        assert!(ChatviewError::bookmark_not_found(0, 0).is_not_found());
        assert!(!ChatviewError::NoDates.is_not_found());
        assert!(ChatviewError::NoDates.is_invalid_date());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = ChatviewError::read_export(
            "chat.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let source = err.source().expect("read errors keep their source");
        assert!(source.to_string().contains("gone"));
    }
}
