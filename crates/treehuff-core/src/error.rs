//! Error types for compression operations.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not start with the tree-header magic number.
    #[error("invalid magic number 0x{found:08x}")]
    BadMagic { found: u32 },

    /// Input ended before the serialized code tree was complete.
    #[error("truncated tree header after {bits_read} bits")]
    TruncatedTree { bits_read: u64 },

    /// Input ended before the pseudo-EOF code was decoded.
    #[error("no terminator found after {bytes_written} decoded bytes")]
    MissingTerminator { bytes_written: u64 },

    /// A header leaf names a symbol outside the alphabet.
    #[error("invalid symbol {symbol} in tree header")]
    InvalidSymbol { symbol: u32 },

    /// The header tree nests deeper than any valid code tree can.
    #[error("tree header exceeds maximum depth ({depth} levels)")]
    TreeTooDeep { depth: usize },

    /// The header tree is a single leaf and cannot encode anything.
    #[error("degenerate tree header: root is a leaf")]
    DegenerateTree,

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// Input exceeds the configured two-pass limit.
    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: u64, limit: u64 },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported feature or format.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create a bad magic error.
    pub fn bad_magic(found: u32) -> Self {
        Error::BadMagic { found }
    }

    /// Create a truncated tree error.
    pub fn truncated_tree(bits_read: u64) -> Self {
        Error::TruncatedTree { bits_read }
    }

    /// Create a missing terminator error.
    pub fn missing_terminator(bytes_written: u64) -> Self {
        Error::MissingTerminator { bytes_written }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create an I/O error with a custom message.
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io(std::io::Error::other(message.into()))
    }

    /// Check if the error was caused by a malformed compressed stream
    /// rather than by the environment.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::TruncatedTree { .. }
                | Error::MissingTerminator { .. }
                | Error::InvalidSymbol { .. }
                | Error::TreeTooDeep { .. }
                | Error::DegenerateTree
                | Error::Unsupported(_)
        )
    }

    /// Get error category for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::BadMagic { .. } => "bad_magic",
            Error::TruncatedTree { .. } => "truncated_tree",
            Error::MissingTerminator { .. } => "missing_terminator",
            Error::InvalidSymbol { .. } => "invalid_symbol",
            Error::TreeTooDeep { .. } => "tree_too_deep",
            Error::DegenerateTree => "degenerate_tree",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::InputTooLarge { .. } => "input_too_large",
            Error::Io(_) => "io_error",
            Error::Unsupported(_) => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_are_classified() {
        assert!(Error::bad_magic(0).is_format_error());
        assert!(Error::truncated_tree(3).is_format_error());
        assert!(Error::missing_terminator(0).is_format_error());
        assert!(Error::DegenerateTree.is_format_error());
        assert!(!Error::io("disk gone").is_format_error());
        assert!(!Error::buffer_too_small(10, 5).is_format_error());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::bad_magic(0xdeadbeef);
        assert_eq!(err.to_string(), "invalid magic number 0xdeadbeef");
        assert_eq!(err.category(), "bad_magic");

        let err = Error::missing_terminator(42);
        assert!(err.to_string().contains("42"));
    }
}
