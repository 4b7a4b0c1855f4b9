//! Error handling for RAT animation files

use std::io;
use thiserror::Error;

/// Errors that can occur when working with RAT animation files
#[derive(Debug, Error)]
pub enum RatError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in the file header
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Error when parsing RAT data
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Data validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The file is shorter than its header claims
    #[error("Truncated file: expected at least {expected} bytes, found {actual}")]
    Truncated {
        /// Minimum byte count required by the header
        expected: u64,
        /// Actual byte count available
        actual: u64,
    },

    /// A frame's vertex count does not match the animation's
    #[error("Frame {frame} has {actual} vertices, expected {expected}")]
    FrameSizeMismatch {
        /// Index of the offending frame
        frame: usize,
        /// Vertex count of the first frame
        expected: usize,
        /// Vertex count of the offending frame
        actual: usize,
    },

    /// A bit count outside the supported 1-32 range
    #[error("Invalid bit width: {0} (must be 1-32)")]
    InvalidBitWidth(u8),

    /// The byte budget cannot hold the static payload
    #[error("Byte budget exceeded: budget is {budget} bytes, need at least {required}")]
    BudgetExceeded {
        /// The configured per-file byte budget
        budget: u64,
        /// The minimum budget that would succeed
        required: u64,
    },

    /// The delta stream ended before the requested frame was reached
    #[error("Delta stream exhausted: needed {needed} bits at bit offset {offset}, stream holds {available}")]
    EndOfStream {
        /// Bits requested by the current read
        needed: u32,
        /// Bit offset of the failed read
        offset: u64,
        /// Total bits in the stream
        available: u64,
    },

    /// Chunk files being assembled disagree on their static payload
    #[error("Chunk mismatch: {0}")]
    ChunkMismatch(String),
}

/// Type alias for Results from RAT operations
pub type Result<T> = std::result::Result<T, RatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RatError::ParseError("Test error".to_string());
        assert_eq!(format!("{}", error), "Parse error: Test error");

        let error = RatError::InvalidMagic {
            expected: "RAT3".to_string(),
            found: "ABCD".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Invalid magic value: expected 'RAT3', found 'ABCD'"
        );

        let error = RatError::BudgetExceeded {
            budget: 100,
            required: 164,
        };
        assert_eq!(
            format!("{}", error),
            "Byte budget exceeded: budget is 100 bytes, need at least 164"
        );
    }
}
