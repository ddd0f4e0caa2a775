//! Error types for ZWL operations.
//!
//! This module provides the error type shared by the bit stream and the
//! codec crates. It separates hard I/O failures from a clean end of data
//! and from structural problems found in a compressed stream.

use std::io;
use thiserror::Error;

/// The main error type for ZWL core operations.
#[derive(Debug, Error)]
pub enum ZwlError {
    /// I/O error from the underlying file, after interrupt retries.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A caller-supplied argument is outside the accepted domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// The data does not follow the compressed format.
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format violation.
        message: String,
    },

    /// A refill returned a byte count that is not a whole number of blocks.
    #[error("Corrupt stream: read {bytes} bytes, not a multiple of the {block_size}-byte block")]
    CorruptStream {
        /// Number of bytes returned by the refill.
        bytes: usize,
        /// Storage block size in bytes.
        block_size: usize,
    },

    /// No more data is available at a refill boundary.
    #[error("End of stream at bit position {bit_position}")]
    EndOfStream {
        /// Total bits consumed when the end was reached.
        bit_position: u64,
    },

    /// A table allocation could not be satisfied.
    #[error("Out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory {
        /// Number of bytes requested.
        bytes: usize,
    },
}

/// Result type alias for ZWL core operations.
pub type Result<T> = std::result::Result<T, ZwlError>;

impl ZwlError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a corrupt stream error.
    pub fn corrupt_stream(bytes: usize, block_size: usize) -> Self {
        Self::CorruptStream { bytes, block_size }
    }

    /// Create an end of stream error.
    pub fn end_of_stream(bit_position: u64) -> Self {
        Self::EndOfStream { bit_position }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(bytes: usize) -> Self {
        Self::OutOfMemory { bytes }
    }

    /// Whether this error marks a clean end of data rather than a failure.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream { .. })
    }
}

/// Allocate a zero-filled table without aborting on allocation failure.
///
/// Dictionary and code-table arrays are sized once per session; a failed
/// reservation surfaces as [`ZwlError::OutOfMemory`].
pub fn try_alloc_table<T: Copy>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| ZwlError::out_of_memory(len.saturating_mul(size_of::<T>())))?;
    table.resize(len, fill);
    Ok(table)
}
