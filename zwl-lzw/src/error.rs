//! LZW-specific error types.

use std::io;
use thiserror::Error;
use zwl_core::ZwlError;

/// Coarse classification of codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Open/read/write failure on an underlying file.
    Io,
    /// A caller-supplied argument outside the accepted domain.
    InvalidArgument,
    /// Header or mid-stream structural violation.
    InvalidFormat,
    /// Table allocation failure.
    OutOfMemory,
}

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// Header magic does not identify a ZWL stream.
    #[error("Invalid magic number: expected {expected:#08x}, found {found:#08x}")]
    InvalidMagic {
        /// Expected magic value.
        expected: u32,
        /// Magic value found in the stream.
        found: u32,
    },

    /// Header field outside its valid range.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// A code that cannot occur at this point of the stream.
    #[error("Invalid LZW code {code} (next assignable code {next_code})")]
    InvalidCode {
        /// The offending code.
        code: u32,
        /// Next code the table would assign.
        next_code: u32,
    },

    /// Compression of an empty input was requested.
    #[error("Input is empty")]
    EmptyInput,

    /// Code stream ended before the end-of-stream code.
    #[error("Unexpected end of data at bit position {bit_position}")]
    UnexpectedEof {
        /// Bit position where the data ran out.
        bit_position: u64,
    },

    /// Bit stream or allocation error.
    #[error(transparent)]
    Core(#[from] ZwlError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;

impl LzwError {
    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Map this error onto the codec's four failure classes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMagic { .. }
            | Self::InvalidHeader { .. }
            | Self::InvalidCode { .. }
            | Self::UnexpectedEof { .. } => ErrorKind::InvalidFormat,
            Self::EmptyInput => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::Io,
            Self::Core(core) => match core {
                ZwlError::Io(_) => ErrorKind::Io,
                ZwlError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                ZwlError::InvalidFormat { .. }
                | ZwlError::CorruptStream { .. }
                | ZwlError::EndOfStream { .. } => ErrorKind::InvalidFormat,
                ZwlError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            },
        }
    }
}

/// Treat a clean end of the bit stream as truncated compressed data.
pub(crate) fn truncated(err: ZwlError) -> LzwError {
    match err {
        ZwlError::EndOfStream { bit_position } => LzwError::UnexpectedEof { bit_position },
        other => other.into(),
    }
}
