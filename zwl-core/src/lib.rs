//! # ZWL Core
//!
//! Core components for the ZWL compressor.
//!
//! This crate provides the building blocks the codec sits on:
//!
//! - [`bitstream`]: Block-buffered, MSB-first bit reader/writer
//! - [`probe`]: File existence/size probes and a monotonic timer
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: CLI                                                 │
//! │     argument parsing, overwrite policy, reporting      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     LZW encoder/decoder, dictionary, code framing      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter over 64-bit storage blocks     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use zwl_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0x1FF, 9).unwrap();
//! writer.write_zero().unwrap();
//! let data = writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(Cursor::new(data));
//! assert_eq!(reader.read_bits(9).unwrap(), 0x1FF);
//! assert!(!reader.read_bit().unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod probe;

// Re-exports for convenience
pub use bitstream::{AccessMode, BitReader, BitStream, BitWriter};
pub use error::{Result, ZwlError};
pub use probe::Timer;
