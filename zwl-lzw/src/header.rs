//! Compressed stream header.
//!
//! ```text
//! magic (24) | code_max_bits (8) | table_max (32) | binary mode (1)
//! ```
//!
//! The code stream starts on the bit right after the header.

use crate::config::{LZW_CODE_START, LzwConfig, MAX_CODE_MAX_BITS, MIN_CODE_MAX_BITS};
use crate::error::{LzwError, Result};
use std::io::{Read, Write};
use zwl_core::{BitReader, BitWriter, ZwlError};

/// "ZWL" in the low 24 bits.
pub const HEADER_MAGIC: u32 = 0x57_5A_4C;

/// Header length in bits.
pub const HEADER_BITS: u64 = 24 + 8 + 32 + 1;

/// Parameters carried at the start of every compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Maximum code width.
    pub code_max_bits: u8,
    /// Code count that triggers an epoch reset.
    pub table_max: u32,
    /// Codes carry width-class tags.
    pub binary_mode: bool,
}

impl Header {
    /// Header describing streams produced with `config`.
    pub fn from_config(config: &LzwConfig) -> Self {
        Self {
            code_max_bits: config.code_max_bits,
            table_max: config.table_max,
            binary_mode: config.binary_mode,
        }
    }

    /// Codes representable at the maximum width.
    pub fn code_max(&self) -> u32 {
        1 << self.code_max_bits
    }

    /// Check the fields against the accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CODE_MAX_BITS..=MAX_CODE_MAX_BITS).contains(&self.code_max_bits) {
            return Err(LzwError::invalid_header(format!(
                "maximum code width {} outside {}..={}",
                self.code_max_bits, MIN_CODE_MAX_BITS, MAX_CODE_MAX_BITS
            )));
        }
        if self.table_max <= LZW_CODE_START || self.table_max > self.code_max() {
            return Err(LzwError::invalid_header(format!(
                "table reset size {} outside {}..={}",
                self.table_max,
                LZW_CODE_START + 1,
                self.code_max()
            )));
        }
        Ok(())
    }

    /// Write the header fields.
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        writer.write_bits(HEADER_MAGIC as u64, 24)?;
        writer.write_bits(self.code_max_bits as u64, 8)?;
        writer.write_bits(self.table_max as u64, 32)?;
        writer.write_bits(self.binary_mode as u64, 1)?;
        Ok(())
    }

    /// Read and validate a header.
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let magic = read_field(reader, 24)? as u32;
        if magic != HEADER_MAGIC {
            return Err(LzwError::InvalidMagic {
                expected: HEADER_MAGIC,
                found: magic,
            });
        }

        let header = Self {
            code_max_bits: read_field(reader, 8)? as u8,
            table_max: read_field(reader, 32)? as u32,
            binary_mode: read_field(reader, 1)? == 1,
        };
        header.validate()?;

        log::debug!(
            "header: {}-bit codes, reset at {}, binary mode {}",
            header.code_max_bits,
            header.table_max,
            header.binary_mode
        );
        Ok(header)
    }
}

fn read_field<R: Read>(reader: &mut BitReader<R>, bits: u8) -> Result<u64> {
    reader.read_bits(bits).map_err(|err| match err {
        ZwlError::EndOfStream { .. } => LzwError::invalid_header("stream ends inside the header"),
        other => other.into(),
    })
}
