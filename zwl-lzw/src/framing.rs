//! Code framing on top of the bit stream.
//!
//! A code is written either with the current code width or in truncated
//! binary, which saves one bit while the active code range leaves slack.
//! In tagged binary mode every code is preceded by a short prefix naming
//! the smallest fixed byte class (8, 12, 16 or 20 bits) it fits in; codes
//! wider than all classes fall back to the active framing behind a `0` tag.

use crate::code_space::CodeSpace;
use crate::config::CodeFraming;
use crate::error::{Result, truncated};
use std::io::{Read, Write};
use zwl_core::{BitReader, BitWriter};

/// Fixed class widths in tag order.
const TAG_CLASS_BITS: [u8; 4] = [8, 12, 16, 20];

/// Fixed classes available at a code width.
pub fn tag_classes(code_bits: u8) -> &'static [u8] {
    let count = match code_bits {
        0..=13 => 1,
        14..=17 => 2,
        18..=21 => 3,
        _ => 4,
    };
    &TAG_CLASS_BITS[..count]
}

/// Write `code` in truncated binary for the state of `space`.
///
/// With `u = max_code - next_code`, codes below `u` take `code_bits - 1`
/// bits and the rest are written as `code + u` in `code_bits` bits.
pub fn write_truncated<W: Write>(
    writer: &mut BitWriter<W>,
    code: u32,
    space: &CodeSpace,
) -> Result<()> {
    let u = space.slack();
    let bits = space.code_bits();
    if code < u {
        writer.write_bits(code as u64, bits - 1)?;
    } else {
        writer.write_bits((code + u) as u64, bits)?;
    }
    Ok(())
}

/// Read one truncated binary code for the state of `space`.
pub fn read_truncated<R: Read>(reader: &mut BitReader<R>, space: &CodeSpace) -> Result<u32> {
    let u = space.slack() as u64;
    let value = reader.read_bits(space.code_bits() - 1).map_err(truncated)?;
    if value < u {
        return Ok(value as u32);
    }
    let low = reader.read_bit().map_err(truncated)?;
    Ok((((value << 1) | low as u64) - u) as u32)
}

/// Writes codes with the configured framing.
#[derive(Debug)]
pub struct CodeWriter<W: Write> {
    writer: BitWriter<W>,
    framing: CodeFraming,
    binary_mode: bool,
}

impl<W: Write> CodeWriter<W> {
    /// Wrap a bit writer.
    pub fn new(writer: BitWriter<W>, framing: CodeFraming, binary_mode: bool) -> Self {
        Self {
            writer,
            framing,
            binary_mode,
        }
    }

    /// Bits written so far, header included.
    pub fn bits_written(&self) -> u64 {
        self.writer.bits_written()
    }

    /// Write one code at the current state of `space`.
    pub fn write_code(&mut self, code: u32, space: &CodeSpace) -> Result<()> {
        if self.binary_mode {
            let classes = tag_classes(space.code_bits());
            let k = classes.len();
            if let Some(i) = classes.iter().position(|&bits| code < 1 << bits) {
                // k - i one-bits, closed by a zero unless this is the 8-bit class.
                let ones = (k - i) as u8;
                let (tag, tag_bits) = if i == 0 {
                    ((1u64 << ones) - 1, ones)
                } else {
                    (((1u64 << ones) - 1) << 1, ones + 1)
                };
                self.writer.write_bits(tag, tag_bits)?;
                self.writer.write_bits(code as u64, classes[i])?;
                return Ok(());
            }
            self.writer.write_zero()?;
        }
        self.write_framed(code, space)
    }

    fn write_framed(&mut self, code: u32, space: &CodeSpace) -> Result<()> {
        match self.framing {
            CodeFraming::Fixed => {
                self.writer.write_bits(code as u64, space.code_bits())?;
                Ok(())
            }
            CodeFraming::TruncatedBinary => write_truncated(&mut self.writer, code, space),
        }
    }

    /// Flush the final partial block and return the sink.
    pub fn finish(self) -> Result<W> {
        Ok(self.writer.finish()?)
    }
}

/// Reads codes written by a [`CodeWriter`] with the same settings.
#[derive(Debug)]
pub struct CodeReader<R: Read> {
    reader: BitReader<R>,
    framing: CodeFraming,
    binary_mode: bool,
}

impl<R: Read> CodeReader<R> {
    /// Wrap a bit reader positioned after the header.
    pub fn new(reader: BitReader<R>, framing: CodeFraming, binary_mode: bool) -> Self {
        Self {
            reader,
            framing,
            binary_mode,
        }
    }

    /// Bits consumed so far, header included.
    pub fn bits_read(&self) -> u64 {
        self.reader.bits_read()
    }

    /// Read one code at the current state of `space`.
    pub fn read_code(&mut self, space: &CodeSpace) -> Result<u32> {
        if self.binary_mode {
            let classes = tag_classes(space.code_bits());
            let k = classes.len();
            if self.reader.read_bit().map_err(truncated)? {
                let mut ones = 1;
                while ones < k && self.reader.read_bit().map_err(truncated)? {
                    ones += 1;
                }
                let bits = classes[k - ones];
                let code = self.reader.read_bits(bits).map_err(truncated)?;
                return Ok(code as u32);
            }
        }
        match self.framing {
            CodeFraming::Fixed => {
                let code = self
                    .reader
                    .read_bits(space.code_bits())
                    .map_err(truncated)?;
                Ok(code as u32)
            }
            CodeFraming::TruncatedBinary => read_truncated(&mut self.reader, space),
        }
    }

    /// Release the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
