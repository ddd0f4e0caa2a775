//! LZW decoder (decompression).

use crate::code_space::CodeSpace;
use crate::code_table::CodeTable;
use crate::config::{CodeFraming, LZW_CODE_EMPTY, LZW_CODE_EOF};
use crate::encoder::SessionStats;
use crate::error::{LzwError, Result};
use crate::framing::CodeReader;
use crate::header::Header;
use std::io::{Read, Write};
use zwl_core::BitReader;
use zwl_core::bitstream::BLOCK_BYTES;

/// Codes decoded between progress callbacks.
const PROGRESS_INTERVAL: u64 = 1 << 14;

/// Streaming LZW decoder.
///
/// The header is read and validated by [`LzwDecoder::new`], before any
/// output is produced.
#[derive(Debug)]
pub struct LzwDecoder<R: Read> {
    input: CodeReader<R>,
    header: Header,
    table: CodeTable,
    space: CodeSpace,
    /// Reversed expansion of the current code.
    stack: Vec<u8>,
    bytes_out: u64,
    codes: u64,
}

impl<R: Read> LzwDecoder<R> {
    /// Read the header from `reader` and set up the decoding tables.
    ///
    /// `framing` must match the framing the stream was written with; the
    /// binary-mode flag comes from the header.
    pub fn new(reader: R, framing: CodeFraming) -> Result<Self> {
        let mut bits = BitReader::new(reader);
        let header = Header::read(&mut bits)?;
        let table = CodeTable::new(header.code_max())?;

        Ok(Self {
            input: CodeReader::new(bits, framing, header.binary_mode),
            header,
            table,
            space: CodeSpace::new(header.code_max_bits, header.table_max),
            stack: Vec::new(),
            bytes_out: 0,
            codes: 0,
        })
    }

    /// Parameters read from the stream header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Record width transitions into [`LzwDecoder::stats`].
    pub fn enable_width_trace(&mut self) {
        self.space.enable_trace();
    }

    /// Decode the whole code stream into `out`.
    pub fn decode_to<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        self.decode_to_with(out, |_| {})
    }

    /// Decode the whole code stream into `out`, reporting the number of
    /// compressed bytes consumed every few thousand codes.
    pub fn decode_to_with<W, F>(&mut self, out: &mut W, mut progress: F) -> Result<u64>
    where
        W: Write,
        F: FnMut(u64),
    {
        // Previous code of this epoch; `None` right after a reset.
        let mut old: Option<u32> = None;

        loop {
            let code = self.input.read_code(&self.space)?;
            if code == LZW_CODE_EOF {
                break;
            }

            let first = match old {
                None => {
                    if code >= LZW_CODE_EMPTY {
                        return Err(LzwError::InvalidCode {
                            code,
                            next_code: self.table.next_code(),
                        });
                    }
                    self.stack.clear();
                    self.stack.push(code as u8);
                    code as u8
                }
                Some(prev) if code == self.table.next_code() => {
                    // The code being defined right now: old string plus its
                    // own first byte.
                    let first = self.table.expand(prev, &mut self.stack)?;
                    self.stack.insert(0, first);
                    first
                }
                Some(_) if self.table.is_defined(code) => {
                    self.table.expand(code, &mut self.stack)?
                }
                Some(_) => {
                    return Err(LzwError::InvalidCode {
                        code,
                        next_code: self.table.next_code(),
                    });
                }
            };

            self.stack.reverse();
            out.write_all(&self.stack)?;
            self.bytes_out += self.stack.len() as u64;

            if let Some(prev) = old {
                self.table.push(prev, first)?;
            }
            old = Some(code);

            self.codes += 1;
            if self.space.advance() {
                self.table.reset();
                old = None;
            }

            if self.codes % PROGRESS_INTERVAL == 0 {
                progress(self.input.bits_read() / 8);
            }
        }

        log::debug!(
            "decoder finished: {} codes, {} resets, {} bytes",
            self.codes,
            self.space.resets(),
            self.bytes_out
        );
        out.flush()?;
        progress(self.input.bits_read().div_ceil(64) * BLOCK_BYTES as u64);
        Ok(self.bytes_out)
    }

    /// Session counters so far.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            raw_bytes: self.bytes_out,
            packed_bytes: self.input.bits_read().div_ceil(64) * BLOCK_BYTES as u64,
            codes: self.codes,
            resets: self.space.resets(),
            width_trace: self.space.trace().to_vec(),
        }
    }

    /// Release the underlying reader.
    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }
}
