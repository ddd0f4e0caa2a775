//! Block-buffered bit-level I/O.
//!
//! This module provides `BitReader` and `BitWriter`, which pack and unpack
//! fields of 1 to 64 bits into a fixed buffer of 64-bit storage blocks.
//! The buffer is refilled or flushed in whole blocks only.
//!
//! # Bit Ordering
//!
//! Fields are packed MSB-first: the first bit written lands in the most
//! significant bit of the first block, and a field that does not fit in the
//! current block continues at the top of the next one. Blocks are kept in
//! native byte order in memory and serialised little-endian exactly at the
//! flush/refill boundary, so the on-disk layout does not depend on the host.
//!
//! # Example
//!
//! ```
//! use zwl_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0xABCD, 16).unwrap();
//! let output = writer.finish().unwrap();
//! assert_eq!(output.len(), 8); // one whole block
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(16).unwrap(), 0xABCD);
//! ```

use crate::error::{Result, ZwlError};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// Size of one storage block in bytes.
pub const BLOCK_BYTES: usize = 8;
/// Size of one storage block in bits.
pub const BLOCK_BITS: usize = BLOCK_BYTES * 8;
/// Number of blocks held in the buffer.
pub const BUFFER_BLOCKS: usize = 512;
/// Buffer capacity in bits; the cursor always stays below this.
pub const BUFFER_BITS: usize = BUFFER_BLOCKS * BLOCK_BITS;

const BUFFER_BYTES: usize = BUFFER_BLOCKS * BLOCK_BYTES;

/// `LOW_MASK[n]` keeps the `n` least significant bits.
static LOW_MASK: [u64; 65] = build_low_masks();
/// `HIGH_MASK[n]` keeps the `n` most significant bits.
static HIGH_MASK: [u64; 65] = build_high_masks();

const fn build_low_masks() -> [u64; 65] {
    let mut masks = [0u64; 65];
    let mut n = 1;
    while n <= 64 {
        masks[n] = u64::MAX >> (64 - n);
        n += 1;
    }
    masks
}

const fn build_high_masks() -> [u64; 65] {
    let mut masks = [0u64; 65];
    let mut n = 1;
    while n <= 64 {
        masks[n] = u64::MAX << (64 - n);
        n += 1;
    }
    masks
}

#[inline]
fn check_width(count: u8) -> Result<()> {
    if count == 0 || count > 64 {
        return Err(ZwlError::invalid_argument(format!(
            "bit field width {} outside 1..=64",
            count
        )));
    }
    Ok(())
}

/// Fill `buf` from `reader`, retrying interrupted reads.
///
/// Returns fewer bytes than `buf.len()` only when the source is exhausted.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match reader.read(&mut buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(done)
}

/// Access mode requested when opening a [`BitStream`].
///
/// A stream is bound to exactly one direction; requesting both or neither
/// is rejected by [`BitStream::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessMode {
    /// Open for reading.
    pub read: bool,
    /// Open for writing (creates or truncates the file).
    pub write: bool,
}

impl AccessMode {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
    };

    /// Write-only access.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
    };
}

/// A bit stream bound to one file in one direction.
#[derive(Debug)]
pub enum BitStream {
    /// Read-only stream.
    Reader(BitReader<File>),
    /// Write-only stream.
    Writer(BitWriter<File>),
}

impl BitStream {
    /// Open `path` in the given mode.
    ///
    /// Write mode creates the file or truncates an existing one.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        match (mode.read, mode.write) {
            (true, false) => Ok(Self::Reader(BitReader::open(path)?)),
            (false, true) => Ok(Self::Writer(BitWriter::create(path)?)),
            _ => Err(ZwlError::invalid_argument(
                "bit stream mode must be read-only or write-only",
            )),
        }
    }

    /// Close the stream, flushing a write stream's partial final block.
    pub fn close(self) -> Result<()> {
        match self {
            Self::Reader(reader) => {
                reader.close();
                Ok(())
            }
            Self::Writer(writer) => writer.finish().map(drop),
        }
    }
}

/// A block-buffered, MSB-first bit reader.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Decoded storage blocks.
    blocks: Box<[u64]>,
    /// Raw bytes of the last refill.
    raw: Box<[u8]>,
    /// Bit cursor within the valid part of the buffer.
    pos: usize,
    /// Bytes loaded by the last refill.
    valid_bytes: usize,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl BitReader<File> {
    /// Open a file for bit-level reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            blocks: vec![0u64; BUFFER_BLOCKS].into_boxed_slice(),
            raw: vec![0u8; BUFFER_BYTES].into_boxed_slice(),
            pos: 0,
            valid_bytes: 0,
            total_bits_read: 0,
        }
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Close the reader, releasing the underlying handle.
    pub fn close(self) {
        drop(self.reader);
    }

    /// Load the next run of whole blocks from the source.
    fn refill(&mut self) -> Result<()> {
        let n = read_full(&mut self.reader, &mut self.raw)?;
        if n == 0 {
            return Err(ZwlError::end_of_stream(self.total_bits_read));
        }
        if n % BLOCK_BYTES != 0 {
            return Err(ZwlError::corrupt_stream(n, BLOCK_BYTES));
        }
        log::trace!("bit stream refill: {} bytes", n);

        for (block, chunk) in self
            .blocks
            .iter_mut()
            .zip(self.raw[..n].chunks_exact(BLOCK_BYTES))
        {
            let mut bytes = [0u8; BLOCK_BYTES];
            bytes.copy_from_slice(chunk);
            *block = u64::from_le_bytes(bytes);
        }

        self.valid_bytes = n;
        self.pos = 0;
        Ok(())
    }

    /// Read `count` bits (1-64), first bit read in the most significant
    /// position of the result.
    ///
    /// Returns [`ZwlError::EndOfStream`] when the source is exhausted at a
    /// refill boundary and [`ZwlError::CorruptStream`] when a refill does
    /// not yield whole blocks.
    pub fn read_bits(&mut self, count: u8) -> Result<u64> {
        check_width(count)?;

        let mut data = 0u64;
        let mut len = count as usize;

        while len > 0 {
            if self.pos == self.valid_bytes * 8 {
                self.refill()?;
            }

            let block = self.blocks[self.pos / BLOCK_BITS];
            let room = BLOCK_BITS - self.pos % BLOCK_BITS;

            if len >= room {
                len -= room;
                data |= (block & LOW_MASK[room]) << len;
                self.pos += room;
                self.total_bits_read += room as u64;
            } else {
                data |= (block >> (room - len)) & LOW_MASK[len];
                self.pos += len;
                self.total_bits_read += len as u64;
                len = 0;
            }
        }

        Ok(data)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }
}

/// A block-buffered, MSB-first bit writer.
///
/// Full buffers are flushed automatically. Call [`BitWriter::finish`] to
/// write the partial final block; a writer dropped without `finish` loses
/// its buffered bits.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Storage blocks being filled.
    blocks: Box<[u64]>,
    /// Serialisation scratch for flushes.
    raw: Box<[u8]>,
    /// Bit cursor within the buffer.
    pos: usize,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter<File> {
    /// Create (or truncate) a file for bit-level writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blocks: vec![0u64; BUFFER_BLOCKS].into_boxed_slice(),
            raw: vec![0u8; BUFFER_BYTES].into_boxed_slice(),
            pos: 0,
            total_bits_written: 0,
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Serialise the first `count` blocks little-endian and write them out.
    fn flush_blocks(&mut self, count: usize) -> Result<()> {
        for (block, chunk) in self.blocks[..count]
            .iter()
            .zip(self.raw.chunks_exact_mut(BLOCK_BYTES))
        {
            chunk.copy_from_slice(&block.to_le_bytes());
        }
        self.writer.write_all(&self.raw[..count * BLOCK_BYTES])?;
        log::trace!("bit stream flush: {} blocks", count);
        Ok(())
    }

    #[inline]
    fn flush_if_full(&mut self) -> Result<()> {
        if self.pos == BUFFER_BITS {
            self.flush_blocks(BUFFER_BLOCKS)?;
            self.pos = 0;
        }
        Ok(())
    }

    /// Write the low `count` bits (1-64) of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u8) -> Result<()> {
        check_width(count)?;

        let mut len = count as usize;
        self.total_bits_written += len as u64;

        while len > 0 {
            let idx = self.pos / BLOCK_BITS;
            let used = self.pos % BLOCK_BITS;
            let room = BLOCK_BITS - used;

            self.blocks[idx] &= HIGH_MASK[used];
            if len >= room {
                len -= room;
                self.blocks[idx] |= (value >> len) & LOW_MASK[room];
                self.pos += room;
            } else {
                self.blocks[idx] |= (value & LOW_MASK[len]) << (room - len);
                self.pos += len;
                len = 0;
            }
            self.flush_if_full()?;
        }

        Ok(())
    }

    /// Write a single `1` bit. Same effect as `write_bits(1, 1)`.
    #[inline]
    pub fn write_one(&mut self) -> Result<()> {
        let idx = self.pos / BLOCK_BITS;
        let used = self.pos % BLOCK_BITS;
        self.blocks[idx] &= HIGH_MASK[used];
        self.blocks[idx] |= 1u64 << (BLOCK_BITS - 1 - used);
        self.pos += 1;
        self.total_bits_written += 1;
        self.flush_if_full()
    }

    /// Write a single `0` bit. Same effect as `write_bits(0, 1)`.
    #[inline]
    pub fn write_zero(&mut self) -> Result<()> {
        let idx = self.pos / BLOCK_BITS;
        let used = self.pos % BLOCK_BITS;
        self.blocks[idx] &= HIGH_MASK[used];
        self.pos += 1;
        self.total_bits_written += 1;
        self.flush_if_full()
    }

    /// Flush the touched blocks (unused low bits zero) and return the
    /// underlying writer.
    pub fn finish(mut self) -> Result<W> {
        let touched = self.pos.div_ceil(BLOCK_BITS);
        if touched > 0 {
            let used = self.pos % BLOCK_BITS;
            self.blocks[touched - 1] &= HIGH_MASK[if used == 0 { BLOCK_BITS } else { used }];
            self.flush_blocks(touched)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
