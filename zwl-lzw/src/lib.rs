//! # ZWL-LZW: Adaptive LZW Compression
//!
//! This crate provides the ZWL file codec: adaptive-width LZW with periodic
//! dictionary resets over the block-buffered bit stream of `zwl-core`.
//!
//! ## Features
//!
//! - **Adaptive code width**: codes start at 9 bits and grow one bit at a
//!   time up to 12-26 bits
//! - **Epoch resets**: the dictionary is cleared once `table_max` codes have
//!   been assigned, bounding memory and probe chains
//! - **Truncated binary framing**: one bit saved per code while the active
//!   code range leaves slack
//! - **Tagged binary mode**: small literals and short codes are written in
//!   fixed 8/12/16/20-bit classes
//!
//! ## Stream Layout
//!
//! ```text
//! magic "ZWL" (24) | code_max_bits (8) | table_max (32) | binary (1) | codes ... | EOF (257)
//! ```
//!
//! Bits are packed most-significant first into 64-bit blocks that are
//! stored little-endian, so a compressed stream is always a whole number of
//! 8-byte blocks.
//!
//! ## Example
//!
//! ```rust
//! use zwl_lzw::{compress, decompress, CodeFraming, LzwConfig};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = compress(original, LzwConfig::from_ratio(0)).unwrap();
//! let decompressed = decompress(&compressed, CodeFraming::Fixed).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```
//!
//! The framing is not recorded in the header; a stream written with
//! [`CodeFraming::TruncatedBinary`] must be read with the same framing.
//!
//! ```rust
//! use zwl_lzw::{compress, decompress, CodeFraming, LzwConfig};
//!
//! let data = b"This is a test of compression! ".repeat(10);
//! let config = LzwConfig::default().with_framing(CodeFraming::TruncatedBinary);
//!
//! let compressed = compress(&data, config).unwrap();
//! let decompressed = decompress(&compressed, CodeFraming::TruncatedBinary).unwrap();
//! assert_eq!(decompressed, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod code_space;
mod code_table;
mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;
mod framing;
mod header;

pub use code_space::{CodeSpace, WidthEvent};
pub use code_table::CodeTable;
pub use config::{
    CodeFraming, LZW_CODE_EMPTY, LZW_CODE_EOF, LZW_CODE_START, LzwConfig, MAX_CODE_MAX_BITS,
    MIN_CODE_MAX_BITS,
};
pub use decoder::LzwDecoder;
pub use dictionary::{Dictionary, Lookup};
pub use encoder::{LzwEncoder, SessionStats};
pub use error::{ErrorKind, LzwError, Result};
pub use framing::{CodeReader, CodeWriter, read_truncated, tag_classes, write_truncated};
pub use header::{HEADER_BITS, HEADER_MAGIC, Header};

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::time::Duration;
use zwl_core::{Timer, ZwlError, probe};

/// Source read size for file compression.
const READ_BLOCK_SIZE: usize = 8192;
/// Output buffer size for file decompression.
const WRITE_BUFFER_SIZE: usize = 8192;

/// Destination file that is created on the first write.
///
/// The encoder allocates its tables and buffers the header before anything
/// reaches the sink, so a session that fails early leaves an existing
/// destination untouched.
#[derive(Debug)]
struct DeferredFile<'a> {
    path: &'a Path,
    file: Option<File>,
}

impl<'a> DeferredFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, file: None }
    }

    fn file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(self.path)?,
        };
        Ok(self.file.insert(file))
    }
}

impl Write for DeferredFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Refuse to write over the file being read.
fn check_distinct(src: &Path, dst: &Path) -> Result<()> {
    if probe::same_file(src, dst) {
        return Err(ZwlError::invalid_argument(format!(
            "\"{}\" and \"{}\" are the same file",
            src.display(),
            dst.display()
        ))
        .into());
    }
    Ok(())
}

/// Outcome of a file compression or decompression.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecReport {
    /// Bytes read from the source file.
    pub bytes_in: u64,
    /// Bytes written to the destination file.
    pub bytes_out: u64,
    /// Data codes written or read.
    pub codes: u64,
    /// Dictionary resets.
    pub resets: u64,
    /// Maximum code width of the stream.
    pub code_max_bits: u8,
    /// Wall time spent in the codec.
    pub elapsed: Duration,
}

impl CodecReport {
    /// Compressed size over uncompressed size, in percent.
    pub fn ratio_percent(&self, compressing: bool) -> f64 {
        let (raw, packed) = if compressing {
            (self.bytes_in, self.bytes_out)
        } else {
            (self.bytes_out, self.bytes_in)
        };
        if raw == 0 {
            0.0
        } else {
            packed as f64 * 100.0 / raw as f64
        }
    }
}

/// Compress a byte slice.
///
/// # Example
///
/// ```rust
/// use zwl_lzw::{compress, LzwConfig};
///
/// let data = vec![b'X'; 1000];
/// let compressed = compress(&data, LzwConfig::from_ratio(0)).unwrap();
/// assert!(compressed.len() < data.len() / 2);
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(LzwError::EmptyInput);
    }
    let mut encoder = LzwEncoder::new(Vec::new(), config)?;
    encoder.encode(data)?;
    let (out, _) = encoder.finish()?;
    Ok(out)
}

/// Decompress a byte slice produced by [`compress`] with `framing`.
pub fn decompress(data: &[u8], framing: CodeFraming) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(Cursor::new(data), framing)?;
    let mut out = Vec::new();
    decoder.decode_to(&mut out)?;
    Ok(out)
}

/// Compress the file at `src` into `dst`.
pub fn compress_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    config: LzwConfig,
) -> Result<CodecReport> {
    compress_file_with(src, dst, config, |_| {})
}

/// Compress the file at `src` into `dst`, reporting the number of source
/// bytes consumed after every read block.
///
/// An empty source, a `dst` that names the source, or a failure to allocate
/// the dictionary is reported before `dst` is created or truncated.
pub fn compress_file_with<F>(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    config: LzwConfig,
    mut progress: F,
) -> Result<CodecReport>
where
    F: FnMut(u64),
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    config.validate()?;
    check_distinct(src, dst)?;

    let mut source = File::open(src)?;
    if probe::size(src)? == 0 {
        return Err(LzwError::EmptyInput);
    }

    log::info!("compressing {} -> {}", src.display(), dst.display());
    log::info!("max code bits: {}", config.code_max_bits);

    let mut timer = Timer::started();
    let mut encoder = LzwEncoder::new(DeferredFile::new(dst), config)?;
    let mut block = vec![0u8; READ_BLOCK_SIZE];
    let mut consumed = 0u64;
    loop {
        let n = match source.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        encoder.encode(&block[..n])?;
        consumed += n as u64;
        progress(consumed);
    }

    let (_, stats) = encoder.finish()?;
    timer.stop();
    Ok(CodecReport {
        bytes_in: stats.raw_bytes,
        bytes_out: stats.packed_bytes,
        codes: stats.codes,
        resets: stats.resets,
        code_max_bits: config.code_max_bits,
        elapsed: timer.elapsed(),
    })
}

/// Decompress the file at `src` into `dst`.
pub fn decompress_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    framing: CodeFraming,
) -> Result<CodecReport> {
    decompress_file_with(src, dst, framing, |_| {})
}

/// Decompress the file at `src` into `dst`, reporting the number of
/// compressed bytes consumed as decoding progresses.
///
/// The header is validated and the code table allocated before `dst` is
/// created, so a stream with a bad header leaves an existing destination
/// untouched. A `dst` that names the source is rejected.
pub fn decompress_file_with<F>(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    framing: CodeFraming,
    progress: F,
) -> Result<CodecReport>
where
    F: FnMut(u64),
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let bytes_in = probe::size(src)?;
    check_distinct(src, dst)?;

    let mut timer = Timer::started();
    let mut decoder = LzwDecoder::new(File::open(src)?, framing)?;
    log::info!("decompressing {} -> {}", src.display(), dst.display());
    log::info!("max code bits: {}", decoder.header().code_max_bits);

    let mut out = BufWriter::with_capacity(WRITE_BUFFER_SIZE, File::create(dst)?);
    let bytes_out = decoder.decode_to_with(&mut out, progress)?;
    let stats = decoder.stats();
    timer.stop();

    Ok(CodecReport {
        bytes_in,
        bytes_out,
        codes: stats.codes,
        resets: stats.resets,
        code_max_bits: decoder.header().code_max_bits,
        elapsed: timer.elapsed(),
    })
}
