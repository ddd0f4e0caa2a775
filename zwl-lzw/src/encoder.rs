//! LZW encoder (compression).

use crate::code_space::{CodeSpace, WidthEvent};
use crate::config::{LZW_CODE_EOF, LzwConfig};
use crate::dictionary::{Dictionary, Lookup};
use crate::error::{LzwError, Result};
use crate::framing::CodeWriter;
use crate::header::Header;
use std::io::Write;
use zwl_core::BitWriter;
use zwl_core::bitstream::BLOCK_BYTES;

/// Counters collected over one encode or decode session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Uncompressed bytes consumed by the encoder or produced by the decoder.
    pub raw_bytes: u64,
    /// Compressed bytes, header and block padding included.
    pub packed_bytes: u64,
    /// Data codes (EOF excluded).
    pub codes: u64,
    /// Epoch resets.
    pub resets: u64,
    /// Width transitions, when tracing was enabled.
    pub width_trace: Vec<WidthEvent>,
}

/// Streaming LZW encoder.
///
/// Input can be fed in any number of chunks; [`LzwEncoder::finish`] writes
/// the last pending code and the end-of-stream marker.
#[derive(Debug)]
pub struct LzwEncoder<W: Write> {
    out: CodeWriter<W>,
    dict: Dictionary,
    space: CodeSpace,
    /// Code of the longest prefix matched so far.
    parent: Option<u32>,
    bytes_in: u64,
    codes: u64,
}

impl<W: Write> LzwEncoder<W> {
    /// Create an encoder and write the stream header to `writer`.
    pub fn new(writer: W, config: LzwConfig) -> Result<Self> {
        config.validate()?;

        let dict = Dictionary::new(config.code_max_bits)?;
        let mut bits = BitWriter::new(writer);
        Header::from_config(&config).write(&mut bits)?;

        log::debug!(
            "encoder: {}-bit codes, {} hash slots, reset at {}, {} framing, binary mode {}",
            config.code_max_bits,
            dict.capacity(),
            config.table_max,
            config.framing.name(),
            config.binary_mode
        );

        Ok(Self {
            out: CodeWriter::new(bits, config.framing, config.binary_mode),
            dict,
            space: CodeSpace::new(config.code_max_bits, config.table_max),
            parent: None,
            bytes_in: 0,
            codes: 0,
        })
    }

    /// Record width transitions into the final [`SessionStats`].
    pub fn enable_width_trace(&mut self) {
        self.space.enable_trace();
    }

    /// Feed a chunk of input.
    pub fn encode(&mut self, data: &[u8]) -> Result<()> {
        let mut bytes = data.iter().copied();
        let mut parent = match self.parent {
            Some(parent) => parent,
            None => match bytes.next() {
                Some(first) => first as u32,
                None => return Ok(()),
            },
        };

        for symbol in bytes {
            match self.dict.lookup(parent, symbol) {
                Lookup::Found(code) => parent = code,
                Lookup::Vacant(slot) => {
                    self.out.write_code(parent, &self.space)?;
                    self.codes += 1;

                    let code = self.space.next_code();
                    if code < self.space.code_max() {
                        self.dict.insert(slot, code, parent, symbol);
                    }
                    if self.space.advance() {
                        log::trace!("clearing {} dictionary entries", self.dict.len());
                        self.dict.clear();
                    }
                    parent = symbol as u32;
                }
            }
        }

        self.parent = Some(parent);
        self.bytes_in += data.len() as u64;
        Ok(())
    }

    /// Write the pending code and the end-of-stream marker, flush, and
    /// return the sink with the session counters.
    ///
    /// Fails with [`LzwError::EmptyInput`] when no byte was encoded.
    pub fn finish(mut self) -> Result<(W, SessionStats)> {
        let parent = self.parent.ok_or(LzwError::EmptyInput)?;

        self.out.write_code(parent, &self.space)?;
        self.codes += 1;
        if self.space.advance() {
            self.dict.clear();
        }
        self.out.write_code(LZW_CODE_EOF, &self.space)?;

        let bits = self.out.bits_written();
        let stats = SessionStats {
            raw_bytes: self.bytes_in,
            packed_bytes: bits.div_ceil(64) * BLOCK_BYTES as u64,
            codes: self.codes,
            resets: self.space.resets(),
            width_trace: self.space.trace().to_vec(),
        };
        log::debug!(
            "encoder finished: {} codes, {} resets, {} bits",
            stats.codes,
            stats.resets,
            bits
        );

        let writer = self.out.finish()?;
        Ok((writer, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(data: &[u8], config: LzwConfig) -> (Vec<u8>, SessionStats) {
        let mut encoder = LzwEncoder::new(Vec::new(), config).unwrap();
        encoder.encode(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_single_byte() {
        let (out, stats) = encode(b"A", LzwConfig::from_ratio(0));
        // 65 header bits + two 9-bit codes fit in two blocks.
        assert_eq!(out.len(), 16);
        assert_eq!(stats.codes, 1);
        assert_eq!(stats.raw_bytes, 1);
        assert_eq!(stats.packed_bytes, 16);
    }

    #[test]
    fn test_repeated_run_code_count() {
        // A, AA, AAA, AAAA then the pending "A": 5 data codes.
        let (_, stats) = encode(b"AAAAAAAAAAA", LzwConfig::from_ratio(0));
        assert_eq!(stats.codes, 5);
        assert_eq!(stats.resets, 0);
    }

    #[test]
    fn test_chunking_is_transparent() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT#".repeat(50);
        let (whole, _) = encode(&data, LzwConfig::default());

        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::default()).unwrap();
        for chunk in data.chunks(7) {
            encoder.encode(chunk).unwrap();
        }
        encoder.encode(&[]).unwrap();
        let (chunked, stats) = encoder.finish().unwrap();

        assert_eq!(whole, chunked);
        assert_eq!(stats.raw_bytes, data.len() as u64);
    }

    #[test]
    fn test_empty_input_rejected() {
        let encoder = LzwEncoder::new(Vec::new(), LzwConfig::default()).unwrap();
        assert!(matches!(encoder.finish(), Err(LzwError::EmptyInput)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LzwConfig::from_ratio(0).with_table_max(100);
        assert!(LzwEncoder::new(Vec::new(), config).is_err());
    }

    #[test]
    fn test_small_table_resets() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 251) as u8).collect();
        let config = LzwConfig::from_ratio(0).with_table_max(300);
        let (_, stats) = encode(&data, config);
        assert!(stats.resets > 0);
        assert_eq!(stats.resets, stats.codes / (300 - 258));
    }
}
