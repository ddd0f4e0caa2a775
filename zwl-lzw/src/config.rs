//! Codec configuration: code-space size, reset threshold and code framing.

use crate::error::Result;
use zwl_core::ZwlError;

/// First code value: literal bytes occupy `0..256`.
pub const LZW_CODE_EMPTY: u32 = 256;
/// End-of-stream marker.
pub const LZW_CODE_EOF: u32 = 257;
/// First code assignable to a multi-byte string.
pub const LZW_CODE_START: u32 = 258;

/// Smallest allowed maximum code width.
pub const MIN_CODE_MAX_BITS: u8 = 12;
/// Largest allowed maximum code width.
pub const MAX_CODE_MAX_BITS: u8 = 26;

/// Code width at the start of every epoch.
pub const INITIAL_CODE_BITS: u8 = 9;
/// Code count representable at [`INITIAL_CODE_BITS`].
pub const INITIAL_MAX_CODE: u32 = 1 << INITIAL_CODE_BITS;

/// How codes that are not tagged as a fixed byte class are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeFraming {
    /// Every code uses the current code width.
    #[default]
    Fixed,
    /// Phased-in binary: one bit shorter while the active range leaves slack.
    TruncatedBinary,
}

impl CodeFraming {
    /// Short name for reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::TruncatedBinary => "truncated binary",
        }
    }
}

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Maximum code width in bits (12-26).
    pub code_max_bits: u8,
    /// Code count that triggers an epoch reset; at most `2^code_max_bits`.
    pub table_max: u32,
    /// Framing applied to every code.
    pub framing: CodeFraming,
    /// Prefix each code with a width-class tag (8/12/16/20 bits).
    pub binary_mode: bool,
}

impl LzwConfig {
    /// Ratio used when none is given.
    pub const DEFAULT_RATIO: u8 = 10;
    /// Largest accepted ratio.
    pub const MAX_RATIO: u8 = MAX_CODE_MAX_BITS - MIN_CODE_MAX_BITS;

    /// Configuration for a compression ratio level (0-14).
    ///
    /// The ratio maps to `code_max_bits = ratio + 12`. Out-of-range levels
    /// fall back to 12 bits with a warning instead of failing.
    pub fn from_ratio(ratio: u8) -> Self {
        if ratio > Self::MAX_RATIO {
            return Self::ratio_fallback(ratio);
        }
        Self::with_code_max_bits(ratio + MIN_CODE_MAX_BITS)
    }

    /// Configuration for a ratio given as text, e.g. on the command line.
    ///
    /// Anything that is not a level in `0..=MAX_RATIO` (negative, too large
    /// or not a number) falls back to 12 bits with a warning.
    pub fn from_ratio_arg(arg: &str) -> Self {
        let arg = arg.trim();
        match arg.parse::<i64>().ok().and_then(|r| u8::try_from(r).ok()) {
            Some(ratio) => Self::from_ratio(ratio),
            None => Self::ratio_fallback(arg),
        }
    }

    fn ratio_fallback(ratio: impl std::fmt::Display) -> Self {
        log::warn!(
            "wrong compression ratio {}, setting code width to default: {}",
            ratio,
            MIN_CODE_MAX_BITS
        );
        Self::with_code_max_bits(MIN_CODE_MAX_BITS)
    }

    fn with_code_max_bits(code_max_bits: u8) -> Self {
        Self {
            code_max_bits,
            table_max: 1 << code_max_bits,
            framing: CodeFraming::Fixed,
            binary_mode: false,
        }
    }

    /// Configuration with an explicit maximum code width.
    pub fn new(code_max_bits: u8) -> Result<Self> {
        let config = Self {
            code_max_bits,
            table_max: 1u32.checked_shl(code_max_bits as u32).unwrap_or(0),
            framing: CodeFraming::Fixed,
            binary_mode: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Use the given code framing.
    pub fn with_framing(mut self, framing: CodeFraming) -> Self {
        self.framing = framing;
        self
    }

    /// Enable or disable tagged binary mode.
    pub fn with_binary_mode(mut self, binary_mode: bool) -> Self {
        self.binary_mode = binary_mode;
        self
    }

    /// Reset the code space after `table_max` codes instead of `code_max`.
    pub fn with_table_max(mut self, table_max: u32) -> Self {
        self.table_max = table_max;
        self
    }

    /// Number of codes representable at the maximum width.
    pub fn code_max(&self) -> u32 {
        1 << self.code_max_bits
    }

    /// Ratio level corresponding to `code_max_bits`.
    pub fn ratio(&self) -> u8 {
        self.code_max_bits.saturating_sub(MIN_CODE_MAX_BITS)
    }

    /// Check the configuration against the code-space limits.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CODE_MAX_BITS..=MAX_CODE_MAX_BITS).contains(&self.code_max_bits) {
            return Err(ZwlError::invalid_argument(format!(
                "code_max_bits {} outside {}..={}",
                self.code_max_bits, MIN_CODE_MAX_BITS, MAX_CODE_MAX_BITS
            ))
            .into());
        }
        if self.table_max <= LZW_CODE_START || self.table_max > self.code_max() {
            return Err(ZwlError::invalid_argument(format!(
                "table_max {} outside {}..={}",
                self.table_max,
                LZW_CODE_START + 1,
                self.code_max()
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::from_ratio(Self::DEFAULT_RATIO)
    }
}
