//! Adaptive code-width state shared by the encoder and the decoder.
//!
//! Both sides advance the same `CodeSpace` once per data code, so the width
//! used for every code on the wire is identical in both directions.

use crate::config::{INITIAL_CODE_BITS, INITIAL_MAX_CODE, LZW_CODE_START};

/// A change of the code width state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthEvent {
    /// Code width grew by one bit.
    Grow {
        /// New code width in bits.
        code_bits: u8,
        /// New number of codes representable at that width.
        max_code: u32,
    },
    /// The code space was reset to its initial state.
    Reset,
}

/// Code-width state machine of one epoch-based code space.
#[derive(Debug, Clone)]
pub struct CodeSpace {
    code_bits: u8,
    max_code: u32,
    next_code: u32,
    code_max_bits: u8,
    table_max: u32,
    resets: u64,
    trace: Option<Vec<WidthEvent>>,
}

impl CodeSpace {
    /// Create a code space in its initial state.
    pub fn new(code_max_bits: u8, table_max: u32) -> Self {
        Self {
            code_bits: INITIAL_CODE_BITS,
            max_code: INITIAL_MAX_CODE,
            next_code: LZW_CODE_START,
            code_max_bits,
            table_max,
            resets: 0,
            trace: None,
        }
    }

    /// Current code width in bits.
    #[inline]
    pub fn code_bits(&self) -> u8 {
        self.code_bits
    }

    /// Number of codes representable at the current width.
    #[inline]
    pub fn max_code(&self) -> u32 {
        self.max_code
    }

    /// Next code to be assigned.
    #[inline]
    pub fn next_code(&self) -> u32 {
        self.next_code
    }

    /// Unused values at the current width (`max_code - next_code`).
    #[inline]
    pub fn slack(&self) -> u32 {
        self.max_code - self.next_code
    }

    /// Codes representable at the maximum width.
    #[inline]
    pub fn code_max(&self) -> u32 {
        1 << self.code_max_bits
    }

    /// Number of epoch resets so far.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Start recording width transitions.
    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    /// Recorded width transitions (empty unless tracing is enabled).
    pub fn trace(&self) -> &[WidthEvent] {
        self.trace.as_deref().unwrap_or(&[])
    }

    fn record(&mut self, event: WidthEvent) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event);
        }
    }

    fn reset(&mut self) {
        self.code_bits = INITIAL_CODE_BITS;
        self.max_code = INITIAL_MAX_CODE;
        self.next_code = LZW_CODE_START;
    }

    /// Account for one data code.
    ///
    /// Grows the width when the code just assigned needs one more bit, then
    /// moves to the next code. Returns `true` when `table_max` was reached and
    /// the space went back to its initial state; the caller must then clear
    /// its dictionary.
    pub fn advance(&mut self) -> bool {
        if self.next_code == self.max_code && self.code_bits < self.code_max_bits {
            self.code_bits += 1;
            self.max_code <<= 1;
            log::trace!(
                "code width grew to {} bits at code {}",
                self.code_bits,
                self.next_code
            );
            self.record(WidthEvent::Grow {
                code_bits: self.code_bits,
                max_code: self.max_code,
            });
        }

        self.next_code += 1;
        if self.next_code == self.table_max {
            self.reset();
            self.resets += 1;
            log::debug!("code space reset (epoch {})", self.resets);
            self.record(WidthEvent::Reset);
            return true;
        }
        false
    }
}
