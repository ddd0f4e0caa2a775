//! Decoder code table: each code maps to its parent code and final byte.

use crate::config::{LZW_CODE_EMPTY, LZW_CODE_EOF, LZW_CODE_START};
use crate::error::{LzwError, Result};
use zwl_core::ZwlError;
use zwl_core::error::try_alloc_table;

/// Parent/symbol arrays indexed by code.
#[derive(Debug)]
pub struct CodeTable {
    parents: Vec<u32>,
    symbols: Vec<u8>,
    next_code: u32,
}

impl CodeTable {
    /// Allocate a table holding `code_max` codes.
    pub fn new(code_max: u32) -> Result<Self> {
        let len = code_max as usize;
        Ok(Self {
            parents: try_alloc_table(len, 0u32)?,
            symbols: try_alloc_table(len, 0u8)?,
            next_code: LZW_CODE_START,
        })
    }

    /// Drop every multi-byte entry.
    pub fn reset(&mut self) {
        self.next_code = LZW_CODE_START;
    }

    /// Code the next [`push`](CodeTable::push) will define.
    pub fn next_code(&self) -> u32 {
        self.next_code
    }

    /// Whether `code` is a literal or an entry defined in this epoch.
    pub fn is_defined(&self, code: u32) -> bool {
        code < LZW_CODE_EMPTY || (LZW_CODE_START..self.next_code).contains(&code)
    }

    /// Define the next code as `parent` followed by `symbol`.
    pub fn push(&mut self, parent: u32, symbol: u8) -> Result<u32> {
        let code = self.next_code;
        let slot = code as usize;
        if slot >= self.parents.len() {
            return Err(ZwlError::invalid_format(format!(
                "code table full at {} entries",
                self.parents.len()
            ))
            .into());
        }
        self.parents[slot] = parent;
        self.symbols[slot] = symbol;
        self.next_code += 1;
        Ok(code)
    }

    /// Expand `code` into `stack` in reverse order and return its first byte.
    ///
    /// `stack` is cleared first; the string is `stack` read back to front.
    pub fn expand(&self, code: u32, stack: &mut Vec<u8>) -> Result<u8> {
        stack.clear();
        let mut current = code;
        while current > LZW_CODE_EOF {
            let slot = current as usize;
            if current >= self.next_code {
                return Err(LzwError::InvalidCode {
                    code: current,
                    next_code: self.next_code,
                });
            }
            stack.push(self.symbols[slot]);
            current = self.parents[slot];
        }
        if current >= LZW_CODE_EMPTY {
            return Err(LzwError::InvalidCode {
                code: current,
                next_code: self.next_code,
            });
        }
        let first = current as u8;
        stack.push(first);
        Ok(first)
    }
}
