//! Encoder dictionary: open-addressed hash of `(parent code, symbol)` pairs.
//!
//! The table size is a prime larger than `2^code_max_bits`, so it can hold
//! every code of an epoch. Collisions are resolved by double hashing with a
//! probe step derived from the primary slot.

use crate::config::{LZW_CODE_EMPTY, MIN_CODE_MAX_BITS};
use crate::error::Result;
use zwl_core::ZwlError;
use zwl_core::error::try_alloc_table;

/// Hash table sizes indexed by `code_max_bits - 12`.
const HASH_SIZES: [u32; 15] = [
    5021,     // 12
    9859,     // 13
    18041,    // 14
    35023,    // 15
    69001,    // 16
    169937,   // 17
    290047,   // 18
    744811,   // 19
    1884119,  // 20
    2904887,  // 21
    5794307,  // 22
    8869187,  // 23
    17167081, // 24
    35086279, // 25
    68219119, // 26
];

/// Result of a dictionary probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The pair is known under this code.
    Found(u32),
    /// The pair is unknown; this slot is where it would be inserted.
    Vacant(usize),
}

/// Parent/symbol to code map used by the encoder.
#[derive(Debug)]
pub struct Dictionary {
    codes: Vec<u32>,
    parents: Vec<u32>,
    symbols: Vec<u8>,
    hash_shift: u8,
    len: usize,
}

impl Dictionary {
    /// Allocate an empty dictionary for the given maximum code width.
    pub fn new(code_max_bits: u8) -> Result<Self> {
        let size = code_max_bits
            .checked_sub(MIN_CODE_MAX_BITS)
            .and_then(|i| HASH_SIZES.get(i as usize))
            .copied()
            .ok_or_else(|| {
                ZwlError::invalid_argument(format!("no hash size for {code_max_bits}-bit codes"))
            })? as usize;

        log::debug!("allocating {size}-slot dictionary for {code_max_bits}-bit codes");

        Ok(Self {
            codes: try_alloc_table(size, LZW_CODE_EMPTY)?,
            parents: try_alloc_table(size, 0u32)?,
            symbols: try_alloc_table(size, 0u8)?,
            hash_shift: code_max_bits - 8,
            len: 0,
        })
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.codes.fill(LZW_CODE_EMPTY);
        self.len = 0;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of hash slots.
    pub fn capacity(&self) -> usize {
        self.codes.len()
    }

    /// Find the code of `parent` extended by `symbol`.
    pub fn lookup(&self, parent: u32, symbol: u8) -> Lookup {
        let size = self.codes.len();
        let mut index = (((symbol as u64) << self.hash_shift) ^ parent as u64) as usize;
        let offset = if index != 0 { size - index } else { 1 };

        loop {
            let code = self.codes[index];
            if code == LZW_CODE_EMPTY {
                return Lookup::Vacant(index);
            }
            if self.parents[index] == parent && self.symbols[index] == symbol {
                return Lookup::Found(code);
            }

            if index < offset {
                index += size - offset;
            } else {
                index -= offset;
            }
        }
    }

    /// Store `code` for `(parent, symbol)` in a slot returned by [`lookup`].
    ///
    /// [`lookup`]: Dictionary::lookup
    pub fn insert(&mut self, slot: usize, code: u32, parent: u32, symbol: u8) {
        debug_assert_eq!(self.codes[slot], LZW_CODE_EMPTY);
        self.codes[slot] = code;
        self.parents[slot] = parent;
        self.symbols[slot] = symbol;
        self.len += 1;
    }
}
