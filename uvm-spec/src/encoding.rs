//! # Record Layout Constants and Helpers
//!
//! Every instruction is a 6-byte record:
//!
//! ```text
//! byte 0     bytes 1..6 (40-bit payload, big-endian, MSB-first fields)
//! [tag:8] | LOAD_CONST: [dst:8][imm:32]
//!         | READ_MEM:   [dst:8][addr:16][pad:16]
//!         | WRITE_MEM:  [addr:16][src:8][pad:16]
//!         | MOD:        [dst_addr:16][a_reg:8][b_reg:8][pad:8]
//! ```
//!
//! Unused (pad) bits are zero on encode.

use crate::error::{Result, UvmError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Record Geometry
// ============================================================================

/// Size of one record in bytes
pub const RECORD_SIZE: usize = 6;

/// Offset of the tag byte within a record
pub const TAG_OFFSET: usize = 0;

/// Width of the operand payload in bits
pub const PAYLOAD_BITS: u32 = 40;

/// Mask covering the whole payload
pub const PAYLOAD_MASK: u64 = (1 << PAYLOAD_BITS) - 1;

/// One packed instruction
pub type BinaryRecord = [u8; RECORD_SIZE];

// ============================================================================
// Operand Fields
// ============================================================================

/// Logical column of the tabular program format an operand is read from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
}

impl Column {
    /// All operand columns, left to right
    pub const ALL: [Column; 5] = [Column::A, Column::B, Column::C, Column::D, Column::E];

    /// Zero-based position after the command column
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column header text
    pub const fn name(self) -> &'static str {
        match self {
            Column::A => "A",
            Column::B => "B",
            Column::C => "C",
            Column::D => "D",
            Column::E => "E",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-width bit range inside the 40-bit payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandField {
    /// Operand name as used in logs and error messages
    pub name: &'static str,
    /// Program column the operand is read from
    pub column: Column,
    /// Width in bits
    pub bits: u32,
    /// Position of the field's least significant bit within the payload
    pub shift: u32,
}

impl OperandField {
    /// Largest value the field can hold
    #[inline]
    pub const fn max_value(&self) -> u64 {
        field_mask(self.bits)
    }

    /// Mask of the field's bits in payload position
    #[inline]
    pub const fn payload_mask(&self) -> u64 {
        field_mask(self.bits) << self.shift
    }

    /// Check a value against the field width
    pub fn check(&self, value: u64) -> Result<()> {
        if value > self.max_value() {
            return Err(UvmError::Encoding {
                field: self.name,
                value,
                bits: self.bits,
            });
        }
        Ok(())
    }

    /// Extract this field from a payload
    #[inline]
    pub const fn extract(&self, payload: u64) -> u64 {
        (payload >> self.shift) & field_mask(self.bits)
    }

    /// Place an (already checked) value into payload position
    #[inline]
    pub const fn insert(&self, value: u64) -> u64 {
        (value & field_mask(self.bits)) << self.shift
    }
}

/// LOAD_CONST: dst:8, imm:32
pub static LOAD_CONST_FIELDS: [OperandField; 2] = [
    OperandField {
        name: "dst",
        column: Column::A,
        bits: 8,
        shift: 32,
    },
    OperandField {
        name: "imm",
        column: Column::B,
        bits: 32,
        shift: 0,
    },
];

/// READ_MEM: dst:8, addr:16, pad:16
pub static READ_MEM_FIELDS: [OperandField; 2] = [
    OperandField {
        name: "dst",
        column: Column::A,
        bits: 8,
        shift: 32,
    },
    OperandField {
        name: "addr",
        column: Column::B,
        bits: 16,
        shift: 16,
    },
];

/// WRITE_MEM: addr:16, src:8, pad:16
pub static WRITE_MEM_FIELDS: [OperandField; 2] = [
    OperandField {
        name: "addr",
        column: Column::A,
        bits: 16,
        shift: 24,
    },
    OperandField {
        name: "src",
        column: Column::B,
        bits: 8,
        shift: 16,
    },
];

/// MOD: dst_addr:16, a_reg:8, b_reg:8, pad:8
pub static MOD_FIELDS: [OperandField; 3] = [
    OperandField {
        name: "dst_addr",
        column: Column::A,
        bits: 16,
        shift: 24,
    },
    OperandField {
        name: "a_reg",
        column: Column::B,
        bits: 8,
        shift: 16,
    },
    OperandField {
        name: "b_reg",
        column: Column::C,
        bits: 8,
        shift: 8,
    },
];

// ============================================================================
// Bit Helpers
// ============================================================================

/// All-ones mask of the given width
#[inline]
pub const fn field_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Payload bits not covered by any field
pub fn padding_mask(fields: &[OperandField]) -> u64 {
    let used = fields.iter().fold(0u64, |acc, f| acc | f.payload_mask());
    PAYLOAD_MASK & !used
}

/// Build a record from a tag and a 40-bit payload
#[inline]
pub fn pack_record(tag: u8, payload: u64) -> BinaryRecord {
    let mut record = [0u8; RECORD_SIZE];
    record[TAG_OFFSET] = tag;
    // low 5 bytes of the big-endian u64
    record[1..].copy_from_slice(&(payload & PAYLOAD_MASK).to_be_bytes()[3..]);
    record
}

/// Read the 40-bit payload out of a record
#[inline]
pub fn extract_payload(record: &BinaryRecord) -> u64 {
    let mut wide = [0u8; 8];
    wide[3..].copy_from_slice(&record[1..]);
    u64::from_be_bytes(wide)
}

/// Read the tag byte of a record
#[inline]
pub const fn extract_tag(record: &BinaryRecord) -> u8 {
    record[TAG_OFFSET]
}

/// Format record bytes as space-separated upper-case hex
///
/// Accepts partial records so a truncated tail can be shown too.
pub fn record_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
