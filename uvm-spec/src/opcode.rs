//! # UVM Opcode Definitions
//!
//! The opcode is the tag byte (byte 0) of every 6-byte record.
//!
//! ## Opcode Encoding
//!
//! | Mnemonic   | Tag  |
//! |------------|------|
//! | LOAD_CONST | 0x06 |
//! | READ_MEM   | 0x0A |
//! | WRITE_MEM  | 0x0C |
//! | MOD        | 0x0E |

use crate::encoding::{
    OperandField, LOAD_CONST_FIELDS, MOD_FIELDS, READ_MEM_FIELDS, WRITE_MEM_FIELDS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction opcode (tag byte)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Opcode {
    /// LOAD_CONST: registers[dst] = imm
    LoadConst = 0x06,
    /// READ_MEM: registers[dst] = memory[addr]
    ReadMem = 0x0A,
    /// WRITE_MEM: memory[addr] = registers[src]
    WriteMem = 0x0C,
    /// MOD: memory[dst_addr] = registers[a_reg] mod registers[b_reg] (0 if divisor is 0)
    Mod = 0x0E,
}

impl Opcode {
    /// Every opcode, in tag order
    pub const ALL: [Opcode; 4] = [
        Opcode::LoadConst,
        Opcode::ReadMem,
        Opcode::WriteMem,
        Opcode::Mod,
    ];

    /// Try to convert from a tag byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x06 => Some(Opcode::LoadConst),
            0x0A => Some(Opcode::ReadMem),
            0x0C => Some(Opcode::WriteMem),
            0x0E => Some(Opcode::Mod),
            _ => None,
        }
    }

    /// Convert to tag byte
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::ReadMem => "READ_MEM",
            Opcode::WriteMem => "WRITE_MEM",
            Opcode::Mod => "MOD",
        }
    }

    /// Look up an opcode by mnemonic (case-insensitive, `MODULO` accepted for `MOD`)
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "LOAD_CONST" => Some(Opcode::LoadConst),
            "READ_MEM" => Some(Opcode::ReadMem),
            "WRITE_MEM" => Some(Opcode::WriteMem),
            "MOD" | "MODULO" => Some(Opcode::Mod),
            _ => None,
        }
    }

    /// Operand fields in payload order (most significant first)
    pub fn fields(self) -> &'static [OperandField] {
        match self {
            Opcode::LoadConst => &LOAD_CONST_FIELDS,
            Opcode::ReadMem => &READ_MEM_FIELDS,
            Opcode::WriteMem => &WRITE_MEM_FIELDS,
            Opcode::Mod => &MOD_FIELDS,
        }
    }

    /// Number of operands this opcode carries
    #[inline]
    pub fn operand_count(self) -> usize {
        self.fields().len()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
    }

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::LoadConst.to_u8(), 0x06);
        assert_eq!(Opcode::ReadMem.to_u8(), 0x0A);
        assert_eq!(Opcode::WriteMem.to_u8(), 0x0C);
        assert_eq!(Opcode::Mod.to_u8(), 0x0E);
    }

    #[test]
    fn test_unknown_tags() {
        let known: Vec<u8> = Opcode::ALL.iter().map(|op| op.to_u8()).collect();
        for tag in 0..=u8::MAX {
            assert_eq!(Opcode::from_u8(tag).is_some(), known.contains(&tag));
        }
    }

    #[test]
    fn test_from_mnemonic() {
        assert_eq!(Opcode::from_mnemonic("LOAD_CONST"), Some(Opcode::LoadConst));
        assert_eq!(Opcode::from_mnemonic("read_mem"), Some(Opcode::ReadMem));
        assert_eq!(Opcode::from_mnemonic(" Write_Mem "), Some(Opcode::WriteMem));
        assert_eq!(Opcode::from_mnemonic("MODULO"), Some(Opcode::Mod));
        assert_eq!(Opcode::from_mnemonic("mod"), Some(Opcode::Mod));
        assert_eq!(Opcode::from_mnemonic("JUMP"), None);
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
            assert_eq!(op.to_string(), op.mnemonic());
        }
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(Opcode::LoadConst.operand_count(), 2);
        assert_eq!(Opcode::ReadMem.operand_count(), 2);
        assert_eq!(Opcode::WriteMem.operand_count(), 2);
        assert_eq!(Opcode::Mod.operand_count(), 3);
    }
}
