//! UVM Instruction Set
//!
//! Four instructions, each a fixed 6-byte record. Operand types match the
//! field widths, so a constructed `Instruction` always encodes.

use crate::error::{Result, UvmError};
use crate::opcode::Opcode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UVM Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// LOAD_CONST: registers[dst] = imm
    LoadConst { dst: u8, imm: u32 },

    /// READ_MEM: registers[dst] = memory[addr]
    ReadMem { dst: u8, addr: u16 },

    /// WRITE_MEM: memory[addr] = registers[src]
    WriteMem { addr: u16, src: u8 },

    /// MOD: memory[dst_addr] = registers[a_reg] mod registers[b_reg]
    ///
    /// A zero divisor yields 0.
    Mod { dst_addr: u16, a_reg: u8, b_reg: u8 },
}

impl Instruction {
    /// Get the opcode
    pub const fn opcode(&self) -> Opcode {
        match self {
            Instruction::LoadConst { .. } => Opcode::LoadConst,
            Instruction::ReadMem { .. } => Opcode::ReadMem,
            Instruction::WriteMem { .. } => Opcode::WriteMem,
            Instruction::Mod { .. } => Opcode::Mod,
        }
    }

    /// Get instruction mnemonic
    pub const fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Operand values in the order of `self.opcode().fields()`
    pub fn operand_values(&self) -> Vec<u64> {
        match *self {
            Instruction::LoadConst { dst, imm } => vec![dst as u64, imm as u64],
            Instruction::ReadMem { dst, addr } => vec![dst as u64, addr as u64],
            Instruction::WriteMem { addr, src } => vec![addr as u64, src as u64],
            Instruction::Mod { dst_addr, a_reg, b_reg } => {
                vec![dst_addr as u64, a_reg as u64, b_reg as u64]
            }
        }
    }

    /// Named operands, e.g. `[("dst", 5), ("imm", 803)]`
    pub fn operands(&self) -> Vec<(&'static str, u64)> {
        self.opcode()
            .fields()
            .iter()
            .map(|f| f.name)
            .zip(self.operand_values())
            .collect()
    }

    /// Build an instruction from raw operand values, checking each against its field width
    pub fn from_operands(opcode: Opcode, values: &[u64]) -> Result<Self> {
        let fields = opcode.fields();
        if values.len() != fields.len() {
            return Err(UvmError::OperandCount {
                opcode,
                expected: fields.len(),
                found: values.len(),
            });
        }
        for (field, &value) in fields.iter().zip(values) {
            field.check(value)?;
        }

        // widths were checked above, the casts are lossless
        let instr = match opcode {
            Opcode::LoadConst => Instruction::LoadConst {
                dst: values[0] as u8,
                imm: values[1] as u32,
            },
            Opcode::ReadMem => Instruction::ReadMem {
                dst: values[0] as u8,
                addr: values[1] as u16,
            },
            Opcode::WriteMem => Instruction::WriteMem {
                addr: values[0] as u16,
                src: values[1] as u8,
            },
            Opcode::Mod => Instruction::Mod {
                dst_addr: values[0] as u16,
                a_reg: values[1] as u8,
                b_reg: values[2] as u8,
            },
        };
        Ok(instr)
    }

    /// Registers this instruction reads
    pub fn source_registers(&self) -> Vec<u8> {
        match *self {
            Instruction::LoadConst { .. } | Instruction::ReadMem { .. } => vec![],
            Instruction::WriteMem { src, .. } => vec![src],
            Instruction::Mod { a_reg, b_reg, .. } => vec![a_reg, b_reg],
        }
    }

    /// Register this instruction writes, if any
    pub const fn destination_register(&self) -> Option<u8> {
        match *self {
            Instruction::LoadConst { dst, .. } | Instruction::ReadMem { dst, .. } => Some(dst),
            Instruction::WriteMem { .. } | Instruction::Mod { .. } => None,
        }
    }

    /// Memory addresses this instruction touches
    pub const fn memory_address(&self) -> Option<u16> {
        match *self {
            Instruction::LoadConst { .. } => None,
            Instruction::ReadMem { addr, .. } | Instruction::WriteMem { addr, .. } => Some(addr),
            Instruction::Mod { dst_addr, .. } => Some(dst_addr),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        for (i, (name, value)) in self.operands().into_iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}
