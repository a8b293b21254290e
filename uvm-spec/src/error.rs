//! # Error Types for the UVM codec

use crate::opcode::Opcode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UvmError {
    // Encoding errors
    #[error("Operand {field} = {value} does not fit in {bits} bits")]
    Encoding {
        field: &'static str,
        value: u64,
        bits: u32,
    },

    #[error("{opcode} expects {expected} operands, found {found}")]
    OperandCount {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    // Decoding errors
    #[error("Invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    #[error("Non-zero padding in {opcode} record: {padding:#x}")]
    NonZeroPadding { opcode: Opcode, padding: u64 },

    #[error("Invalid program size: {0} bytes is not a multiple of 6")]
    InvalidProgramSize(usize),
}

pub type Result<T> = std::result::Result<T, UvmError>;
