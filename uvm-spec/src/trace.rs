//! # Execution Trace Types
//!
//! One entry per executed instruction, plus a notice entry for each MOD
//! that hit a zero divisor.

use crate::instruction::Instruction;
use crate::Word;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an executed instruction did to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// A register was overwritten
    RegisterWrite { register: u8, before: Word, after: Word },

    /// A memory cell was overwritten
    MemoryWrite { address: u16, before: Word, after: Word },

    /// MOD with a zero divisor (non-fatal, result forced to 0)
    DivisionByZero { address: u16, dividend: Word },
}

impl Effect {
    /// Check if this is a notice rather than a state change
    #[inline]
    pub fn is_notice(&self) -> bool {
        matches!(self, Effect::DivisionByZero { .. })
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::RegisterWrite { register, before, after } => {
                write!(f, "r{}: {} -> {}", register, before, after)
            }
            Effect::MemoryWrite { address, before, after } => {
                write!(f, "mem[{}]: {} -> {}", address, before, after)
            }
            Effect::DivisionByZero { address, dividend } => write!(
                f,
                "notice: division by zero ({} mod 0), mem[{}] = 0",
                dividend, address
            ),
        }
    }
}

/// A single execution trace row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Zero-based index of the executed instruction
    pub step: u64,

    /// Byte offset of the instruction's record in the stream
    pub offset: usize,

    /// Decoded instruction
    pub instruction: Instruction,

    /// Resulting effect
    pub effect: Effect,
}

impl TraceEntry {
    pub fn new(step: u64, offset: usize, instruction: Instruction, effect: Effect) -> Self {
        Self {
            step,
            offset,
            instruction,
            effect,
        }
    }

    #[inline]
    pub fn is_notice(&self) -> bool {
        self.effect.is_notice()
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:4}] {:#06x}  {:<32} {}",
            self.step,
            self.offset,
            self.instruction.to_string(),
            self.effect
        )
    }
}
