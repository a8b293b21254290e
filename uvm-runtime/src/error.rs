//! Runtime error types

use thiserror::Error;
use uvm_spec::{Opcode, UvmError};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Spec error: {0}")]
    Spec(#[from] UvmError),

    #[error("Truncated instruction at offset {offset}: {remaining} byte(s) remaining")]
    TruncatedInstruction { offset: usize, remaining: usize },

    #[error("Decode error at offset {offset}: unknown opcode {tag:#04x}")]
    Decode { offset: usize, tag: u8 },

    #[error("Range error at offset {offset} ({opcode}): {space} index {index} out of range (size {len})")]
    OutOfRange {
        offset: usize,
        opcode: Opcode,
        space: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Range error: {target} dump range {start}..={end} outside 0..{len}")]
    InvalidRange {
        target: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Step limit exceeded: {limit}")]
    StepLimitExceeded { limit: u64 },
}

impl RuntimeError {
    /// Offset of the faulting record, for errors raised while executing
    pub fn offset(&self) -> Option<usize> {
        match self {
            RuntimeError::TruncatedInstruction { offset, .. }
            | RuntimeError::Decode { offset, .. }
            | RuntimeError::OutOfRange { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Check if this error ends execution
    ///
    /// Division by zero is not an error at all (it is a trace notice), so
    /// every variant is fatal except a bad dump request, which leaves the
    /// finished machine state intact.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RuntimeError::InvalidRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
