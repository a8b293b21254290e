//! Disassembler errors

use thiserror::Error;
use uvm_spec::UvmError;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("Invalid record at offset {offset}: {source}")]
    InvalidRecord {
        offset: usize,
        #[source]
        source: UvmError,
    },

    #[error("Truncated record at offset {offset}: {remaining} byte(s)")]
    Truncated { offset: usize, remaining: usize },
}

impl DisassemblerError {
    pub fn offset(&self) -> usize {
        match self {
            DisassemblerError::InvalidRecord { offset, .. }
            | DisassemblerError::Truncated { offset, .. } => *offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
