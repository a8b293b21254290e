//! # Program Structure
//!
//! A program is an ordered list of instructions. Its binary form is the plain
//! concatenation of 6-byte records: no header, no padding, no terminator.

use crate::codec::{decode, encode, record_count};
use crate::encoding::{BinaryRecord, RECORD_SIZE};
use crate::error::{Result, UvmError};
use crate::instruction::Instruction;
use std::fmt;

/// Complete program structure
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction
    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Size of the binary stream in bytes
    pub fn byte_len(&self) -> usize {
        self.instructions.len() * RECORD_SIZE
    }

    /// Encode every instruction into its record
    pub fn records(&self) -> Result<Vec<BinaryRecord>> {
        self.instructions.iter().map(encode).collect()
    }

    /// Serialize to the binary stream
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for instr in &self.instructions {
            bytes.extend_from_slice(&encode(instr)?);
        }
        Ok(bytes)
    }

    /// Deserialize a complete binary stream
    ///
    /// Unlike the interpreter, this rejects the whole stream up front if it
    /// has a trailing partial record or any unknown tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (_, remainder) = record_count(bytes.len());
        if remainder != 0 {
            return Err(UvmError::InvalidProgramSize(bytes.len()));
        }

        let instructions = bytes
            .chunks_exact(RECORD_SIZE)
            .map(|chunk| {
                let mut record = [0u8; RECORD_SIZE];
                record.copy_from_slice(chunk);
                decode(&record)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { instructions })
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instr) in self.instructions.iter().enumerate() {
            writeln!(f, "{:4}: {}", i, instr)?;
        }
        Ok(())
    }
}
