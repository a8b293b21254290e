//! # UVM Specification
//!
//! Four-instruction register/memory machine with a fixed 6-byte record encoding.
//!
//! ## Key Features
//! - 6-byte (48-bit) instructions: tag byte + 40-bit big-endian payload
//! - 64 integer registers
//! - Flat word-addressed memory (default 1024 cells, 16-bit addresses)
//! - No control flow: program order is execution order
//!
//! ## Example
//!
//! ```rust
//! use uvm_spec::{decode, encode, Instruction};
//!
//! let instr = Instruction::LoadConst { dst: 5, imm: 803 };
//! let record = encode(&instr).unwrap();
//! assert_eq!(record, [0x06, 0x05, 0x00, 0x00, 0x03, 0x23]);
//! assert_eq!(decode(&record).unwrap(), instr);
//! ```

pub mod codec;
pub mod encoding;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod trace;

pub use codec::{decode, decode_strict, encode, encode_operands};
pub use encoding::{BinaryRecord, Column, OperandField, RECORD_SIZE};
pub use error::{Result, UvmError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use trace::{Effect, TraceEntry};

/// Register and memory cell value
pub type Word = u32;

/// Number of registers in the register file
pub const NUM_REGISTERS: usize = 64;

/// Memory size used when the caller does not choose one
pub const DEFAULT_MEMORY_SIZE: usize = 1024;

/// Largest useful memory size: addresses are 16-bit fields
pub const MAX_MEMORY_SIZE: usize = 1 << 16;
