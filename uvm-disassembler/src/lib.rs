//! # UVM Disassembler
//!
//! Turn a record stream back into a program table.
//!
//! The listing is itself a valid program: comment lines carry offsets, raw
//! bytes, and any decode errors, so a clean stream disassembles to text the
//! assembler turns back into the same bytes.
//!
//! ## Example
//!
//! ```rust
//! use uvm_disassembler::disassemble;
//!
//! let listing = disassemble(&[0x06, 0x05, 0x00, 0x00, 0x03, 0x23]);
//! assert!(listing.contains("LOAD_CONST,5,803"));
//! ```

pub mod disassembler;
pub mod error;
pub mod formatter;

pub use disassembler::{
    decode_lines, decode_program, disassemble, disassemble_strict, Line, LineKind,
};
pub use error::{DisassemblerError, Result};
pub use formatter::format;
