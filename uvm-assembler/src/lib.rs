//! UVM Assembler
//!
//! Assemble UVM program tables into a stream of 6-byte records.
//!
//! ## Example
//!
//! ```rust
//! use uvm_assembler::assemble;
//!
//! let source = "
//!     Command, A, B, C, D, E
//!     LOAD_CONST, 5, 803
//!     WRITE_MEM, 100, 5
//! ";
//!
//! let assembly = assemble(source).unwrap();
//! assert_eq!(assembly.bytes.len(), 12);
//! ```

pub mod assembler;
pub mod error;
pub mod lexer;
pub mod log;
pub mod parser;

pub use assembler::{assemble, assemble_file, Assembly};
pub use error::{AssemblerError, Result};
pub use lexer::Token;
pub use log::{write_csv, LogEntry};
pub use parser::{parse_instruction, parse_rows, Row};
