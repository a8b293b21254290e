//! # UVM Runtime
//!
//! Execute UVM record streams and dump the resulting machine state.
//!
//! The interpreter walks the stream six bytes at a time. A run ends when the
//! stream is exhausted (`Halted`) or on the first fatal error (`Faulted`),
//! in which case the trace and state up to the fault are handed back with
//! the error.
//!
//! ## Example
//!
//! ```rust
//! use uvm_runtime::{DumpRange, DumpTarget, VMConfig, VM};
//! use uvm_spec::{Instruction, Program};
//!
//! let program = Program::from(vec![
//!     Instruction::LoadConst { dst: 0, imm: 45 },
//!     Instruction::LoadConst { dst: 1, imm: 6 },
//!     Instruction::Mod { dst_addr: 12, a_reg: 0, b_reg: 1 },
//! ]);
//!
//! let vm = VM::from_program(&program, VMConfig::default()).unwrap();
//! let result = vm.run().unwrap();
//! let dump = result.state.dump(DumpTarget::Memory, DumpRange::new(12, 12)).unwrap();
//! assert_eq!(dump[0].value, 3);
//! ```

pub mod dump;
pub mod error;
pub mod execute;
pub mod state;
pub mod trace;
pub mod vm;

pub use dump::{dump, DumpRange, DumpRecord, DumpTarget, ParseRangeError};
pub use error::{Result, RuntimeError};
pub use execute::execute;
pub use state::VMState;
pub use vm::{ExecutionFault, ExecutionResult, Status, VMConfig, VM};
