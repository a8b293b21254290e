//! Instruction execution

use crate::error::{Result, RuntimeError};
use crate::state::VMState;
use tracing::warn;
use uvm_spec::{Effect, Instruction, TraceEntry};

/// Bounds-check every register and memory cell an instruction touches
///
/// Runs before any mutation so a rejected instruction leaves the state as
/// it was.
pub fn check_bounds(instr: &Instruction, state: &VMState, offset: usize) -> Result<()> {
    let opcode = instr.opcode();

    let registers = instr
        .source_registers()
        .into_iter()
        .chain(instr.destination_register());
    for reg in registers {
        if !state.has_register(reg) {
            return Err(RuntimeError::OutOfRange {
                offset,
                opcode,
                space: "register",
                index: reg as usize,
                len: state.registers.len(),
            });
        }
    }

    if let Some(addr) = instr.memory_address() {
        if !state.has_address(addr) {
            return Err(RuntimeError::OutOfRange {
                offset,
                opcode,
                space: "memory",
                index: addr as usize,
                len: state.memory_size(),
            });
        }
    }

    Ok(())
}

/// Execute a single instruction
///
/// Returns the trace entries it produced: one for the state change, plus a
/// notice when MOD divides by zero.
pub fn execute(
    instr: &Instruction,
    state: &mut VMState,
    offset: usize,
    step: u64,
) -> Result<Vec<TraceEntry>> {
    check_bounds(instr, state, offset)?;

    // Indices are in range past this point, so the accessors cannot miss.
    let entry = |effect| TraceEntry::new(step, offset, *instr, effect);

    let entries = match *instr {
        Instruction::LoadConst { dst, imm } => {
            let before = state.write_reg(dst, imm).unwrap_or_default();
            vec![entry(Effect::RegisterWrite { register: dst, before, after: imm })]
        }

        Instruction::ReadMem { dst, addr } => {
            let value = state.read_mem(addr).unwrap_or_default();
            let before = state.write_reg(dst, value).unwrap_or_default();
            vec![entry(Effect::RegisterWrite { register: dst, before, after: value })]
        }

        Instruction::WriteMem { addr, src } => {
            let value = state.read_reg(src).unwrap_or_default();
            let before = state.write_mem(addr, value).unwrap_or_default();
            vec![entry(Effect::MemoryWrite { address: addr, before, after: value })]
        }

        Instruction::Mod { dst_addr, a_reg, b_reg } => {
            let a = state.read_reg(a_reg).unwrap_or_default();
            let b = state.read_reg(b_reg).unwrap_or_default();

            match a.checked_rem(b) {
                Some(result) => {
                    let before = state.write_mem(dst_addr, result).unwrap_or_default();
                    vec![entry(Effect::MemoryWrite { address: dst_addr, before, after: result })]
                }
                None => {
                    warn!(
                        offset,
                        step,
                        dividend = a,
                        address = dst_addr,
                        "division by zero, writing 0"
                    );
                    let before = state.write_mem(dst_addr, 0).unwrap_or_default();
                    vec![
                        entry(Effect::MemoryWrite { address: dst_addr, before, after: 0 }),
                        entry(Effect::DivisionByZero { address: dst_addr, dividend: a }),
                    ]
                }
            }
        }
    };

    Ok(entries)
}
