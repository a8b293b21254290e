//! Cross-module tests: assembler, codec, disassembler, and runtime agree

use proptest::prelude::*;
use uvm_assembler::assemble;
use uvm_disassembler::{decode_program, disassemble, format};
use uvm_runtime::{VMConfig, VM};
use uvm_spec::{Instruction, Program};

fn any_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        (any::<u8>(), any::<u32>()).prop_map(|(dst, imm)| Instruction::LoadConst { dst, imm }),
        (any::<u8>(), any::<u16>()).prop_map(|(dst, addr)| Instruction::ReadMem { dst, addr }),
        (any::<u16>(), any::<u8>()).prop_map(|(addr, src)| Instruction::WriteMem { addr, src }),
        (any::<u16>(), any::<u8>(), any::<u8>())
            .prop_map(|(dst_addr, a_reg, b_reg)| Instruction::Mod { dst_addr, a_reg, b_reg }),
    ]
}

proptest! {
    #[test]
    fn prop_formatted_row_assembles_to_same_instruction(instr in any_instruction()) {
        let assembly = assemble(&format(&instr)).unwrap();
        prop_assert_eq!(assembly.program.instructions, vec![instr]);
    }

    #[test]
    fn prop_disassembly_reassembles(instrs in proptest::collection::vec(any_instruction(), 0..24)) {
        let bytes = Program::from(instrs).to_bytes().unwrap();
        let again = assemble(&disassemble(&bytes)).unwrap();
        prop_assert_eq!(again.bytes, bytes);
    }
}

#[test]
fn test_assembled_program_decodes_back() {
    let source = include_str!("../programs/vector_modulo.csv");
    let assembly = assemble(source).unwrap();
    let decoded = decode_program(&assembly.bytes, true).unwrap();
    assert_eq!(decoded, assembly.program);
}

#[test]
fn test_log_matches_trace_offsets() {
    let source = include_str!("../programs/vector_modulo.csv");
    let assembly = assemble(source).unwrap();
    let log_offsets: Vec<usize> = assembly.log.iter().map(|e| e.index * 6).collect();

    let result = VM::new(assembly.bytes, VMConfig::default()).unwrap().run().unwrap();
    let trace_offsets: Vec<usize> = result.trace.iter().map(|e| e.offset).collect();
    assert_eq!(trace_offsets, log_offsets);
}

#[test]
fn test_disassembly_of_damaged_stream() {
    let mut bytes = assemble("LOAD_CONST,1,2\nMOD,3,1,1\n").unwrap().bytes;
    bytes[6] = 0x99;
    bytes.extend_from_slice(&[0x0C, 0x00]);

    let listing = disassemble(&bytes);
    let body: Vec<&str> = listing.lines().skip(3).collect();
    assert_eq!(body.len(), 3);
    assert!(body[0].starts_with("LOAD_CONST,1,2"));
    assert!(body[1].contains("ERROR"));
    assert!(body[2].contains("TRUNCATED"));
}
