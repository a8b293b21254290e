//! Instruction formatting as program table rows

use uvm_spec::encoding::Column;
use uvm_spec::Instruction;

/// Format an instruction as a `Command,A,B,C,D,E` row
///
/// The row reads back through the assembler to the same instruction.
pub fn format(instr: &Instruction) -> String {
    let opcode = instr.opcode();
    let values = instr.operand_values();

    let mut row = String::from(instr.mnemonic());
    for column in Column::ALL {
        row.push(',');
        let value = opcode
            .fields()
            .iter()
            .zip(&values)
            .find(|(field, _)| field.column == column)
            .map(|(_, value)| *value);
        if let Some(value) = value {
            row.push_str(&value.to_string());
        }
    }
    row
}
