//! Assembly log
//!
//! One entry per emitted record: the source row, the operands as they landed
//! in their columns, and the bytes produced.

use serde::Serialize;
use std::io::{self, Write};
use uvm_spec::encoding::{record_hex, Column};
use uvm_spec::{BinaryRecord, Instruction};

/// An operand placed in its table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoggedOperand {
    pub field: &'static str,
    pub column: Column,
    pub value: u64,
}

/// One assembled instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// 1-based source row
    pub row: usize,

    /// Position of the record in the output stream
    pub index: usize,

    pub mnemonic: &'static str,
    pub operands: Vec<LoggedOperand>,

    /// Record bytes as spaced hex ("06 05 00 00 03 23")
    pub hex: String,

    #[serde(skip)]
    pub record: BinaryRecord,
}

impl LogEntry {
    pub fn new(row: usize, index: usize, instruction: &Instruction, record: BinaryRecord) -> Self {
        let operands = instruction
            .opcode()
            .fields()
            .iter()
            .zip(instruction.operand_values())
            .map(|(field, value)| LoggedOperand {
                field: field.name,
                column: field.column,
                value,
            })
            .collect();

        Self {
            row,
            index,
            mnemonic: instruction.mnemonic(),
            operands,
            hex: record_hex(&record),
            record,
        }
    }

    /// Operand value in a column, if the instruction uses it
    pub fn column_value(&self, column: Column) -> Option<u64> {
        self.operands
            .iter()
            .find(|op| op.column == column)
            .map(|op| op.value)
    }
}

/// CSV header of the assembly log
pub const CSV_HEADER: &str = "row,Command,A,B,C,D,E,bytes";

/// Write the log as CSV, one line per record
pub fn write_csv<W: Write>(entries: &[LogEntry], mut out: W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for entry in entries {
        write!(out, "{},{}", entry.row, entry.mnemonic)?;
        for column in Column::ALL {
            match entry.column_value(column) {
                Some(value) => write!(out, ",{}", value)?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out, ",{}", entry.hex)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvm_spec::encode;

    fn entry(row: usize, index: usize, instr: Instruction) -> LogEntry {
        LogEntry::new(row, index, &instr, encode(&instr).unwrap())
    }

    #[test]
    fn test_entry_columns() {
        let e = entry(2, 0, Instruction::WriteMem { addr: 100, src: 5 });
        assert_eq!(e.mnemonic, "WRITE_MEM");
        assert_eq!(e.column_value(Column::A), Some(100));
        assert_eq!(e.column_value(Column::B), Some(5));
        assert_eq!(e.column_value(Column::C), None);
        assert_eq!(e.hex, "0C 00 64 05 00 00");
    }

    #[test]
    fn test_write_csv() {
        let entries = vec![
            entry(1, 0, Instruction::LoadConst { dst: 5, imm: 803 }),
            entry(3, 1, Instruction::Mod { dst_addr: 12, a_reg: 0, b_reg: 6 }),
        ];

        let mut buf = Vec::new();
        write_csv(&entries, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,LOAD_CONST,5,803,,,,06 05 00 00 03 23");
        assert_eq!(lines[2], "3,MOD,12,0,6,,,0E 00 0C 00 06 00");
    }
}
