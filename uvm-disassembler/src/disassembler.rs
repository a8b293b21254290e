//! Main disassembler logic

use crate::error::{DisassemblerError, Result};
use crate::formatter::format;
use uvm_spec::encoding::record_hex;
use uvm_spec::{decode, decode_strict, BinaryRecord, Instruction, Program, UvmError, RECORD_SIZE};

/// What a slice of the stream decoded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Instruction(Instruction),
    Invalid(UvmError),
    /// Fewer than six bytes left at the end of the stream
    Truncated,
}

/// One record (or trailing fragment) of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub offset: usize,
    pub bytes: Vec<u8>,
    pub kind: LineKind,
}

impl Line {
    pub fn is_error(&self) -> bool {
        !matches!(self.kind, LineKind::Instruction(_))
    }
}

/// Decode a stream record by record without stopping at bad records
///
/// With `strict`, records with non-zero padding are reported as invalid.
pub fn decode_lines(bytes: &[u8], strict: bool) -> Vec<Line> {
    let decoder: fn(&BinaryRecord) -> uvm_spec::Result<Instruction> =
        if strict { decode_strict } else { decode };

    let mut lines = Vec::with_capacity(bytes.len() / RECORD_SIZE + 1);
    let mut chunks = bytes.chunks_exact(RECORD_SIZE);

    for (i, chunk) in chunks.by_ref().enumerate() {
        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(chunk);
        let kind = match decoder(&record) {
            Ok(instr) => LineKind::Instruction(instr),
            Err(e) => LineKind::Invalid(e),
        };
        lines.push(Line {
            offset: i * RECORD_SIZE,
            bytes: chunk.to_vec(),
            kind,
        });
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        lines.push(Line {
            offset: bytes.len() - tail.len(),
            bytes: tail.to_vec(),
            kind: LineKind::Truncated,
        });
    }

    lines
}

/// Disassemble a record stream into a program table
///
/// Valid records become rows the assembler accepts; each row carries its
/// offset and bytes as a trailing comment. Bad records and a truncated tail
/// become comment lines.
pub fn disassemble(bytes: &[u8]) -> String {
    render(&decode_lines(bytes, false), bytes.len())
}

/// Like [`disassemble`], but reports non-zero padding as invalid
pub fn disassemble_strict(bytes: &[u8]) -> String {
    render(&decode_lines(bytes, true), bytes.len())
}

fn render(lines: &[Line], byte_len: usize) -> String {
    let errors = lines.iter().filter(|line| line.is_error()).count();

    let mut output = String::new();
    output.push_str("# UVM disassembly\n");
    output.push_str(&format!(
        "# {} bytes, {} records, {} errors\n",
        byte_len,
        byte_len / RECORD_SIZE,
        errors
    ));
    output.push_str("Command,A,B,C,D,E\n");

    for line in lines {
        let location = format!("{:#06x}: {}", line.offset, record_hex(&line.bytes));
        match &line.kind {
            LineKind::Instruction(instr) => {
                output.push_str(&format!("{:<28} # {}\n", format(instr), location));
            }
            LineKind::Invalid(e) => {
                output.push_str(&format!("# {}  ERROR: {}\n", location, e));
            }
            LineKind::Truncated => {
                output.push_str(&format!(
                    "# {}  TRUNCATED: {} byte(s) after the last full record\n",
                    location,
                    line.bytes.len()
                ));
            }
        }
    }

    output
}

/// Decode a whole stream, failing on the first bad record
pub fn decode_program(bytes: &[u8], strict: bool) -> Result<Program> {
    let mut program = Program::new();
    for line in decode_lines(bytes, strict) {
        match line.kind {
            LineKind::Instruction(instr) => program.push(instr),
            LineKind::Invalid(source) => {
                return Err(DisassemblerError::InvalidRecord {
                    offset: line.offset,
                    source,
                });
            }
            LineKind::Truncated => {
                return Err(DisassemblerError::Truncated {
                    offset: line.offset,
                    remaining: line.bytes.len(),
                });
            }
        }
    }
    Ok(program)
}
