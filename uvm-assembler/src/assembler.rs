//! Main assembler logic

use crate::error::{AssemblerError, Result};
use crate::log::LogEntry;
use crate::parser::{parse_instruction, parse_rows};
use std::path::Path;
use tracing::{debug, info};
use uvm_spec::{encode, Program};

/// Output of a successful assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub program: Program,

    /// Concatenated records, in source order
    pub bytes: Vec<u8>,

    /// One entry per record
    pub log: Vec<LogEntry>,
}

impl Assembly {
    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }
}

/// Assemble a program table into a record stream
///
/// Every row is checked before anything is returned: if any row is bad the
/// result is an error listing all bad rows, and no bytes are produced.
pub fn assemble(source: &str) -> Result<Assembly> {
    // leading byte order mark from spreadsheet exports
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let (rows, mut errors) = parse_rows(source);

    let mut rows = rows.as_slice();
    if rows.first().is_some_and(|row| row.is_header()) {
        debug!(line = rows[0].line, "skipping header row");
        rows = &rows[1..];
    }

    let mut program = Program::new();
    let mut bytes = Vec::with_capacity(rows.len() * uvm_spec::RECORD_SIZE);
    let mut log = Vec::with_capacity(rows.len());

    for row in rows {
        let instr = match parse_instruction(row) {
            Ok(instr) => instr,
            Err(e) => {
                debug!(line = row.line, error = %e, "rejected row");
                errors.push(e);
                continue;
            }
        };

        let record = match encode(&instr) {
            Ok(record) => record,
            Err(e) => {
                errors.push(AssemblerError::syntax(row.line, e.to_string()));
                continue;
            }
        };

        debug!(line = row.line, instruction = %instr, "assembled");
        log.push(LogEntry::new(row.line, program.len(), &instr, record));
        bytes.extend_from_slice(&record);
        program.push(instr);
    }

    if !errors.is_empty() {
        errors.sort_by_key(|e| e.row());
        return Err(AssemblerError::from_errors(errors));
    }

    info!(instructions = program.len(), bytes = bytes.len(), "assembly complete");
    Ok(Assembly { program, bytes, log })
}

/// Read and assemble a program file
pub fn assemble_file(path: impl AsRef<Path>) -> Result<Assembly> {
    let source = std::fs::read_to_string(path)?;
    assemble(&source)
}
