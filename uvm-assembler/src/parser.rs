//! Program table parser
//!
//! A program is a comma-separated table:
//!
//! ```text
//! Command,    A,   B,   C, D, E
//! LOAD_CONST, 5,   803
//! WRITE_MEM,  100, 5
//! MOD,        12,  0,   6
//! ```
//!
//! Column `Command` holds the mnemonic, columns A-E the operands in the
//! order given by the opcode's field table. Blank rows and `#` comments are
//! ignored.

use crate::error::{AssemblerError, Result};
use crate::lexer::{parse_number, Token};
use logos::Logos;
use std::ops::Range;
use uvm_spec::encoding::Column;
use uvm_spec::{Instruction, Opcode};

/// Maximum cells per row: the command plus columns A-E
pub const MAX_CELLS: usize = 1 + Column::ALL.len();

/// One comma-separated cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Nothing between the separators
    Empty,
    /// A single identifier
    Word(String),
    /// A single unsigned number
    Number(u64),
    /// A numeric literal wider than 64 bits
    TooLarge(String),
    /// Anything else (several tokens, negative number, ...)
    Invalid(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Source text of the cell, for error messages
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::Word(text) | Cell::TooLarge(text) | Cell::Invalid(text) => text.clone(),
        }
    }
}

/// One non-blank source row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based source line
    pub line: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell for a column, `Empty` if the row is shorter
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&Cell::Empty)
    }

    /// Check if this row is the `Command, A, B, ...` header
    pub fn is_header(&self) -> bool {
        matches!(self.cell(0), Cell::Word(name) if name.eq_ignore_ascii_case("command"))
    }
}

/// Split a program table into rows
///
/// Lexing errors do not stop the scan: every bad line is reported, and the
/// caller decides what to do with the rows that did lex.
pub fn parse_rows(source: &str) -> (Vec<Row>, Vec<AssemblerError>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    let mut line = 1;
    let mut line_tokens: Vec<(Token, Range<usize>)> = Vec::new();
    let mut line_failed = false;

    let mut lexer = Token::lexer(source).spanned();
    loop {
        let next = lexer.next();
        let end_of_input = next.is_none();
        let end_of_line = matches!(next, None | Some((Ok(Token::Newline), _)));

        match next {
            Some((Ok(Token::Newline), _)) | None => {}
            Some((Ok(token), span)) => line_tokens.push((token, span)),
            Some((Err(_), span)) => {
                if !line_failed {
                    errors.push(AssemblerError::syntax(
                        line,
                        format!("unexpected character '{}'", &source[span]),
                    ));
                }
                line_failed = true;
            }
        }

        if end_of_line {
            if !line_failed {
                if let Some(row) = build_row(source, line, &line_tokens) {
                    rows.push(row);
                }
            }
            line_tokens.clear();
            line_failed = false;
            line += 1;
        }

        if end_of_input {
            break;
        }
    }

    (rows, errors)
}

/// Group a line's tokens into cells; `None` for a blank line
fn build_row(source: &str, line: usize, tokens: &[(Token, Range<usize>)]) -> Option<Row> {
    if tokens.is_empty() {
        return None;
    }

    let cells: Vec<Cell> = tokens
        .split(|(token, _)| *token == Token::Comma)
        .map(|group| build_cell(source, group))
        .collect();

    if cells.iter().all(Cell::is_empty) {
        return None;
    }
    Some(Row { line, cells })
}

fn build_cell(source: &str, group: &[(Token, Range<usize>)]) -> Cell {
    match group {
        [] => Cell::Empty,
        [(Token::Identifier, span)] => Cell::Word(source[span.clone()].to_string()),
        [(token, span)] if token.is_number() => {
            let text = &source[span.clone()];
            match parse_number(*token, text) {
                Some(value) => Cell::Number(value),
                None => Cell::TooLarge(text.to_string()),
            }
        }
        [(_, first), .., (_, last)] => Cell::Invalid(source[first.start..last.end].to_string()),
        [(_, span)] => Cell::Invalid(source[span.clone()].to_string()),
    }
}

/// Parse and validate one row into an instruction
pub fn parse_instruction(row: &Row) -> Result<Instruction> {
    if row.cells.len() > MAX_CELLS {
        return Err(AssemblerError::syntax(
            row.line,
            format!("expected at most {} columns, found {}", MAX_CELLS, row.cells.len()),
        ));
    }

    let opcode = parse_opcode(row)?;

    let mut values = Vec::with_capacity(opcode.operand_count());
    for field in opcode.fields() {
        let cell = row.cell(1 + field.column.index());
        let value = match cell {
            Cell::Number(value) => {
                field.check(*value).map_err(|_| {
                    AssemblerError::range(
                        row.line,
                        field.name,
                        value.to_string(),
                        format!("exceeds {} bits", field.bits),
                    )
                })?;
                *value
            }
            Cell::Empty => {
                return Err(AssemblerError::range(row.line, field.name, "<missing>", "missing"));
            }
            Cell::TooLarge(text) => {
                return Err(AssemblerError::range(
                    row.line,
                    field.name,
                    text.clone(),
                    format!("exceeds {} bits", field.bits),
                ));
            }
            Cell::Word(text) | Cell::Invalid(text) => {
                return Err(AssemblerError::range(
                    row.line,
                    field.name,
                    text.clone(),
                    "not an unsigned integer",
                ));
            }
        };
        values.push(value);
    }

    // columns the opcode does not read must stay blank
    for column in Column::ALL {
        let used = opcode.fields().iter().any(|f| f.column == column);
        let cell = row.cell(1 + column.index());
        if !used && !cell.is_empty() {
            return Err(AssemblerError::syntax(
                row.line,
                format!(
                    "column {} is not used by {} (found '{}')",
                    column,
                    opcode,
                    cell.text()
                ),
            ));
        }
    }

    Instruction::from_operands(opcode, &values)
        .map_err(|e| AssemblerError::syntax(row.line, e.to_string()))
}

fn parse_opcode(row: &Row) -> Result<Opcode> {
    match row.cell(0) {
        Cell::Word(name) => Opcode::from_mnemonic(name).ok_or_else(|| {
            AssemblerError::syntax(row.line, format!("unknown mnemonic '{}'", name))
        }),
        Cell::Empty => Err(AssemblerError::syntax(row.line, "missing command")),
        other => Err(AssemblerError::syntax(
            row.line,
            format!("expected a mnemonic, found '{}'", other.text()),
        )),
    }
}
