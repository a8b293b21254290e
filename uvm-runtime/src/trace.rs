//! Execution trace output

use std::borrow::Cow;
use std::io::{self, Write};
use uvm_spec::TraceEntry;

/// CSV header of an execution trace
pub const CSV_HEADER: &str = "step,offset,opcode,operands,effect";

/// Quote a CSV field if it contains a separator, quote, or line break
pub fn csv_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

/// Operands as `name=value` pairs separated by spaces
pub fn format_operands(entry: &TraceEntry) -> String {
    entry
        .instruction
        .operands()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write trace entries as CSV, one line per entry
pub fn write_csv<W: Write>(entries: &[TraceEntry], mut out: W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for entry in entries {
        writeln!(
            out,
            "{},{},{},{},{}",
            entry.step,
            entry.offset,
            entry.instruction.mnemonic(),
            format_operands(entry),
            csv_field(&entry.effect.to_string())
        )?;
    }
    Ok(())
}
