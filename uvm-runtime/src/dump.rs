//! State dumper
//!
//! Extracts an inclusive address range from memory (or the register file)
//! as `(address, value)` records, ascending.

use crate::error::{Result, RuntimeError};
use crate::state::VMState;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use uvm_spec::Word;

/// Store a dump reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpTarget {
    #[default]
    Memory,
    Registers,
}

impl DumpTarget {
    pub const fn name(self) -> &'static str {
        match self {
            DumpTarget::Memory => "memory",
            DumpTarget::Registers => "registers",
        }
    }
}

impl fmt::Display for DumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive address range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpRange {
    pub start: usize,
    pub end: usize,
}

impl DumpRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of addresses covered (0 if reversed)
    pub fn len(&self) -> usize {
        self.end.saturating_add(1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for DumpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Error parsing a range string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range '{0}': expected START-END, START..END or START..=END")]
pub struct ParseRangeError(String);

impl FromStr for DumpRange {
    type Err = ParseRangeError;

    /// Accepts `12-17`, `12..=17` (both inclusive) and `12..18` (exclusive end)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseRangeError(s.to_string());
        let text = s.trim();

        let (start, end, inclusive) = if let Some((a, b)) = text.split_once("..=") {
            (a, b, true)
        } else if let Some((a, b)) = text.split_once("..") {
            (a, b, false)
        } else if let Some((a, b)) = text.split_once('-') {
            (a, b, true)
        } else {
            return Err(err());
        };

        let start: usize = start.trim().parse().map_err(|_| err())?;
        let end: usize = end.trim().parse().map_err(|_| err())?;

        let end = if inclusive {
            end
        } else {
            end.checked_sub(1).ok_or_else(err)?
        };
        Ok(DumpRange { start, end })
    }
}

/// One dumped cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DumpRecord {
    pub address: usize,
    pub value: Word,
}

/// Dump an inclusive range of a store
///
/// Requires `start <= end < store.len()`.
pub fn dump(store: &[Word], range: DumpRange) -> Result<Vec<DumpRecord>> {
    dump_named(store, range, DumpTarget::Memory)
}

fn dump_named(store: &[Word], range: DumpRange, target: DumpTarget) -> Result<Vec<DumpRecord>> {
    if range.start > range.end || range.end >= store.len() {
        return Err(RuntimeError::InvalidRange {
            target: target.name(),
            start: range.start,
            end: range.end,
            len: store.len(),
        });
    }

    Ok(store[range.start..=range.end]
        .iter()
        .enumerate()
        .map(|(i, &value)| DumpRecord {
            address: range.start + i,
            value,
        })
        .collect())
}

impl VMState {
    /// Dump a range of memory or registers
    pub fn dump(&self, target: DumpTarget, range: DumpRange) -> Result<Vec<DumpRecord>> {
        let store = match target {
            DumpTarget::Memory => &self.memory,
            DumpTarget::Registers => &self.registers,
        };
        dump_named(store, range, target)
    }
}

/// CSV header of a state dump
pub const CSV_HEADER: &str = "Address,Value";

/// Write dump records as CSV
pub fn write_csv<W: Write>(records: &[DumpRecord], mut out: W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(out, "{},{}", record.address, record.value)?;
    }
    Ok(())
}
