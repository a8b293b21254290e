//! Subcommand implementations

use crate::output::{render, write_all_atomic, write_atomic, Format};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uvm_assembler::assemble;
use uvm_disassembler::{disassemble, disassemble_strict};
use uvm_runtime::{DumpRange, DumpTarget, VMConfig, VM};
use uvm_spec::TraceEntry;

pub struct AssembleArgs {
    pub program: PathBuf,
    pub binary_out: PathBuf,
    pub log_out: PathBuf,
    pub format: Format,
}

/// Assemble a program table; writes both outputs or neither
pub fn assemble_cmd(args: &AssembleArgs) -> Result<()> {
    let source = fs::read_to_string(&args.program)
        .with_context(|| format!("failed to read program {}", args.program.display()))?;

    let assembly = assemble(&source)
        .with_context(|| format!("failed to assemble {}", args.program.display()))?;

    let log = render(args.format, &assembly.log, |entries, buf| {
        uvm_assembler::write_csv(entries, buf)
    })?;

    write_all_atomic(&[
        (args.binary_out.as_path(), assembly.bytes.as_slice()),
        (args.log_out.as_path(), log.as_slice()),
    ])?;

    info!(
        instructions = assembly.len(),
        binary = %args.binary_out.display(),
        "assembled"
    );
    Ok(())
}

pub struct ExecuteArgs {
    pub binary: PathBuf,
    pub trace_out: PathBuf,
    pub dump_out: PathBuf,
    pub range: DumpRange,
    pub memory_size: usize,
    pub max_steps: Option<u64>,
    pub registers: bool,
    pub format: Format,
}

impl ExecuteArgs {
    fn config(&self) -> VMConfig {
        VMConfig {
            memory_size: self.memory_size,
            max_steps: self.max_steps,
        }
    }

    fn target(&self) -> DumpTarget {
        if self.registers {
            DumpTarget::Registers
        } else {
            DumpTarget::Memory
        }
    }
}

fn write_trace(path: &Path, format: Format, trace: &[TraceEntry]) -> Result<()> {
    let bytes = render(format, trace, |entries, buf| {
        uvm_runtime::trace::write_csv(entries, buf)
    })?;
    write_atomic(path, &bytes)
}

/// Execute a record stream, then write its trace and a dump of the range
///
/// On a fault the trace up to the fault is still written; the dump is not.
pub fn execute_cmd(args: &ExecuteArgs) -> Result<()> {
    let bytes = fs::read(&args.binary)
        .with_context(|| format!("failed to read binary {}", args.binary.display()))?;

    let vm = VM::new(bytes, args.config()).context("invalid machine configuration")?;

    let result = match vm.run() {
        Ok(result) => result,
        Err(fault) => {
            let context = format!("failed to execute {}", args.binary.display());
            write_trace(&args.trace_out, args.format, &fault.trace)
                .with_context(|| format!("{}: {}", context, fault))?;
            return Err(fault).context(context);
        }
    };

    write_trace(&args.trace_out, args.format, &result.trace)?;

    let target = args.target();
    let records = result
        .state
        .dump(target, args.range)
        .with_context(|| format!("cannot dump {} range {}", target, args.range))?;

    let dump = render(args.format, &records, |records, buf| {
        uvm_runtime::dump::write_csv(records, buf)
    })?;
    write_atomic(&args.dump_out, &dump)?;

    info!(
        steps = result.steps,
        notices = result.notices().count(),
        dump = %args.dump_out.display(),
        "executed"
    );
    Ok(())
}

pub struct DisassembleArgs {
    pub binary: PathBuf,
    pub strict: bool,
}

/// Print a listing of a record stream to stdout
pub fn disassemble_cmd(args: &DisassembleArgs) -> Result<String> {
    let bytes = fs::read(&args.binary)
        .with_context(|| format!("failed to read binary {}", args.binary.display()))?;

    Ok(if args.strict {
        disassemble_strict(&bytes)
    } else {
        disassemble(&bytes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("uvm-cmd-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn execute_args(dir: &Path, range: &str) -> ExecuteArgs {
        ExecuteArgs {
            binary: dir.join("prog.bin"),
            trace_out: dir.join("trace.csv"),
            dump_out: dir.join("dump.csv"),
            range: range.parse().unwrap(),
            memory_size: 1024,
            max_steps: None,
            registers: false,
            format: Format::Csv,
        }
    }

    #[test]
    fn test_assemble_then_execute() {
        let dir = scratch("pipeline");
        let source = "Command,A,B,C,D,E\nLOAD_CONST,0,45\nLOAD_CONST,1,6\nMOD,12,0,1\n";
        fs::write(dir.join("prog.csv"), source).unwrap();

        assemble_cmd(&AssembleArgs {
            program: dir.join("prog.csv"),
            binary_out: dir.join("prog.bin"),
            log_out: dir.join("prog.log.csv"),
            format: Format::Csv,
        })
        .unwrap();
        assert_eq!(fs::read(dir.join("prog.bin")).unwrap().len(), 18);

        execute_cmd(&execute_args(&dir, "12-13")).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("dump.csv")).unwrap(),
            "Address,Value\n12,3\n13,0\n"
        );
        assert_eq!(fs::read_to_string(dir.join("trace.csv")).unwrap().lines().count(), 4);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_assemble_failure_writes_nothing() {
        let dir = scratch("atomic-asm");
        fs::write(dir.join("bad.csv"), "LOAD_CONST,1,2\nLOAD_CONST,999,2\n").unwrap();

        let err = assemble_cmd(&AssembleArgs {
            program: dir.join("bad.csv"),
            binary_out: dir.join("bad.bin"),
            log_out: dir.join("bad.log"),
            format: Format::Csv,
        })
        .unwrap_err();

        assert!(format!("{:#}", err).contains("row 2"));
        assert!(!dir.join("bad.bin").exists());
        assert!(!dir.join("bad.log").exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_execute_fault_keeps_trace_skips_dump() {
        let dir = scratch("fault");
        // LOAD_CONST r0 = 1, then a 3-byte tail
        let bytes: [u8; 9] = [0x06, 0x00, 0x00, 0x00, 0x00, 0x01, 0x06, 0x00, 0x00];
        fs::write(dir.join("prog.bin"), bytes).unwrap();

        let err = execute_cmd(&execute_args(&dir, "0-0")).unwrap_err();
        assert!(format!("{:#}", err).contains("offset 6"));
        assert!(!dir.join("dump.csv").exists());
        assert_eq!(fs::read_to_string(dir.join("trace.csv")).unwrap().lines().count(), 2);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_assemble_into_directory_writes_nothing() {
        let dir = scratch("log-dir");
        fs::write(dir.join("p.csv"), "LOAD_CONST,1,2\n").unwrap();
        fs::create_dir_all(dir.join("log_out").join("keep")).unwrap();

        let err = assemble_cmd(&AssembleArgs {
            program: dir.join("p.csv"),
            binary_out: dir.join("p.bin"),
            log_out: dir.join("log_out"),
            format: Format::Csv,
        })
        .unwrap_err();

        assert!(format!("{:#}", err).contains("is a directory"));
        assert!(!dir.join("p.bin").exists());
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["log_out", "p.csv"]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_outputs() {
        let dir = scratch("json");
        fs::write(dir.join("prog.csv"), "LOAD_CONST,0,45\nLOAD_CONST,1,0\nMOD,12,0,1\n").unwrap();

        assemble_cmd(&AssembleArgs {
            program: dir.join("prog.csv"),
            binary_out: dir.join("prog.bin"),
            log_out: dir.join("prog.log.json"),
            format: Format::Json,
        })
        .unwrap();

        let log: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("prog.log.json")).unwrap()).unwrap();
        assert_eq!(log.as_array().unwrap().len(), 3);
        assert_eq!(log[0]["mnemonic"], "LOAD_CONST");
        assert_eq!(log[2]["row"], 3);
        assert_eq!(log[2]["hex"], "0E 00 0C 00 01 00");

        let mut args = execute_args(&dir, "12-12");
        args.trace_out = dir.join("trace.json");
        args.dump_out = dir.join("dump.json");
        args.format = Format::Json;
        execute_cmd(&args).unwrap();

        let trace: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("trace.json")).unwrap()).unwrap();
        assert_eq!(trace.as_array().unwrap().len(), 4);
        assert_eq!(trace[2]["offset"], 12);
        assert_eq!(trace[3]["effect"]["kind"], "division_by_zero");

        let dump: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("dump.json")).unwrap()).unwrap();
        assert_eq!(dump, serde_json::json!([{ "address": 12, "value": 0 }]));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_execute_register_dump() {
        let dir = scratch("registers");
        // LOAD_CONST r63 = 7
        let bytes: [u8; 6] = [0x06, 0x3F, 0x00, 0x00, 0x00, 0x07];
        fs::write(dir.join("prog.bin"), bytes).unwrap();

        let mut args = execute_args(&dir, "62-63");
        args.registers = true;
        execute_cmd(&args).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("dump.csv")).unwrap(),
            "Address,Value\n62,0\n63,7\n"
        );

        let mut args = execute_args(&dir, "63-64");
        args.registers = true;
        let err = execute_cmd(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("registers"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_execute_unknown_opcode() {
        let dir = scratch("decode");
        // LOAD_CONST r0 = 1, then a record with tag 0xFF
        let bytes: [u8; 12] = [0x06, 0x00, 0x00, 0x00, 0x00, 0x01, 0xFF, 0, 0, 0, 0, 0];
        fs::write(dir.join("prog.bin"), bytes).unwrap();

        let err = execute_cmd(&execute_args(&dir, "0-0")).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("offset 6"), "{}", message);
        assert!(message.contains("0xff"), "{}", message);
        assert!(!dir.join("dump.csv").exists());
        assert_eq!(fs::read_to_string(dir.join("trace.csv")).unwrap().lines().count(), 2);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_trace_write_failure_keeps_fault() {
        let dir = scratch("trace-dir");
        // a 3-byte stream truncates at offset 0
        let bytes: [u8; 3] = [0x06, 0x00, 0x00];
        fs::write(dir.join("prog.bin"), bytes).unwrap();
        fs::create_dir_all(dir.join("trace.csv").join("keep")).unwrap();

        let err = execute_cmd(&execute_args(&dir, "0-0")).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Truncated instruction at offset 0"), "{}", message);
        assert!(message.contains("is a directory"), "{}", message);
        fs::remove_dir_all(&dir).ok();
    }
}
