//! `uvm`: assemble, execute, and disassemble UVM programs

mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use commands::{AssembleArgs, DisassembleArgs, ExecuteArgs};
use output::Format;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uvm_runtime::DumpRange;
use uvm_spec::DEFAULT_MEMORY_SIZE;

#[derive(Debug, Parser)]
#[command(name = "uvm", version, about = "Toolchain for the UVM educational virtual machine")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Format of log, trace, and dump files
    #[arg(long, value_enum, default_value_t = Format::Csv, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assemble a program table into a binary and an assembly log
    Assemble {
        program: PathBuf,
        binary_out: PathBuf,
        log_out: PathBuf,
    },

    /// Execute a binary, writing its trace and a dump of the final state
    Execute {
        binary: PathBuf,

        /// Execution trace, written even when the run faults
        trace_out: PathBuf,

        dump_out: PathBuf,

        /// Inclusive address range to dump, e.g. 12-17
        #[arg(long)]
        range: DumpRange,

        /// Number of memory words
        #[arg(long, env = "UVM_MEMORY_SIZE", default_value_t = DEFAULT_MEMORY_SIZE)]
        memory_size: usize,

        /// Fault after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,

        /// Dump registers instead of memory
        #[arg(long)]
        registers: bool,
    },

    /// Print a listing of a binary
    Disassemble {
        binary: PathBuf,

        /// Flag records with non-zero padding
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Assemble {
            program,
            binary_out,
            log_out,
        } => commands::assemble_cmd(&AssembleArgs {
            program,
            binary_out,
            log_out,
            format: cli.format,
        }),

        Command::Execute {
            binary,
            trace_out,
            dump_out,
            range,
            memory_size,
            max_steps,
            registers,
        } => commands::execute_cmd(&ExecuteArgs {
            binary,
            trace_out,
            dump_out,
            range,
            memory_size,
            max_steps,
            registers,
            format: cli.format,
        }),

        Command::Disassemble { binary, strict } => {
            let listing = commands::disassemble_cmd(&DisassembleArgs { binary, strict })?;
            print!("{}", listing);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
