//! Virtual machine for UVM record streams

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::state::VMState;
use thiserror::Error;
use tracing::{debug, error, info};
use uvm_spec::{
    decode, BinaryRecord, Program, TraceEntry, UvmError, DEFAULT_MEMORY_SIZE, MAX_MEMORY_SIZE,
    RECORD_SIZE,
};

/// VM configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMConfig {
    /// Number of memory words
    pub memory_size: usize,

    /// Stop with `StepLimitExceeded` after this many instructions
    pub max_steps: Option<u64>,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_steps: None,
        }
    }
}

impl VMConfig {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Check the configuration can back a run
    pub fn validate(&self) -> Result<()> {
        if self.memory_size == 0 {
            return Err(RuntimeError::InvalidConfig("memory size must be at least 1".to_string()));
        }
        if self.memory_size > MAX_MEMORY_SIZE {
            return Err(RuntimeError::InvalidConfig(format!(
                "memory size {} exceeds the addressable {} words",
                self.memory_size, MAX_MEMORY_SIZE
            )));
        }
        Ok(())
    }
}

/// Interpreter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running,
    Halted,
    Faulted,
}

impl Status {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Halted | Status::Faulted)
    }
}

/// Execution result
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Final registers and memory
    pub state: VMState,

    /// Every trace entry, in execution order
    pub trace: Vec<TraceEntry>,

    /// Number of instructions executed
    pub steps: u64,
}

impl ExecutionResult {
    /// Division-by-zero notices raised during the run
    pub fn notices(&self) -> impl Iterator<Item = &TraceEntry> {
        self.trace.iter().filter(|entry| entry.is_notice())
    }
}

/// A run that stopped on a fatal error
///
/// Carries everything produced up to the fault so the caller can still
/// inspect or persist it.
#[derive(Debug, Error)]
#[error("execution faulted at offset {offset}: {error}")]
pub struct ExecutionFault {
    pub offset: usize,

    #[source]
    pub error: RuntimeError,

    pub trace: Vec<TraceEntry>,
    pub state: VMState,
}

/// UVM virtual machine
pub struct VM {
    /// Record stream being executed
    stream: Vec<u8>,

    /// Byte offset of the next record
    offset: usize,

    state: VMState,
    status: Status,
    trace: Vec<TraceEntry>,
    steps: u64,
    config: VMConfig,
}

impl VM {
    /// Create a VM over a raw record stream
    pub fn new(stream: Vec<u8>, config: VMConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stream,
            offset: 0,
            state: VMState::new(config.memory_size),
            status: Status::Ready,
            trace: Vec::new(),
            steps: 0,
            config,
        })
    }

    /// Create a VM over an already-decoded program
    pub fn from_program(program: &Program, config: VMConfig) -> Result<Self> {
        Self::new(program.to_bytes()?, config)
    }

    /// Execute one instruction
    ///
    /// Returns the status after the step. A halted or faulted VM does
    /// nothing and returns its terminal status; the error that caused a
    /// fault is returned only by the step that raised it.
    pub fn step(&mut self) -> Result<Status> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        self.status = Status::Running;

        let remaining = self.stream.len() - self.offset;
        if remaining == 0 {
            self.status = Status::Halted;
            return Ok(self.status);
        }

        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return self.fault(RuntimeError::StepLimitExceeded { limit });
            }
        }

        let record = match self.fetch(remaining) {
            Ok(record) => record,
            Err(e) => return self.fault(e),
        };

        let instr = match decode(&record) {
            Ok(instr) => instr,
            Err(UvmError::InvalidOpcode(tag)) => {
                return self.fault(RuntimeError::Decode { offset: self.offset, tag });
            }
            Err(e) => return self.fault(e.into()),
        };

        debug!(step = self.steps, offset = self.offset, instruction = %instr, "execute");

        match execute(&instr, &mut self.state, self.offset, self.steps) {
            Ok(entries) => self.trace.extend(entries),
            Err(e) => return self.fault(e),
        }

        self.steps += 1;
        self.offset += RECORD_SIZE;
        Ok(self.status)
    }

    /// Run until the stream is exhausted or a fault occurs
    pub fn run(mut self) -> std::result::Result<ExecutionResult, ExecutionFault> {
        loop {
            match self.step() {
                Ok(Status::Halted) => break,
                Ok(_) => {}
                Err(error) => {
                    return Err(ExecutionFault {
                        offset: self.offset,
                        error,
                        trace: self.trace,
                        state: self.state,
                    });
                }
            }
        }

        info!(
            steps = self.steps,
            notices = self.trace.iter().filter(|e| e.is_notice()).count(),
            "execution complete"
        );

        Ok(ExecutionResult {
            state: self.state,
            trace: self.trace,
            steps: self.steps,
        })
    }

    fn fetch(&self, remaining: usize) -> Result<BinaryRecord> {
        if remaining < RECORD_SIZE {
            return Err(RuntimeError::TruncatedInstruction {
                offset: self.offset,
                remaining,
            });
        }

        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(&self.stream[self.offset..self.offset + RECORD_SIZE]);
        Ok(record)
    }

    fn fault(&mut self, e: RuntimeError) -> Result<Status> {
        error!(offset = self.offset, step = self.steps, error = %e, "execution faulted");
        self.status = Status::Faulted;
        Err(e)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Byte offset of the next record to execute
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> &VMState {
        &self.state
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }
}
