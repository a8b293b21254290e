//! Machine state: registers and word-addressed memory

use uvm_spec::{Word, DEFAULT_MEMORY_SIZE, NUM_REGISTERS};

/// Registers and memory of one run
///
/// Owned by the interpreter for the duration of a run and handed back to the
/// caller afterwards. All cells start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMState {
    /// General-purpose registers r0-r63
    pub registers: Vec<Word>,

    /// Data memory, one word per address
    pub memory: Vec<Word>,
}

impl Default for VMState {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}

impl VMState {
    pub fn new(memory_size: usize) -> Self {
        Self {
            registers: vec![0; NUM_REGISTERS],
            memory: vec![0; memory_size],
        }
    }

    #[inline]
    pub fn memory_size(&self) -> usize {
        self.memory.len()
    }

    #[inline]
    pub fn has_register(&self, reg: u8) -> bool {
        (reg as usize) < self.registers.len()
    }

    #[inline]
    pub fn has_address(&self, addr: u16) -> bool {
        (addr as usize) < self.memory.len()
    }

    /// Read register, `None` if out of range
    #[inline]
    pub fn read_reg(&self, reg: u8) -> Option<Word> {
        self.registers.get(reg as usize).copied()
    }

    /// Write register, returning the previous value
    #[inline]
    pub fn write_reg(&mut self, reg: u8, value: Word) -> Option<Word> {
        self.registers
            .get_mut(reg as usize)
            .map(|cell| std::mem::replace(cell, value))
    }

    /// Read memory, `None` if out of range
    #[inline]
    pub fn read_mem(&self, addr: u16) -> Option<Word> {
        self.memory.get(addr as usize).copied()
    }

    /// Write memory, returning the previous value
    #[inline]
    pub fn write_mem(&mut self, addr: u16, value: Word) -> Option<Word> {
        self.memory
            .get_mut(addr as usize)
            .map(|cell| std::mem::replace(cell, value))
    }
}
