use thiserror::Error;

/// Result type for Chip-8 operations
pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Conditions that stop a step or a load from completing.
///
/// Unknown opcodes are not errors; they are logged and skipped.
#[derive(Error, Debug)]
pub enum Chip8Error {
    #[error("call stack overflow: subroutine call at pc 0x{pc:03X} with a full stack")]
    StackOverflow { pc: u16 },

    #[error("call stack underflow: return at pc 0x{pc:03X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("program is {size} bytes but only {max} bytes are available")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("memory access of {len} byte(s) at 0x{address:04X} is out of bounds")]
    MemoryOutOfBounds { address: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
