use crate::constants::{DISPLAY_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_SIZE};
use crate::error::{Chip8Error, Result};

/// The FrameBuffer is row-major: pixel (x, y) lives at `y * DISPLAY_WIDTH + x`.
/// Each pixel is 1 (on) or 0 (off).
pub type FrameBuffer = [u8; DISPLAY_SIZE];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a memory address register; only the low 12 bits are meaningful
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the next free slot in the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per step while nonzero
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - programs are loaded at 0x200
/// - 64x32 frame buffer
///
/// ## Input
/// - 16 key latches for keys 0..F, written by the host before each step
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keys: [bool; 16],
    pub opcode: u16,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [0; DISPLAY_SIZE],
            draw_flag: false,
            keys: [false; 16],
            opcode: 0,
        }
    }

    /// Reads a single byte of memory.
    pub fn read_byte(&self, address: usize) -> Result<u8> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address, len: 1 })
    }

    /// Borrows `len` bytes of memory starting at `address`.
    pub fn memory_slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(&self.memory[address..end]),
            _ => Err(Chip8Error::MemoryOutOfBounds { address, len }),
        }
    }

    /// Mutably borrows `len` bytes of memory starting at `address`.
    pub fn memory_slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(&mut self.memory[address..end]),
            _ => Err(Chip8Error::MemoryOutOfBounds { address, len }),
        }
    }

    /// The address of the instruction after the current one.
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(2)
    }

    /// `next_pc`, jumping one further instruction if `condition` holds.
    pub fn skip_pc(&self, condition: bool) -> u16 {
        self.pc.wrapping_add(if condition { 4 } else { 2 })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
