use std::io::Read;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_PROGRAM_SIZE, PROGRAM_START, TEST_RAND_SEED};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::opcode;
use crate::operations::execute;
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random number generator used by `CXNN`
///  - a pending beep, raised when the sound timer runs out
///
/// Supplies interfaces for:
/// - loading programs
/// - latching the 16 input keys
/// - stepping the CPU and its timers
/// - inspecting its frame buffer for rendering by some display
///
/// The host owns the Chip8 and drives it: set the keys, `step`, then collect the frame and beep.
pub struct Chip8 {
    state: State,
    quirks: Quirks,
    rng: StdRng,
    test_rand: bool,
    beep: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            quirks,
            rng: StdRng::from_os_rng(),
            test_rand: false,
            beep: false,
        }
    }

    /// Puts every piece of machine state back to how it is at power on.
    /// Quirks are configuration and survive a reset.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.test_rand = false;
        self.beep = false;
    }

    /// Copy a program into memory at 0x200
    ///
    /// Nothing else is touched; `reset` first for a clean machine.
    ///
    /// # Arguments
    /// * `program` the raw program image
    pub fn load_game(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.state
            .memory_slice_mut(usize::from(PROGRAM_START), program.len())?
            .copy_from_slice(program);
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_game(&program)
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the redraw flag
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn redraw_pending(&self) -> bool {
        self.state.draw_flag
    }

    /// Returns whether the sound timer ran out since the last call
    pub fn take_beep(&mut self) -> bool {
        std::mem::replace(&mut self.beep, false)
    }

    /// Latch all 16 keys at once
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.state.keys = keys;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        if let Some(latch) = self.state.keys.get_mut(usize::from(key)) {
            *latch = true;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if let Some(latch) = self.state.keys.get_mut(usize::from(key)) {
            *latch = false;
        }
    }

    /// When set, `CXNN` reseeds the generator with a fixed seed before every draw
    pub fn set_test_rand(&mut self, enabled: bool) {
        self.test_rand = enabled;
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Runs a single cycle
    /// - fetches and decodes the opcode at the pc
    /// - executes it
    /// - advances the timers
    ///
    /// Unknown opcodes are logged and skipped. An `Err` means the instruction could not run;
    /// the pc, registers and timers are left as they were.
    pub fn step(&mut self) -> Result<()> {
        let op = self.get_op()?;
        self.state.opcode = op;
        let instruction = Instruction::decode(op);
        trace!(
            "{:04X} {:<16} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction.to_string(),
            self.state.v,
            self.state.i,
            self.state.pc
        );

        if self.test_rand {
            if let Instruction::Random { .. } = instruction {
                self.rng = StdRng::seed_from_u64(TEST_RAND_SEED);
            }
        }

        self.state = execute(instruction, &self.state, &mut self.rng, self.quirks)?;
        self.advance_timers();
        Ok(())
    }

    /// Decrements both timers towards 0, raising a beep as the sound timer runs out
    fn advance_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        if self.state.sound_timer > 0 {
            if self.state.sound_timer == 1 {
                debug!("beep");
                self.beep = true;
            }
            self.state.sound_timer -= 1;
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        let pc = usize::from(self.state.pc);
        let high = self.state.read_byte(pc)?;
        let low = self.state.read_byte(pc + 1)?;
        Ok(opcode::from_bytes(high, low))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
