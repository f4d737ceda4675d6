use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info};

use emu8::{Chip8, Quirks, Result, CLOCK_SPEED};

/// How the host should drive the Chip-8
pub struct Options {
    pub rom: PathBuf,
    /// Steps to run before stopping; 0 runs until an error
    pub cycles: u64,
    /// Target steps per second; `None` paces at `CLOCK_SPEED`
    pub rate: Option<u32>,
    /// Ignore `rate` and run as fast as possible
    pub fast_forward: bool,
    /// Keys held down for the whole run
    pub held_keys: [bool; 16],
    pub quirks: Quirks,
}

/// Loads the ROM and steps the Chip-8 until `cycles` have run or a step fails.
///
/// The Chip-8 is returned even on error so its last frame can still be shown.
pub fn run(options: &Options) -> (Chip8, Result<u64>) {
    let mut chip8 = Chip8::with_quirks(options.quirks);
    let result = load(&mut chip8, options).and_then(|()| drive(&mut chip8, options));
    (chip8, result)
}

fn load(chip8: &mut Chip8, options: &Options) -> Result<()> {
    let file = File::open(&options.rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader)?;
    info!("loaded ROM {}", options.rom.display());
    Ok(())
}

/// How long each step should take
fn cycle_time(rate: Option<u32>) -> Duration {
    match rate {
        Some(rate) => Duration::from_nanos(1_000_000_000 / u64::from(rate.max(1))),
        None => Duration::from_nanos(CLOCK_SPEED),
    }
}

fn drive(chip8: &mut Chip8, options: &Options) -> Result<u64> {
    // Set initial timing
    let step_time = cycle_time(options.rate);
    let mut last_cycle = Instant::now();
    let mut cycles: u64 = 0;
    let mut frames: u64 = 0;

    while options.cycles == 0 || cycles < options.cycles {
        // Keys are latched before the step, never during it
        chip8.set_keys(options.held_keys);
        chip8.step()?;
        cycles += 1;

        if chip8.get_frame().is_some() {
            frames += 1;
        }
        if chip8.take_beep() {
            info!("beep at cycle {}", cycles);
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !options.fast_forward && step_time > elapsed_cycle_time {
            std::thread::sleep(step_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    debug!("{} frames redrawn over {} cycles", frames, cycles);
    Ok(cycles)
}
