use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use emu8::{JumpWithOffset, Quirks, SpriteEdge};

mod display;
mod run;

/// Headless Chip-8 interpreter
#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "Runs a Chip-8 ROM without a window", long_about = None)]
struct Args {
    /// Path to a raw Chip-8 program
    rom: PathBuf,

    /// Number of cycles to run; 0 runs until the program faults
    #[arg(short = 'n', long, default_value = "600")]
    cycles: u64,

    /// Target cycles per second [default: 60]
    #[arg(short, long)]
    rate: Option<u32>,

    /// Run as fast as possible instead of pacing to --rate
    #[arg(short, long)]
    fast: bool,

    /// Hex key (0-F) to hold down for the whole run; may be repeated
    #[arg(short = 'k', long = "hold", value_parser = parse_key)]
    hold: Vec<u8>,

    /// Make BNNN jump to NNN + V0 instead of loading it into I
    #[arg(long)]
    jump_sets_pc: bool,

    /// Drop sprite pixels that fall off the screen instead of wrapping them
    #[arg(long)]
    clip_sprites: bool,
}

fn parse_key(value: &str) -> Result<u8, String> {
    match u8::from_str_radix(value.trim_start_matches("0x"), 16) {
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("'{}' is not a key between 0 and F", value)),
    }
}

impl Args {
    fn options(&self) -> run::Options {
        let mut held_keys = [false; 16];
        for &key in &self.hold {
            held_keys[usize::from(key)] = true;
        }

        run::Options {
            rom: self.rom.clone(),
            cycles: self.cycles,
            rate: self.rate,
            fast_forward: self.fast,
            held_keys,
            quirks: Quirks {
                jump_with_offset: if self.jump_sets_pc {
                    JumpWithOffset::Jump
                } else {
                    JumpWithOffset::SetIndex
                },
                sprite_edge: if self.clip_sprites {
                    SpriteEdge::Clip
                } else {
                    SpriteEdge::Wrap
                },
            },
        }
    }
}

fn main() {
    // Default to info; RUST_LOG still overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    info!("chip8 v{}", env!("CARGO_PKG_VERSION"));

    let (chip8, result) = run::run(&args.options());
    println!("{}", display::frame_to_text(chip8.frame_buffer()));

    match result {
        Ok(cycles) => info!("stopped after {} cycles", cycles),
        Err(e) => {
            error!(
                "stopped on {} at pc 0x{:03X} (opcode 0x{:04X})",
                e,
                chip8.state().pc,
                chip8.state().opcode
            );
            process::exit(1);
        }
    }
}
