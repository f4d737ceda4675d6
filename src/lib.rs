pub use chip8::Chip8;
pub use constants::CLOCK_SPEED;
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use quirks::{JumpWithOffset, Quirks, SpriteEdge};
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod quirks;
pub mod state;
