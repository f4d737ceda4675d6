use log::warn;
use rand::Rng;

use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_SIZE, DISPLAY_WIDTH, GLYPH_SIZE, SPRITE_WIDTH,
    STACK_SIZE,
};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::quirks::{JumpWithOffset, Quirks, SpriteEdge};
use crate::state::State;

/// Carries out a decoded instruction, returning the State that follows `state`.
///
/// `state` itself is never modified, so an `Err` leaves the machine as it was.
pub fn execute(
    instruction: Instruction,
    state: &State,
    rng: &mut impl Rng,
    quirks: Quirks,
) -> Result<State> {
    use Instruction as I;

    let next = match instruction {
        I::Clear => clr(state),
        I::Return => rts(state)?,
        I::MachineCall { nnn } => sys(state, nnn),
        I::Jump { nnn } => jump(state, nnn),
        I::Call { nnn } => call(state, nnn)?,
        I::SkipEqImm { x, nn } => ske(state, x, nn),
        I::SkipNeqImm { x, nn } => skne(state, x, nn),
        I::SkipEqReg { x, y } => skre(state, x, y),
        I::LoadImm { x, nn } => load(state, x, nn),
        I::AddImm { x, nn } => add(state, x, nn),
        I::Move { x, y } => mv(state, x, y),
        I::Or { x, y } => or(state, x, y),
        I::And { x, y } => and(state, x, y),
        I::Xor { x, y } => xor(state, x, y),
        I::AddReg { x, y } => addr(state, x, y),
        I::SubReg { x, y } => sub(state, x, y),
        I::ShiftRight { x } => shr(state, x),
        I::SubRegReverse { x, y } => subn(state, x, y),
        I::ShiftLeft { x } => shl(state, x),
        I::SkipNeqReg { x, y } => skrne(state, x, y),
        I::SetIndex { nnn } => loadi(state, nnn),
        I::JumpWithOffset { nnn } => jumpi(state, nnn, quirks.jump_with_offset),
        I::Random { x, nn } => rnd(state, x, nn, rng),
        I::Draw { x, y, n } => draw(state, x, y, n, quirks.sprite_edge)?,
        I::SkipKeyPressed { x } => skpr(state, x),
        I::SkipKeyNotPressed { x } => skup(state, x),
        I::GetDelayTimer { x } => moved(state, x),
        I::WaitForKey { x } => keyd(state, x),
        I::SetDelayTimer { x } => loadd(state, x),
        I::SetSoundTimer { x } => loads(state, x),
        I::AddToIndex { x } => addi(state, x),
        I::SetIndexToGlyph { x } => ldspr(state, x),
        I::StoreBcd { x } => bcd(state, x)?,
        I::RegisterDump { x } => stor(state, x)?,
        I::RegisterLoad { x } => read(state, x)?,
        I::Unknown(op) => unknown(state, op),
    };
    Ok(next)
}

/// clear
pub fn clr(state: &State) -> State {
    State {
        pc: state.next_pc(),
        frame_buffer: [0; DISPLAY_SIZE],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop() + 2
pub fn rts(state: &State) -> Result<State> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 1;
    Ok(State {
        pc: state.stack[sp].wrapping_add(2),
        sp,
        ..*state
    })
}

/// Native machine routines don't exist here; log it and move on
pub fn sys(state: &State, nnn: u16) -> State {
    warn!(
        "machine call 0x{:04X} to 0x{:03X} at pc 0x{:03X} is not supported, skipping",
        state.opcode, nnn, state.pc
    );
    State {
        pc: state.next_pc(),
        ..*state
    }
}

/// PC = nnn
pub fn jump(state: &State, nnn: u16) -> State {
    State { pc: nnn, ..*state }
}

/// STACK.push(PC); PC = nnn
pub fn call(state: &State, nnn: u16) -> Result<State> {
    if state.sp >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp] = state.pc;
    Ok(State {
        pc: nnn,
        sp: state.sp + 1,
        stack,
        ..*state
    })
}

/// if Vx == nn then skip
pub fn ske(state: &State, x: usize, nn: u8) -> State {
    State {
        pc: state.skip_pc(state.v[x] == nn),
        ..*state
    }
}

/// if Vx != nn then skip
pub fn skne(state: &State, x: usize, nn: u8) -> State {
    State {
        pc: state.skip_pc(state.v[x] != nn),
        ..*state
    }
}

/// if Vx == Vy then skip
pub fn skre(state: &State, x: usize, y: usize) -> State {
    State {
        pc: state.skip_pc(state.v[x] == state.v[y]),
        ..*state
    }
}

/// Vx = nn
pub fn load(state: &State, x: usize, nn: u8) -> State {
    let mut v = state.v;
    v[x] = nn;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx += nn
/// Overflow wraps and is otherwise ignored; VF is untouched
pub fn add(state: &State, x: usize, nn: u8) -> State {
    let mut v = state.v;
    v[x] = v[x].wrapping_add(nn);
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn mv(state: &State, x: usize, y: usize) -> State {
    let mut v = state.v;
    v[x] = v[y];
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx |= Vy
pub fn or(state: &State, x: usize, y: usize) -> State {
    let mut v = state.v;
    v[x] |= v[y];
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx &= Vy
pub fn and(state: &State, x: usize, y: usize) -> State {
    let mut v = state.v;
    v[x] &= v[y];
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx ^= Vy
pub fn xor(state: &State, x: usize, y: usize) -> State {
    let mut v = state.v;
    v[x] ^= v[y];
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

// The arithmetic below computes its result from the operands as they were before the
// instruction, writes VF, then writes Vx. With x == 0xF the result therefore wins over the flag.

/// Vx += Vy; VF = overflow
pub fn addr(state: &State, x: usize, y: usize) -> State {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    let mut v = state.v;
    v[0xF] = u8::from(over);
    v[x] = res;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx -= Vy; VF = !borrow
pub fn sub(state: &State, x: usize, y: usize) -> State {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    let mut v = state.v;
    v[0xF] = u8::from(!under);
    v[x] = res;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &State, x: usize) -> State {
    let vx = state.v[x];
    let mut v = state.v;
    v[0xF] = vx & 0x1;
    v[x] = vx >> 1;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &State, x: usize, y: usize) -> State {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    let mut v = state.v;
    v[0xF] = u8::from(!under);
    v[x] = res;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &State, x: usize) -> State {
    let vx = state.v[x];
    let mut v = state.v;
    v[0xF] = vx >> 7;
    v[x] = vx << 1;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// if Vx != Vy then skip
pub fn skrne(state: &State, x: usize, y: usize) -> State {
    State {
        pc: state.skip_pc(state.v[x] != state.v[y]),
        ..*state
    }
}

/// I = nnn
pub fn loadi(state: &State, nnn: u16) -> State {
    State {
        pc: state.next_pc(),
        i: nnn & ADDRESS_MASK,
        ..*state
    }
}

/// I = nnn + V0, or PC = nnn + V0 depending on `mode`
pub fn jumpi(state: &State, nnn: u16, mode: JumpWithOffset) -> State {
    let target = (nnn + u16::from(state.v[0x0])) & ADDRESS_MASK;
    match mode {
        JumpWithOffset::SetIndex => State {
            pc: state.next_pc(),
            i: target,
            ..*state
        },
        JumpWithOffset::Jump => State {
            pc: target,
            ..*state
        },
    }
}

/// Vx = random_byte & nn
pub fn rnd(state: &State, x: usize, nn: u8, rng: &mut impl Rng) -> State {
    let byte: u8 = rng.random();
    let mut v = state.v;
    v[x] = nn & byte;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs an 8 pixel wide sprite read from memory I..I+n onto the FrameBuffer at (Vx, Vy).
/// VF is set if any pixel is erased anywhere in the sprite.
pub fn draw(state: &State, x: usize, y: usize, n: u8, edge: SpriteEdge) -> Result<State> {
    let sprite = state.memory_slice(usize::from(state.i), usize::from(n))?;
    let origin_x = usize::from(state.v[x]);
    let origin_y = usize::from(state.v[y]);
    let mut frame_buffer = state.frame_buffer;
    let mut collision = false;

    for (row, byte) in sprite.iter().enumerate() {
        for column in 0..SPRITE_WIDTH {
            if byte & (0x80u8 >> column) == 0 {
                continue;
            }
            let (px, py) = match edge {
                SpriteEdge::Wrap => (
                    (origin_x + column) % DISPLAY_WIDTH,
                    (origin_y + row) % DISPLAY_HEIGHT,
                ),
                SpriteEdge::Clip => {
                    let px = origin_x % DISPLAY_WIDTH + column;
                    let py = origin_y % DISPLAY_HEIGHT + row;
                    if px >= DISPLAY_WIDTH || py >= DISPLAY_HEIGHT {
                        continue;
                    }
                    (px, py)
                }
            };
            let pixel = &mut frame_buffer[py * DISPLAY_WIDTH + px];
            collision |= *pixel == 1;
            *pixel ^= 1;
        }
    }

    let mut v = state.v;
    v[0xF] = u8::from(collision);
    Ok(State {
        pc: state.next_pc(),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Whether the key named by Vx is held; values past 0xF name no key
fn key_pressed(state: &State, x: usize) -> bool {
    let key = usize::from(state.v[x]);
    match state.keys.get(key) {
        Some(&pressed) => pressed,
        None => {
            warn!(
                "opcode 0x{:04X} at pc 0x{:03X} reads key 0x{:02X} from V{:X}, treating it as released",
                state.opcode, state.pc, key, x
            );
            false
        }
    }
}

/// if Vx.pressed then skip
pub fn skpr(state: &State, x: usize) -> State {
    State {
        pc: state.skip_pc(key_pressed(state, x)),
        ..*state
    }
}

/// if !Vx.pressed then skip
pub fn skup(state: &State, x: usize) -> State {
    State {
        pc: state.skip_pc(!key_pressed(state, x)),
        ..*state
    }
}

/// Vx = DT
pub fn moved(state: &State, x: usize) -> State {
    let mut v = state.v;
    v[x] = state.delay_timer;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx = pressed key
/// The highest pressed key wins. With nothing pressed the PC stays put so this runs again next step.
pub fn keyd(state: &State, x: usize) -> State {
    match state.keys.iter().rposition(|&pressed| pressed) {
        Some(key) => {
            let mut v = state.v;
            v[x] = key as u8;
            State {
                pc: state.next_pc(),
                v,
                ..*state
            }
        }
        None => *state,
    }
}

/// DT = Vx
pub fn loadd(state: &State, x: usize) -> State {
    State {
        pc: state.next_pc(),
        delay_timer: state.v[x],
        ..*state
    }
}

/// ST = Vx
pub fn loads(state: &State, x: usize) -> State {
    State {
        pc: state.next_pc(),
        sound_timer: state.v[x],
        ..*state
    }
}

/// I += Vx; VF = I overflowed 12 bits
pub fn addi(state: &State, x: usize) -> State {
    let sum = state.i + u16::from(state.v[x]);
    let mut v = state.v;
    v[0xF] = u8::from(sum > ADDRESS_MASK);
    State {
        pc: state.next_pc(),
        i: sum & ADDRESS_MASK,
        v,
        ..*state
    }
}

/// I = Vx * 5
/// Points I at the sprite sheet glyph for the digit in Vx
pub fn ldspr(state: &State, x: usize) -> State {
    State {
        pc: state.next_pc(),
        i: u16::from(state.v[x]) * GLYPH_SIZE,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(state: &State, x: usize) -> Result<State> {
    let vx = state.v[x];
    let digits = [vx / 100, vx / 10 % 10, vx % 10];
    let mut next = *state;
    next.memory_slice_mut(usize::from(state.i), digits.len())?
        .copy_from_slice(&digits);
    Ok(State {
        pc: state.next_pc(),
        ..next
    })
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(state: &State, x: usize) -> Result<State> {
    let count = x + 1;
    let mut next = *state;
    next.memory_slice_mut(usize::from(state.i), count)?
        .copy_from_slice(&state.v[..count]);
    Ok(State {
        pc: state.next_pc(),
        i: state.i + count as u16,
        ..next
    })
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(state: &State, x: usize) -> Result<State> {
    let count = x + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.memory_slice(usize::from(state.i), count)?);
    Ok(State {
        pc: state.next_pc(),
        i: state.i + count as u16,
        v,
        ..*state
    })
}

/// Anything that doesn't decode is logged and skipped
pub fn unknown(state: &State, op: u16) -> State {
    warn!(
        "unknown opcode 0x{:04X} at pc 0x{:03X}, skipping",
        op, state.pc
    );
    State {
        pc: state.next_pc(),
        ..*state
    }
}
