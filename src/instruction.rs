use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices, `nn` an 8-bit immediate, `nnn` a 12-bit address
/// and `n` the sprite height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 0NNN: call a native machine routine; not supported
    MachineCall { nnn: u16 },
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN
    SkipNeqImm { x: usize, nn: u8 },
    /// 5XY0
    SkipEqReg { x: usize, y: usize },
    /// 6XNN
    LoadImm { x: usize, nn: u8 },
    /// 7XNN
    AddImm { x: usize, nn: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    AddReg { x: usize, y: usize },
    /// 8XY5
    SubReg { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize },
    /// 8XY7
    SubRegReverse { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize },
    /// 9XY0
    SkipNeqReg { x: usize, y: usize },
    /// ANNN
    SetIndex { nnn: u16 },
    /// BNNN
    JumpWithOffset { nnn: u16 },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyNotPressed { x: usize },
    /// FX07
    GetDelayTimer { x: usize },
    /// FX0A
    WaitForKey { x: usize },
    /// FX15
    SetDelayTimer { x: usize },
    /// FX18
    SetSoundTimer { x: usize },
    /// FX1E
    AddToIndex { x: usize },
    /// FX29
    SetIndexToGlyph { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    RegisterDump { x: usize },
    /// FX65
    RegisterLoad { x: usize },
    /// Anything not in the table above
    Unknown(u16),
}

use Instruction::*;

impl Instruction {
    /// Selects the Instruction for a given opcode.
    ///
    /// Decoding is total: words outside the base instruction set become `Unknown`.
    /// The 0, 8, E and F families are narrowed further by their low nibbles; the register
    /// compares and the FX2_/FX3_/FX5_/FX6_ rows accept any final nibble.
    pub fn decode(op: u16) -> Instruction {
        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, 0x0, 0xE, _) => Unknown(op),
            (0x0, ..) => MachineCall { nnn },
            (0x1, ..) => Jump { nnn },
            (0x2, ..) => Call { nnn },
            (0x3, ..) => SkipEqImm { x, nn },
            (0x4, ..) => SkipNeqImm { x, nn },
            (0x5, ..) => SkipEqReg { x, y },
            (0x6, ..) => LoadImm { x, nn },
            (0x7, ..) => AddImm { x, nn },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => SubReg { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubRegReverse { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, ..) => SkipNeqReg { x, y },
            (0xA, ..) => SetIndex { nnn },
            (0xB, ..) => JumpWithOffset { nnn },
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, _) => SkipKeyPressed { x },
            (0xE, _, 0xA, _) => SkipKeyNotPressed { x },
            (0xF, _, 0x0, 0x7) => GetDelayTimer { x },
            (0xF, _, 0x0, 0xA) => WaitForKey { x },
            (0xF, _, 0x1, 0x5) => SetDelayTimer { x },
            (0xF, _, 0x1, 0x8) => SetSoundTimer { x },
            (0xF, _, 0x1, 0xE) => AddToIndex { x },
            (0xF, _, 0x2, _) => SetIndexToGlyph { x },
            (0xF, _, 0x3, _) => StoreBcd { x },
            (0xF, _, 0x5, _) => RegisterDump { x },
            (0xF, _, 0x6, _) => RegisterLoad { x },
            _ => Unknown(op),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            MachineCall { nnn } => write!(f, "SYS 0x{:03X}", nnn),
            Jump { nnn } => write!(f, "JP 0x{:03X}", nnn),
            Call { nnn } => write!(f, "CALL 0x{:03X}", nnn),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, 0x{:02X}", x, nn),
            SkipNeqImm { x, nn } => write!(f, "SNE V{:X}, 0x{:02X}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, 0x{:02X}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, 0x{:02X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubReg { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x } => write!(f, "SHR V{:X}", x),
            SubRegReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            SkipNeqReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetIndex { nnn } => write!(f, "LD I, 0x{:03X}", nnn),
            JumpWithOffset { nnn } => write!(f, "JP V0, 0x{:03X}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, 0x{:02X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            GetDelayTimer { x } => write!(f, "LD V{:X}, DT", x),
            WaitForKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelayTimer { x } => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer { x } => write!(f, "LD ST, V{:X}", x),
            AddToIndex { x } => write!(f, "ADD I, V{:X}", x),
            SetIndexToGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            RegisterDump { x } => write!(f, "LD [I], V{:X}", x),
            RegisterLoad { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? 0x{:04X}", op),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_system_family() {
        assert_eq!(Instruction::decode(0x00E0), Clear);
        assert_eq!(Instruction::decode(0x00EE), Return);
        assert_eq!(Instruction::decode(0x0FFF), MachineCall { nnn: 0xFFF });
        assert_eq!(Instruction::decode(0x0123), MachineCall { nnn: 0x123 });
    }

    #[test]
    fn test_unlisted_00ex_is_unknown() {
        assert_eq!(Instruction::decode(0x00E5), Unknown(0x00E5));
    }

    #[test]
    fn test_decodes_flow_control() {
        assert_eq!(Instruction::decode(0x1ABC), Jump { nnn: 0xABC });
        assert_eq!(Instruction::decode(0x2123), Call { nnn: 0x123 });
        assert_eq!(Instruction::decode(0xB300), JumpWithOffset { nnn: 0x300 });
    }

    #[test]
    fn test_decodes_skips() {
        assert_eq!(Instruction::decode(0x3A11), SkipEqImm { x: 0xA, nn: 0x11 });
        assert_eq!(Instruction::decode(0x4A11), SkipNeqImm { x: 0xA, nn: 0x11 });
        assert_eq!(Instruction::decode(0x5120), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(Instruction::decode(0x9120), SkipNeqReg { x: 0x1, y: 0x2 });
        assert_eq!(Instruction::decode(0xE19E), SkipKeyPressed { x: 0x1 });
        assert_eq!(Instruction::decode(0xE1A1), SkipKeyNotPressed { x: 0x1 });
    }

    #[test]
    fn test_register_compares_ignore_suffix() {
        assert_eq!(Instruction::decode(0x5121), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(Instruction::decode(0x912F), SkipNeqReg { x: 0x1, y: 0x2 });
    }

    #[test]
    fn test_key_skips_ignore_suffix() {
        assert_eq!(Instruction::decode(0xE190), SkipKeyPressed { x: 0x1 });
        assert_eq!(Instruction::decode(0xE1AF), SkipKeyNotPressed { x: 0x1 });
    }

    #[test]
    fn test_misc_rows_ignore_suffix() {
        assert_eq!(Instruction::decode(0xF02A), SetIndexToGlyph { x: 0 });
        assert_eq!(Instruction::decode(0xF230), StoreBcd { x: 2 });
        assert_eq!(Instruction::decode(0xF35F), RegisterDump { x: 3 });
        assert_eq!(Instruction::decode(0xF460), RegisterLoad { x: 4 });
    }

    #[test]
    fn test_decodes_arithmetic_family() {
        assert_eq!(Instruction::decode(0x8120), Move { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8121), Or { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8122), And { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8123), Xor { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8124), AddReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8125), SubReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8126), ShiftRight { x: 1 });
        assert_eq!(Instruction::decode(0x8127), SubRegReverse { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x812E), ShiftLeft { x: 1 });
    }

    #[test]
    fn test_arithmetic_gaps_are_unknown() {
        for op in &[0x8128u16, 0x8129, 0x812A, 0x812B, 0x812C, 0x812D, 0x812F] {
            assert_eq!(Instruction::decode(*op), Unknown(*op));
        }
    }

    #[test]
    fn test_decodes_misc_family() {
        assert_eq!(Instruction::decode(0xF307), GetDelayTimer { x: 3 });
        assert_eq!(Instruction::decode(0xF30A), WaitForKey { x: 3 });
        assert_eq!(Instruction::decode(0xF315), SetDelayTimer { x: 3 });
        assert_eq!(Instruction::decode(0xF318), SetSoundTimer { x: 3 });
        assert_eq!(Instruction::decode(0xF31E), AddToIndex { x: 3 });
        assert_eq!(Instruction::decode(0xF329), SetIndexToGlyph { x: 3 });
        assert_eq!(Instruction::decode(0xF333), StoreBcd { x: 3 });
        assert_eq!(Instruction::decode(0xF355), RegisterDump { x: 3 });
        assert_eq!(Instruction::decode(0xF365), RegisterLoad { x: 3 });
    }

    #[test]
    fn test_misc_gaps_are_unknown() {
        for op in &[0xF300u16, 0xF30B, 0xF31F, 0xF310, 0xF340, 0xF375, 0xE1B1, 0xE100] {
            assert_eq!(Instruction::decode(*op), Unknown(*op));
        }
    }

    #[test]
    fn test_decodes_operands() {
        assert_eq!(Instruction::decode(0x6A42), LoadImm { x: 0xA, nn: 0x42 });
        assert_eq!(Instruction::decode(0x7A42), AddImm { x: 0xA, nn: 0x42 });
        assert_eq!(Instruction::decode(0xAFFF), SetIndex { nnn: 0xFFF });
        assert_eq!(Instruction::decode(0xC520), Random { x: 5, nn: 0x20 });
        assert_eq!(Instruction::decode(0xD12F), Draw { x: 1, y: 2, n: 0xF });
    }

    #[test]
    fn test_display_mnemonics() {
        assert_eq!(Instruction::decode(0x00E0).to_string(), "CLS");
        assert_eq!(Instruction::decode(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0xA2F0).to_string(), "LD I, 0x2F0");
        assert_eq!(Instruction::decode(0x812F).to_string(), "??? 0x812F");
    }
}
