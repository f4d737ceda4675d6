/// # Quirks
/// Interpreters disagree on a handful of behaviors.
/// `Quirks` selects which behavior the Chip-8 follows; the default keeps the observed one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    pub jump_with_offset: JumpWithOffset,
    pub sprite_edge: SpriteEdge,
}

/// What `BNNN` does with `NNN + V0`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum JumpWithOffset {
    /// I = NNN + V0, then continue with the next instruction
    #[default]
    SetIndex,
    /// PC = NNN + V0
    Jump,
}

/// How sprite pixels past the edge of the display are handled
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SpriteEdge {
    /// Every pixel wraps around to the opposite edge
    #[default]
    Wrap,
    /// The sprite origin wraps but pixels past the right or bottom edge are dropped
    Clip,
}
