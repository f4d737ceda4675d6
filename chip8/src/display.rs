use emu8::constants::DISPLAY_WIDTH;
use emu8::FrameBuffer;

/// Formats a Chip-8 FrameBuffer as text, one line per row.
///
/// Lit pixels become `#` and unlit pixels become `.`.
pub fn frame_to_text(frame: &FrameBuffer) -> String {
    frame
        .chunks(DISPLAY_WIDTH)
        .map(|row| {
            row.iter()
                .map(|&pixel| if pixel == 1 { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
