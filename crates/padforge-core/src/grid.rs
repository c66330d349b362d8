use padforge_protocol::{GridMapping, InstrumentConfig, Pad};

/// Resolves a pitch to a pad: the layout's explicit mapping first (exact
/// pitch match over its voices), else the quadrant-tiling rule (§4.1).
/// Deterministic, side-effect free.
pub fn resolve_pitch(
    pitch: u8,
    instrument: &InstrumentConfig,
    layout: Option<&GridMapping>,
) -> Option<Pad> {
    if let Some(layout) = layout {
        if let Some(pad) = layout.pad_for_pitch(pitch) {
            return Some(pad);
        }
    }
    quadrant_tile(pitch, instrument)
}

/// Pads tile the grid in banks of 16 (4x4 quadrants): pitch N with
/// bank b = floor(N/16) lies in quadrant (b mod 4); quadrant 0 =
/// bottom-left, 1 = bottom-right, 2 = top-left, 3 = top-right; within a
/// quadrant the local index l = N mod 16 maps to (floor(l/4), l mod 4).
fn quadrant_tile(pitch: u8, instrument: &InstrumentConfig) -> Option<Pad> {
    let relative = pitch.checked_sub(instrument.bottom_left_pitch)?;
    let bank = relative / 16;
    let quadrant = bank % 4;
    let local = relative % 16;

    let (quadrant_row_offset, quadrant_col_offset) = match quadrant {
        0 => (0u8, 0u8),
        1 => (0, 4),
        2 => (4, 0),
        3 => (4, 4),
        _ => unreachable!("quadrant is bank % 4"),
    };

    let local_row = local / 4;
    let local_col = local % 4;

    let row = quadrant_row_offset + local_row;
    let col = quadrant_col_offset + local_col;

    if row < instrument.rows && col < instrument.cols {
        Some(Pad::new(row, col))
    } else {
        None
    }
}
