//! Shared fixture builders for integration tests (mirrors the teacher's
//! `tests/common/mod.rs`).

use padforge_protocol::{EngineConfig, GridMapping, InstrumentConfig, ManualAssignments, NoteEvent, Pad, Performance, Voice};
use rstest::fixture;

#[fixture]
pub fn instrument() -> InstrumentConfig {
    InstrumentConfig::default()
}

#[fixture]
pub fn engine_config() -> EngineConfig {
    EngineConfig::default()
}

#[fixture]
pub fn manual_assignments() -> ManualAssignments {
    ManualAssignments::new()
}

#[fixture]
pub fn empty_performance() -> Performance {
    Performance { tempo: 120.0, name: None, events: Vec::new() }
}

pub fn performance_of(pitches: &[(u8, f64, f64)]) -> Performance {
    Performance {
        tempo: 120.0,
        name: None,
        events: pitches
            .iter()
            .map(|&(pitch, start_time, duration)| NoteEvent { pitch, start_time, duration })
            .collect(),
    }
}

pub fn mapping_with(voices: &[(u8, u8, &str, u8)]) -> GridMapping {
    let mut mapping = GridMapping::default();
    for &(row, col, id, pitch) in voices {
        mapping.set_voice(
            Pad::new(row, col),
            Voice { id: id.to_string(), original_midi_note: pitch, label: None, color: None },
        );
    }
    mapping
}
