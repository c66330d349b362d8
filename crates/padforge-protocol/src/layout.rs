use crate::finger::Finger;
use crate::pad::Pad;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The user-facing "sound" that occupies a pad; carries the underlying pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    #[serde(rename = "originalMidiNote")]
    pub original_midi_note: u8,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A partial mapping pad-key -> voice that overrides the algorithmic
/// pitch -> pad function for the pitches it mentions, plus a partial mapping
/// pad-key -> forced finger. Carries a monotonically-increasing version and a
/// cached layout score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridMapping {
    pub id: String,
    pub cells: HashMap<String, Voice>,
    #[serde(default, rename = "fingerConstraints")]
    pub finger_constraints: HashMap<String, Finger>,
    #[serde(default)]
    pub version: u64,
    #[serde(default, rename = "scoreCache")]
    pub score_cache: Option<f32>,
}

impl GridMapping {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn voice_at(&self, pad: Pad) -> Option<&Voice> {
        self.cells.get(&pad.key())
    }

    /// Exact pitch match over this mapping's voices; `None` if the pitch is
    /// not explicitly placed in the layout.
    pub fn pad_for_pitch(&self, pitch: u8) -> Option<Pad> {
        self.cells.iter().find_map(|(key, voice)| {
            if voice.original_midi_note == pitch {
                Pad::parse(key)
            } else {
                None
            }
        })
    }

    pub fn finger_constraint_at(&self, pad: Pad) -> Option<Finger> {
        self.finger_constraints.get(&pad.key()).copied()
    }

    pub fn set_voice(&mut self, pad: Pad, voice: Voice) {
        self.cells.insert(pad.key(), voice);
        self.touch();
    }

    pub fn remove_voice(&mut self, pad: Pad) -> Option<Voice> {
        let v = self.cells.remove(&pad.key());
        if v.is_some() {
            self.touch();
        }
        v
    }

    /// Bumps the version and invalidates the cached score. Every structural
    /// mutation funnels through here so the score cache can never go stale
    /// silently.
    pub fn touch(&mut self) {
        self.version += 1;
        self.score_cache = None;
    }
}
