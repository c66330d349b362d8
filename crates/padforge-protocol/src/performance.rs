use serde::{Deserialize, Serialize};

/// One played note: a MIDI pitch, onset time in seconds, and duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    pub duration: f64,
}

/// A time-ordered (or orderable) sequence of note events plus a tempo hint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Performance {
    pub tempo: f64,
    #[serde(default)]
    pub name: Option<String>,
    pub events: Vec<NoteEvent>,
}

impl Performance {
    /// Original event indices paired with their events, stable-sorted by start time.
    /// The core never mutates `events` in place; callers keep working with the
    /// original index to report results against the input order.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.events.len()).collect();
        idx.sort_by(|&a, &b| {
            self.events[a]
                .start_time
                .partial_cmp(&self.events[b].start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_indices_is_stable_and_by_time() {
        let perf = Performance {
            tempo: 120.0,
            name: None,
            events: vec![
                NoteEvent { pitch: 40, start_time: 1.0, duration: 0.1 },
                NoteEvent { pitch: 36, start_time: 0.0, duration: 0.1 },
                NoteEvent { pitch: 38, start_time: 0.0, duration: 0.1 },
            ],
        };
        assert_eq!(perf.sorted_indices(), vec![1, 2, 0]);
    }
}
