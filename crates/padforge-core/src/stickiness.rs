//! Per-invocation replacement for the source's module-level `noteHistory`
//! global (§9): a small bounded map from pitch to the last (finger,
//! timestamp) it was played with, owned by a single solver run.

use crate::consts::{STICKINESS_PENALTY, STICKINESS_WINDOW};
use fnv::FnvHashMap;
use padforge_protocol::Finger;

#[derive(Debug, Default, Clone)]
pub struct StickinessLedger {
    last_use: FnvHashMap<u8, (Finger, f64)>,
}

impl StickinessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty for replaying `pitch` with `finger` at `timestamp`, given
    /// whatever this pitch's previous use (if any) was. Does not mutate the
    /// ledger — call [`StickinessLedger::record`] once the assignment is
    /// final.
    pub fn penalty(&self, pitch: u8, finger: Finger, timestamp: f64) -> f32 {
        match self.last_use.get(&pitch) {
            Some(&(last_finger, last_time)) if last_finger != finger => {
                let dt = timestamp - last_time;
                if dt >= 0.0 && dt < STICKINESS_WINDOW {
                    STICKINESS_PENALTY * (1.0 - (dt / STICKINESS_WINDOW) as f32)
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    pub fn record(&mut self, pitch: u8, finger: Finger, timestamp: f64) {
        self.last_use.insert(pitch, (finger, timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_penalty_on_first_use_or_same_finger() {
        let mut ledger = StickinessLedger::new();
        assert_eq!(ledger.penalty(36, Finger::Index, 0.0), 0.0);
        ledger.record(36, Finger::Index, 0.0);
        assert_eq!(ledger.penalty(36, Finger::Index, 1.0), 0.0);
    }

    #[test]
    fn penalty_decays_toward_window_edge() {
        let mut ledger = StickinessLedger::new();
        ledger.record(36, Finger::Index, 0.0);
        let near = ledger.penalty(36, Finger::Middle, 0.1);
        let far = ledger.penalty(36, Finger::Middle, 4.9);
        assert!(near > far);
        assert_eq!(ledger.penalty(36, Finger::Middle, 10.0), 0.0);
    }
}
