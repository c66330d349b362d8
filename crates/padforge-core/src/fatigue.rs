//! Per-finger fatigue accumulation and decay (§4.3).

use crate::consts::{FATIGUE_ACCUM_RATE, FATIGUE_DECAY_RATE, MAX_FATIGUE};
use padforge_protocol::{Finger, Hand};

/// Fatigue value per finger per hand, owned by a single solver invocation.
#[derive(Debug, Clone, Copy)]
pub struct FatigueState {
    left: [f32; 5],
    right: [f32; 5],
}

impl Default for FatigueState {
    fn default() -> Self {
        Self {
            left: [0.0; 5],
            right: [0.0; 5],
        }
    }
}

impl FatigueState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&mut self, hand: Hand) -> &mut [f32; 5] {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    pub fn get(&self, hand: Hand, finger: Finger) -> f32 {
        match hand {
            Hand::Left => self.left[finger.slot()],
            Hand::Right => self.right[finger.slot()],
        }
    }

    /// Advances fatigue for every finger on `hand` by `elapsed_secs` of decay,
    /// then accumulates one use on `used`.
    pub fn apply_use(&mut self, hand: Hand, used: Finger, elapsed_secs: f64) {
        let slots = self.slots(hand);
        let decay = FATIGUE_DECAY_RATE * elapsed_secs.max(0.0) as f32;
        for v in slots.iter_mut() {
            *v = (*v - decay).max(0.0);
        }
        let slot = &mut slots[used.slot()];
        *slot = (*slot + FATIGUE_ACCUM_RATE).min(MAX_FATIGUE);
    }

    /// Decays every finger on `hand` without accumulating a use (for fingers
    /// that rest this moment).
    pub fn decay_only(&mut self, hand: Hand, elapsed_secs: f64) {
        let decay = FATIGUE_DECAY_RATE * elapsed_secs.max(0.0) as f32;
        for v in self.slots(hand).iter_mut() {
            *v = (*v - decay).max(0.0);
        }
    }

    pub fn fatigue_map(&self) -> std::collections::HashMap<String, f32> {
        let mut map = std::collections::HashMap::new();
        for finger in Finger::ALL {
            map.insert(Hand::Left.usage_key(finger), self.get(Hand::Left, finger));
            map.insert(Hand::Right.usage_key(finger), self.get(Hand::Right, finger));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_accumulates_and_clamps_to_max() {
        let mut state = FatigueState::new();
        for _ in 0..1000 {
            state.apply_use(Hand::Left, Finger::Index, 0.0);
        }
        assert_eq!(state.get(Hand::Left, Finger::Index), MAX_FATIGUE);
    }

    #[test]
    fn rest_decays_linearly() {
        let mut state = FatigueState::new();
        state.apply_use(Hand::Right, Finger::Thumb, 0.0);
        let before = state.get(Hand::Right, Finger::Thumb);
        state.decay_only(Hand::Right, 1.0);
        let after = state.get(Hand::Right, Finger::Thumb);
        assert!(after < before);
        assert!(after >= 0.0);
    }
}
