use crate::finger::Finger;
use serde::{Deserialize, Serialize};

/// A hand shape: a centroid and up to five placed fingers.
///
/// Invariant: `centroid` equals the mean of placed fingers, or the default
/// grid-center `(3.5, 3.5)` when none are placed. Use [`HandPose::place`] /
/// [`HandPose::recompute_centroid`] rather than writing `fingers` directly to
/// keep this invariant intact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub centroid: (f32, f32),
    /// Indexed by `Finger::slot()`; `None` means that finger is free.
    pub fingers: [Option<(f32, f32)>; 5],
}

const DEFAULT_GRID_CENTER: (f32, f32) = (3.5, 3.5);

impl HandPose {
    pub fn empty_at(centroid: (f32, f32)) -> Self {
        Self {
            centroid,
            fingers: [None; 5],
        }
    }

    pub fn empty() -> Self {
        Self::empty_at(DEFAULT_GRID_CENTER)
    }

    pub fn placed(&self) -> impl Iterator<Item = (Finger, (f32, f32))> + '_ {
        self.fingers
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|pt| (Finger::from_slot(i).unwrap(), pt)))
    }

    pub fn place(&mut self, finger: Finger, point: (f32, f32)) {
        self.fingers[finger.slot()] = Some(point);
        self.recompute_centroid();
    }

    pub fn recompute_centroid(&mut self) {
        let placed: Vec<(f32, f32)> = self.placed().map(|(_, p)| p).collect();
        self.centroid = if placed.is_empty() {
            DEFAULT_GRID_CENTER
        } else {
            let n = placed.len() as f32;
            let (sx, sy) = placed.iter().fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
            (sx / n, sy / n)
        };
    }

    pub fn is_placed(&self, finger: Finger) -> bool {
        self.fingers[finger.slot()].is_some()
    }
}

/// Per-hand resting pose: seeds the beam search and serves as the attractor
/// target. Default left-hand resting centroid ~= (2,2), right ~= (5,2), the
/// standard "claw" shape.
///
/// Unlike a pose produced by the grip generator, a resting pose is a fixed
/// target centroid with no fingers placed; it is exempt from the
/// placed-mean invariant that governs live poses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestingPoses {
    pub left: HandPose,
    pub right: HandPose,
}

impl Default for RestingPoses {
    fn default() -> Self {
        Self {
            left: HandPose::empty_at((2.0, 2.0)),
            right: HandPose::empty_at((5.0, 2.0)),
        }
    }
}

/// One home pitch per finger, per hand. Used to refine the "comfortable
/// spread" and "drift home" targets dynamically for a given grid layout.
/// When absent, the engine falls back to a synthesized canonical spread
/// around the resting centroid (see `padforge_core::geometry`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NeutralHomePitches {
    pub left: [Option<u8>; 5],
    pub right: [Option<u8>; 5],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub beam_width: usize,
    /// Spring constant for the attractor cost, clamped to [0, 1].
    pub stiffness: f32,
    pub resting_pose: RestingPoses,
    #[serde(default)]
    pub neutral_home_pitches: Option<NeutralHomePitches>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            beam_width: 8,
            stiffness: 0.3,
            resting_pose: RestingPoses::default(),
            neutral_home_pitches: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_tracks_placed_mean() {
        let mut pose = HandPose::empty();
        pose.place(Finger::Index, (2.0, 2.0));
        pose.place(Finger::Middle, (3.0, 2.0));
        assert_eq!(pose.centroid, (2.5, 2.0));
    }

    #[test]
    fn centroid_defaults_to_grid_center_when_empty() {
        let pose = HandPose::empty();
        assert_eq!(pose.centroid, DEFAULT_GRID_CENTER);
    }
}
