use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, IntoStaticStr};

/// Ordered pinky < ring < middle < index < thumb for topology checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Pinky,
        Finger::Ring,
        Finger::Middle,
        Finger::Index,
        Finger::Thumb,
    ];

    /// Default finger-strength weight used by the movement cost term.
    pub fn strength_weight(self) -> f32 {
        match self {
            Finger::Thumb => 2.0,
            Finger::Index => 1.0,
            Finger::Middle => 1.0,
            Finger::Ring => 1.1,
            Finger::Pinky => 2.5,
        }
    }

    /// Dense-array index, stable across the crate (0..=4).
    pub fn slot(self) -> usize {
        match self {
            Finger::Pinky => 0,
            Finger::Ring => 1,
            Finger::Middle => 2,
            Finger::Index => 3,
            Finger::Thumb => 4,
        }
    }

    pub fn from_slot(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// "Index", "Thumb", ... — used to build finger-usage keys ("L-Index").
    pub fn label(self) -> &'static str {
        match self {
            Finger::Pinky => "Pinky",
            Finger::Ring => "Ring",
            Finger::Middle => "Middle",
            Finger::Index => "Index",
            Finger::Thumb => "Thumb",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn opposite(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub fn slot(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    /// "L" / "R" — used to build finger-usage keys ("L-Index").
    pub fn code(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
        }
    }

    pub fn usage_key(self, finger: Finger) -> String {
        format!("{}-{}", self.code(), finger.label())
    }
}
