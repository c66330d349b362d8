use padforge_protocol::{Finger, Hand};

/// Which constraint-relaxation tier produced a [`GripResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripTier {
    Strict,
    Relaxed,
    Fallback,
}

impl GripTier {
    pub fn is_fallback(self) -> bool {
        matches!(self, GripTier::Fallback)
    }
}

/// A grid coordinate as (col, row) in `f32`, matching the pose convention
/// (x = column, y = row) from the data model.
pub type Point = (f32, f32);

/// One admissible placement of fingers on a hand for a given set of pads.
#[derive(Debug, Clone)]
pub struct GripResult {
    pub hand: Hand,
    pub centroid: Point,
    pub tier: GripTier,
    /// finger -> placed point, alongside which input pad (by index into the
    /// chord that was passed to the generator) it covers.
    pub assignment: Vec<(Finger, Point, usize)>,
}

impl GripResult {
    pub fn is_fallback(&self) -> bool {
        self.tier.is_fallback()
    }

    pub fn max_pairwise_span(&self) -> f32 {
        let mut max = 0.0f32;
        for i in 0..self.assignment.len() {
            for j in (i + 1)..self.assignment.len() {
                let (_, a, _) = self.assignment[i];
                let (_, b, _) = self.assignment[j];
                let d = crate::geometry::distance(a, b);
                if d > max {
                    max = d;
                }
            }
        }
        max
    }

    pub fn finger_for_chord_index(&self, chord_index: usize) -> Option<Finger> {
        self.assignment
            .iter()
            .find(|(_, _, idx)| *idx == chord_index)
            .map(|(f, _, _)| *f)
    }
}
