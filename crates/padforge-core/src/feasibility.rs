//! Hard geometric predicates and the tiered valid-grip generator (§4.2).

use crate::consts::{
    RELAXED_COLUMN_OVERLAP, RELAXED_MAX_SPAN, RELAXED_THUMB_ROW_SLACK, STRICT_MAX_SPAN,
    STRICT_THUMB_ROW_SLACK,
};
use crate::core_types::{GripResult, GripTier, Point};
use crate::geometry::{centroid_of, distance, pad_point};
use itertools::Itertools;
use padforge_protocol::{Finger, Hand, Pad};
use tracing::warn;

struct TierBounds {
    max_span: f32,
    thumb_row_slack: f32,
    column_overlap: f32,
}

fn tier_bounds(tier: GripTier) -> TierBounds {
    match tier {
        GripTier::Strict => TierBounds {
            max_span: STRICT_MAX_SPAN,
            thumb_row_slack: STRICT_THUMB_ROW_SLACK,
            column_overlap: 0.0,
        },
        GripTier::Relaxed => TierBounds {
            max_span: RELAXED_MAX_SPAN,
            thumb_row_slack: RELAXED_THUMB_ROW_SLACK,
            column_overlap: RELAXED_COLUMN_OVERLAP,
        },
        GripTier::Fallback => unreachable!("fallback grips are constructed, not enumerated"),
    }
}

/// Enumerates biomechanically admissible placements of up to five fingers on
/// `pads` for `hand`, trying strict then relaxed relaxation, and finally
/// falling back to a guaranteed non-empty single construction.
///
/// `pads` is taken as given, duplicates included: two chord entries that
/// resolve to the same pad collide under every permutation and the tiered
/// search naturally falls through to the fallback tier for that chord.
pub fn valid_grips(pads: &[Pad], hand: Hand) -> Vec<GripResult> {
    if pads.is_empty() || pads.len() > 5 {
        return Vec::new();
    }

    for tier in [GripTier::Strict, GripTier::Relaxed] {
        let results = generate_tier(pads, hand, tier);
        if !results.is_empty() {
            return results;
        }
    }

    warn!("no strict or relaxed grip admits {} pad(s) on {:?}; falling back to an emergency placement", pads.len(), hand);
    vec![fallback_grip(pads, hand)]
}

fn generate_tier(pads: &[Pad], hand: Hand, tier: GripTier) -> Vec<GripResult> {
    let k = pads.len();
    let bounds = tier_bounds(tier);
    let points: Vec<Point> = pads.iter().map(|p| pad_point(*p)).collect();

    let mut results = Vec::new();
    for perm in Finger::ALL.iter().permutations(k) {
        let placement: Vec<(Finger, Point, usize)> = perm
            .iter()
            .enumerate()
            .map(|(i, &f)| (*f, points[i], i))
            .collect();

        if has_collision(&placement) {
            continue;
        }
        if max_pairwise_span(&placement) > bounds.max_span {
            continue;
        }
        if topology_violation_count(hand, &placement, &bounds) > 0 {
            continue;
        }

        let centroid = centroid_of(&placement.iter().map(|(_, p, _)| *p).collect::<Vec<_>>())
            .expect("non-empty chord");
        results.push(GripResult {
            hand,
            centroid,
            tier,
            assignment: placement,
        });
    }
    results
}

/// Guaranteed-success construction: sort pads by column (ascending for left,
/// descending for right), assign in priority order
/// [index, middle, ring, thumb, pinky], take the first k.
fn fallback_grip(pads: &[Pad], hand: Hand) -> GripResult {
    const PRIORITY: [Finger; 5] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Thumb, Finger::Pinky];

    let mut indexed: Vec<(usize, Pad)> = pads.iter().copied().enumerate().collect();
    match hand {
        Hand::Left => indexed.sort_by_key(|(_, p)| p.col),
        Hand::Right => indexed.sort_by_key(|(_, p)| std::cmp::Reverse(p.col)),
    }

    let assignment: Vec<(Finger, Point, usize)> = indexed
        .iter()
        .zip(PRIORITY.iter())
        .map(|(&(chord_index, pad), &finger)| (finger, pad_point(pad), chord_index))
        .collect();

    let centroid = centroid_of(&assignment.iter().map(|(_, p, _)| *p).collect::<Vec<_>>())
        .expect("non-empty chord");

    GripResult {
        hand,
        centroid,
        tier: GripTier::Fallback,
        assignment,
    }
}

fn has_collision(placement: &[(Finger, Point, usize)]) -> bool {
    for i in 0..placement.len() {
        for j in (i + 1)..placement.len() {
            if distance(placement[i].1, placement[j].1) < f32::EPSILON {
                return true;
            }
        }
    }
    false
}

fn max_pairwise_span(placement: &[(Finger, Point, usize)]) -> f32 {
    let mut max = 0.0f32;
    for i in 0..placement.len() {
        for j in (i + 1)..placement.len() {
            let d = distance(placement[i].1, placement[j].1);
            if d > max {
                max = d;
            }
        }
    }
    max
}

pub fn finger_point(placement: &[(Finger, Point, usize)], finger: Finger) -> Option<Point> {
    placement.iter().find(|(f, _, _)| *f == finger).map(|(_, p, _)| *p)
}

fn topology_violation_count(hand: Hand, placement: &[(Finger, Point, usize)], bounds: &TierBounds) -> usize {
    let mut violations = 0;

    if let (Some(thumb), Some(pinky)) = (
        finger_point(placement, Finger::Thumb),
        finger_point(placement, Finger::Pinky),
    ) {
        if thumb_pinky_violated(hand, thumb, pinky) {
            violations += 1;
        }
    }

    if let (Some(index), Some(pinky)) = (
        finger_point(placement, Finger::Index),
        finger_point(placement, Finger::Pinky),
    ) {
        if index_pinky_violated(hand, index, pinky, bounds.column_overlap) {
            violations += 1;
        }
    }

    if let (Some(thumb), Some(middle)) = (
        finger_point(placement, Finger::Thumb),
        finger_point(placement, Finger::Middle),
    ) {
        if thumb.1 > middle.1 + bounds.thumb_row_slack {
            violations += 1;
        }
    }

    const SEQUENCE: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
    for pair in SEQUENCE.windows(2) {
        if let (Some(a), Some(b)) = (
            finger_point(placement, pair[0]),
            finger_point(placement, pair[1]),
        ) {
            if ordered_sequence_violated(hand, a, b, bounds.column_overlap) {
                violations += 1;
            }
        }
    }

    violations
}

/// Right hand requires thumb.col < pinky.col OR thumb.row < pinky.row; left
/// mirrors the column comparison.
pub fn thumb_pinky_violated(hand: Hand, thumb: Point, pinky: Point) -> bool {
    let ok = match hand {
        Hand::Right => thumb.0 < pinky.0 || thumb.1 < pinky.1,
        Hand::Left => thumb.0 > pinky.0 || thumb.1 < pinky.1,
    };
    !ok
}

/// The extreme form of the thumb-pinky violation: both the column and row
/// sub-conditions fail, i.e. the thumb sits above *and* outside the pinky.
pub fn thumb_pinky_extreme(hand: Hand, thumb: Point, pinky: Point) -> bool {
    let column_bad = match hand {
        Hand::Right => thumb.0 >= pinky.0,
        Hand::Left => thumb.0 <= pinky.0,
    };
    let row_bad = thumb.1 >= pinky.1;
    column_bad && row_bad
}

fn index_pinky_violated(hand: Hand, index: Point, pinky: Point, overlap: f32) -> bool {
    let ok = match hand {
        Hand::Right => index.0 >= pinky.0 - overlap,
        Hand::Left => index.0 <= pinky.0 + overlap,
    };
    !ok
}

fn ordered_sequence_violated(hand: Hand, a: Point, b: Point, overlap: f32) -> bool {
    let ok = match hand {
        Hand::Right => a.0 < b.0 + overlap,
        Hand::Left => a.0 > b.0 - overlap,
    };
    !ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pads(coords: &[(u8, u8)]) -> Vec<Pad> {
        coords.iter().map(|&(row, col)| Pad::new(row, col)).collect()
    }

    #[test]
    fn single_pad_always_has_a_grip() {
        let grips = valid_grips(&pads(&[(4, 0)]), Hand::Left);
        assert!(!grips.is_empty());
        assert_eq!(grips[0].assignment.len(), 1);
    }

    #[test]
    fn grips_are_collision_free() {
        let grips = valid_grips(&pads(&[(4, 0), (4, 2), (4, 4)]), Hand::Right);
        for grip in &grips {
            for i in 0..grip.assignment.len() {
                for j in (i + 1)..grip.assignment.len() {
                    assert!(distance(grip.assignment[i].1, grip.assignment[j].1) > 0.0);
                }
            }
        }
    }

    #[test]
    fn duplicate_pad_chord_falls_through_to_fallback() {
        let grips = valid_grips(&pads(&[(4, 0), (4, 0)]), Hand::Right);
        assert_eq!(grips.len(), 1);
        assert_eq!(grips[0].tier, GripTier::Fallback);
    }

    #[test]
    fn empty_or_oversized_chord_returns_empty() {
        assert!(valid_grips(&[], Hand::Left).is_empty());
        assert!(valid_grips(&pads(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]), Hand::Left).is_empty());
    }

    #[test]
    fn strict_tier_grips_satisfy_topology() {
        let grips = valid_grips(&pads(&[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4)]), Hand::Right);
        if let Some(strict) = grips.iter().find(|g| g.tier == GripTier::Strict) {
            let bounds = tier_bounds(GripTier::Strict);
            assert_eq!(topology_violation_count(Hand::Right, &strict.assignment, &bounds), 0);
        }
    }
}
