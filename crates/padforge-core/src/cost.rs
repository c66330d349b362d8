//! Pure cost functions (§4.3). Distances are Euclidean on grid coordinates;
//! every function here is side-effect free and takes its inputs by value.

use crate::consts::{
    CROSSOVER_PENALTY_WEIGHT, DRIFT_WEIGHT, MAX_HAND_SPEED, MAX_SPAN, MIN_TIME_DELTA,
    MOVEMENT_NEUTRAL_BIAS_WEIGHT, SPEED_COST_WEIGHT,
};
use crate::core_types::Point;
use crate::feasibility::{finger_point, thumb_pinky_extreme, thumb_pinky_violated};
use crate::geometry::distance;
use padforge_protocol::{CostBreakdown, Finger, Hand};

/// Fitts-style transition cost between two hand centroids. Returns
/// `f32::INFINITY` when the implied speed exceeds [`MAX_HAND_SPEED`].
pub fn transition_cost(prev_centroid: Point, curr_centroid: Point, dt: f64) -> f32 {
    if dt <= MIN_TIME_DELTA {
        return 0.0;
    }
    let d = distance(prev_centroid, curr_centroid);
    if d == 0.0 {
        return 0.0;
    }
    let speed = d / dt as f32;
    if speed > MAX_HAND_SPEED {
        return f32::INFINITY;
    }
    d + SPEED_COST_WEIGHT * speed
}

/// Linear spring pulling the hand centroid back toward its resting pose.
pub fn attractor_cost(curr_centroid: Point, resting_centroid: Point, stiffness: f32) -> f32 {
    distance(curr_centroid, resting_centroid) * stiffness
}

/// Penalizes a grip whose widest pairwise finger span exceeds the
/// comfortable span, growing quadratically toward `MAX_SPAN`.
pub fn grip_stretch_cost(span: f32, comfortable_span: f32) -> f32 {
    if span <= comfortable_span {
        return 0.0;
    }
    let denom = (MAX_SPAN - comfortable_span).max(f32::EPSILON);
    let e = ((span - comfortable_span) / denom).clamp(0.0, 1.0);
    10.0 * e * e
}

/// Per-finger movement cost: an activation charge the first time a finger is
/// placed, otherwise distance scaled by finger strength, plus an optional
/// small neutral-bias term pulling toward that finger's neutral pad.
pub fn movement_cost(
    previous: Option<Point>,
    current: Point,
    finger_weight: f32,
    neutral_pad: Option<Point>,
) -> f32 {
    let base = match previous {
        None => crate::consts::ACTIVATION_COST,
        Some(prev) => distance(prev, current) * finger_weight,
    };
    let bias = neutral_pad
        .map(|n| MOVEMENT_NEUTRAL_BIAS_WEIGHT * finger_weight * distance(current, n))
        .unwrap_or(0.0);
    base + bias
}

/// Distance from the center of gravity of placed fingers to the hand's
/// neutral home center.
pub fn drift_cost(center_of_gravity: Point, neutral_center: Point) -> f32 {
    distance(center_of_gravity, neutral_center) * DRIFT_WEIGHT
}

/// Sum of fixed penalties, one per violated topology rule, doubled for the
/// extreme thumb-above-and-outside-pinky violation.
pub fn crossover_cost(hand: Hand, placement: &[(Finger, Point, usize)]) -> f32 {
    let mut penalty = 0.0f32;

    if let (Some(thumb), Some(pinky)) = (
        finger_point(placement, Finger::Thumb),
        finger_point(placement, Finger::Pinky),
    ) {
        if thumb_pinky_violated(hand, thumb, pinky) {
            penalty += if thumb_pinky_extreme(hand, thumb, pinky) {
                CROSSOVER_PENALTY_WEIGHT * 2.0
            } else {
                CROSSOVER_PENALTY_WEIGHT
            };
        }
    }

    if let (Some(index), Some(pinky)) = (
        finger_point(placement, Finger::Index),
        finger_point(placement, Finger::Pinky),
    ) {
        let ok = match hand {
            Hand::Right => index.0 >= pinky.0,
            Hand::Left => index.0 <= pinky.0,
        };
        if !ok {
            penalty += CROSSOVER_PENALTY_WEIGHT;
        }
    }

    if let (Some(thumb), Some(middle)) = (
        finger_point(placement, Finger::Thumb),
        finger_point(placement, Finger::Middle),
    ) {
        if thumb.1 > middle.1 {
            penalty += CROSSOVER_PENALTY_WEIGHT;
        }
    }

    const SEQUENCE: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
    for pair in SEQUENCE.windows(2) {
        if let (Some(a), Some(b)) = (finger_point(placement, pair[0]), finger_point(placement, pair[1])) {
            let ok = match hand {
                Hand::Right => a.0 < b.0,
                Hand::Left => a.0 > b.0,
            };
            if !ok {
                penalty += CROSSOVER_PENALTY_WEIGHT;
            }
        }
    }

    penalty
}

/// transition + attractor + grip-stretch, or `f32::INFINITY` if transition
/// is infinite.
pub fn total_grip_cost(transition: f32, attractor: f32, grip_stretch: f32) -> f32 {
    if transition.is_infinite() {
        return f32::INFINITY;
    }
    transition + attractor + grip_stretch
}

pub fn breakdown_average(breakdowns: &[CostBreakdown]) -> CostBreakdown {
    if breakdowns.is_empty() {
        return CostBreakdown::default();
    }
    let mut sum = CostBreakdown::default();
    for b in breakdowns {
        sum.add(b);
    }
    sum.scaled(1.0 / breakdowns.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_is_zero_within_min_time_delta() {
        assert_eq!(transition_cost((0.0, 0.0), (5.0, 5.0), 0.0005), 0.0);
    }

    #[test]
    fn transition_is_infinite_above_speed_cap() {
        let cost = transition_cost((0.0, 0.0), (7.0, 7.0), 0.1);
        assert!(cost.is_infinite());
    }

    #[test]
    fn transition_below_cap_is_finite_and_positive() {
        let cost = transition_cost((0.0, 0.0), (1.0, 0.0), 1.0);
        assert!(cost.is_finite());
        assert!(cost > 0.0);
    }

    #[test]
    fn grip_stretch_is_zero_within_comfortable_span() {
        assert_eq!(grip_stretch_cost(1.5, 2.0), 0.0);
    }

    #[test]
    fn grip_stretch_grows_with_excess_span() {
        let moderate = grip_stretch_cost(3.0, 2.0);
        let severe = grip_stretch_cost(4.0, 2.0);
        assert!(severe >= moderate);
    }

    #[test]
    fn breakdown_average_divides_each_bucket() {
        let a = CostBreakdown { movement: 2.0, total: 4.0, ..Default::default() };
        let b = CostBreakdown { movement: 4.0, total: 8.0, ..Default::default() };
        let avg = breakdown_average(&[a, b]);
        assert_eq!(avg.movement, 3.0);
        assert_eq!(avg.total, 6.0);
    }
}
