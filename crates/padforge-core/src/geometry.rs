use crate::core_types::Point;
use padforge_protocol::{EngineConfig, Finger, Hand, Pad};
use tracing::warn;

pub fn distance(a: Point, b: Point) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

pub fn pad_point(pad: Pad) -> Point {
    (pad.col as f32, pad.row as f32)
}

/// Canonical spread synthesized around a hand's resting centroid when the
/// caller supplies no `neutral_home_pitches` (SPEC_FULL §3). Mirrors the
/// finger topology ordering (pinky..thumb by column) with one grid unit
/// between neighbors, mirrored for the left hand.
pub fn synthesized_neutral_spread(hand: Hand, centroid: Point) -> [Point; 5] {
    let (cx, cy) = centroid;
    let offsets: [f32; 5] = match hand {
        Hand::Right => [-2.0, -1.0, 0.0, 1.0, 1.5],
        Hand::Left => [2.0, 1.0, 0.0, -1.0, -1.5],
    };
    let mut points = [(0.0, 0.0); 5];
    for finger in Finger::ALL {
        let slot = finger.slot();
        points[slot] = (cx + offsets[slot], cy);
    }
    points
}

/// Resolves the comfortable-span and neutral-center inputs used by the cost
/// model for one hand, falling back to the synthesized spread when the
/// engine config carries no neutral home pitches for that hand.
pub struct NeutralReference {
    pub comfortable_span: f32,
    pub center: Point,
    pub per_finger: [Option<Point>; 5],
}

pub fn neutral_reference(
    config: &EngineConfig,
    hand: Hand,
    resolve_pitch: impl Fn(u8) -> Option<Pad>,
) -> NeutralReference {
    let resting_centroid = match hand {
        Hand::Left => config.resting_pose.left.centroid,
        Hand::Right => config.resting_pose.right.centroid,
    };

    let pitches = config
        .neutral_home_pitches
        .as_ref()
        .map(|n| match hand {
            Hand::Left => n.left,
            Hand::Right => n.right,
        });

    let mut per_finger = [None; 5];
    let mut any_resolved = false;
    if let Some(pitches) = pitches {
        for finger in Finger::ALL {
            if let Some(pitch) = pitches[finger.slot()] {
                if let Some(pad) = resolve_pitch(pitch) {
                    per_finger[finger.slot()] = Some(pad_point(pad));
                    any_resolved = true;
                }
            }
        }
    }

    if !any_resolved {
        warn!("no neutral home pitches configured for {:?}; synthesizing a spread around the resting centroid", hand);
        let synthesized = synthesized_neutral_spread(hand, resting_centroid);
        for finger in Finger::ALL {
            per_finger[finger.slot()] = Some(synthesized[finger.slot()]);
        }
    }

    let placed: Vec<Point> = per_finger.iter().filter_map(|p| *p).collect();
    let center = centroid_of(&placed).unwrap_or(resting_centroid);

    let comfortable_span = widest_pair_span(&placed).unwrap_or(crate::consts::DEFAULT_COMFORTABLE_SPAN);

    NeutralReference {
        comfortable_span,
        center,
        per_finger,
    }
}

pub fn centroid_of(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
    Some((sx / n, sy / n))
}

fn widest_pair_span(points: &[Point]) -> Option<f32> {
    if points.len() < 2 {
        return None;
    }
    let mut max = 0.0f32;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = distance(points[i], points[j]);
            if d > max {
                max = d;
            }
        }
    }
    Some(max)
}
