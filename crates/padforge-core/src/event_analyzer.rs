//! Turns a solver's flat `debugEvents` list into moment-grouped analyzed
//! events with per-moment and per-transition metrics (§4.5).

use crate::consts::{ANALYZER_MOMENT_EPSILON, MAX_REACH};
use padforge_protocol::{CostBreakdown, DebugEvent, Difficulty, Finger, Hand, Pad};
use std::collections::BTreeSet;

fn home_of(hand: Hand) -> (f32, f32) {
    match hand {
        Hand::Left => (0.0, 1.0),
        Hand::Right => (0.0, 5.0),
    }
}

fn pad_distance(a: Pad, b: Pad) -> f32 {
    let dx = a.col as f32 - b.col as f32;
    let dy = a.row as f32 - b.row as f32;
    (dx * dx + dy * dy).sqrt()
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// One note inside an analyzed moment, carrying just enough of its source
/// `DebugEvent` to drive onion-skin and transition computation.
#[derive(Debug, Clone)]
pub struct MomentNote {
    pub pitch: u8,
    pub hand: Hand,
    pub finger: Finger,
    pub pad: Pad,
    pub anatomical_stretch: f32,
    pub composite_difficulty: f32,
}

#[derive(Debug, Clone, Default)]
pub struct MomentMetrics {
    pub polyphony: usize,
    pub spread_x: f32,
    pub spread_y: f32,
    pub anatomical_stretch: f32,
    pub composite_difficulty: f32,
}

#[derive(Debug, Clone)]
pub struct AnalyzedMoment {
    pub event_index: usize,
    pub timestamp: f64,
    pub notes: Vec<MomentNote>,
    pub pad_keys: Vec<String>,
    pub metrics: MomentMetrics,
}

#[derive(Debug, Clone)]
pub struct FingerMove {
    pub hand: Hand,
    pub finger: Finger,
    pub from_pad: Option<Pad>,
    pub to_pad: Pad,
    pub is_hold: bool,
    pub raw_distance: Option<f32>,
    pub is_impossible: bool,
}

#[derive(Debug, Clone)]
pub struct OnionSkin {
    pub shared_pads: BTreeSet<String>,
    pub current_only_pads: BTreeSet<String>,
    pub next_only_pads: BTreeSet<String>,
    pub finger_moves: Vec<FingerMove>,
}

#[derive(Debug, Clone)]
pub struct TransitionMetrics {
    pub time_delta_ms: f64,
    pub grid_distance: f32,
    pub hand_switch: bool,
    pub finger_change: bool,
    pub speed_pressure: f32,
    pub anatomical_stretch_score: f32,
    pub composite_difficulty_score: f32,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub from_index: usize,
    pub to_index: usize,
    pub metrics: TransitionMetrics,
}

/// Per-note anatomical stretch (§4.5): 1.0 if unplayable, else the
/// breakdown's stretch bucket when present, else distance from the hand's
/// home pad.
pub fn per_note_stretch(event: &DebugEvent) -> f32 {
    if event.difficulty == Difficulty::Unplayable {
        return 1.0;
    }
    if let Some(breakdown) = &event.breakdown {
        return clamp01(breakdown.stretch / 10.0);
    }
    match (event.hand, event.row, event.col) {
        (Some(hand), Some(row), Some(col)) => {
            let home = home_of(hand);
            let pad = Pad::new(row, col);
            let d = pad_distance(pad, Pad::new(home.0 as u8, home.1 as u8));
            clamp01(d / MAX_REACH)
        }
        _ => 1.0,
    }
}

/// Per-note composite difficulty (§4.5).
pub fn per_note_composite(event: &DebugEvent) -> f32 {
    let base = match event.difficulty {
        Difficulty::Unplayable => 1.0,
        Difficulty::Hard => 0.7,
        Difficulty::Medium => 0.4,
        Difficulty::Easy => 0.1,
    };
    let mut score = base + clamp01(event.total_cost / 20.0) * 0.2 + per_note_stretch(event) * 0.1;
    if let Some(b) = &event.breakdown {
        score += 0.05 * clamp01(b.movement / 10.0)
            + 0.03 * clamp01(b.fatigue / 5.0)
            + 0.02 * clamp01(b.crossover / 20.0);
    }
    clamp01(score)
}

/// Groups debug events (already in time order) into moments within
/// [`ANALYZER_MOMENT_EPSILON`], dropping any event without a finalized pad.
pub fn group_moments(events: &[DebugEvent]) -> Vec<AnalyzedMoment> {
    let mut moments = Vec::new();
    let mut current: Vec<&DebugEvent> = Vec::new();
    let mut current_start: f64 = 0.0;

    let flush = |group: &mut Vec<&DebugEvent>, start: f64, moments: &mut Vec<AnalyzedMoment>| {
        if group.is_empty() {
            return;
        }
        let event_index = moments.len();
        let notes: Vec<MomentNote> = group
            .iter()
            .filter_map(|e| {
                let (hand, finger, row, col) = (e.hand?, e.finger?, e.row?, e.col?);
                Some(MomentNote {
                    pitch: e.pitch,
                    hand,
                    finger,
                    pad: Pad::new(row, col),
                    anatomical_stretch: per_note_stretch(e),
                    composite_difficulty: per_note_composite(e),
                })
            })
            .collect();
        let pad_keys: Vec<String> = notes.iter().map(|n| n.pad.key()).collect();

        let mut metrics = MomentMetrics {
            polyphony: notes.len(),
            ..Default::default()
        };
        if notes.len() > 1 {
            let cols: Vec<f32> = notes.iter().map(|n| n.pad.col as f32).collect();
            let rows: Vec<f32> = notes.iter().map(|n| n.pad.row as f32).collect();
            metrics.spread_x = cols.iter().cloned().fold(f32::MIN, f32::max)
                - cols.iter().cloned().fold(f32::MAX, f32::min);
            metrics.spread_y = rows.iter().cloned().fold(f32::MIN, f32::max)
                - rows.iter().cloned().fold(f32::MAX, f32::min);
        }
        metrics.anatomical_stretch = notes
            .iter()
            .map(|n| n.anatomical_stretch)
            .fold(0.0, f32::max);
        metrics.composite_difficulty = notes
            .iter()
            .map(|n| n.composite_difficulty)
            .fold(0.0, f32::max);

        moments.push(AnalyzedMoment {
            event_index,
            timestamp: start,
            notes,
            pad_keys,
            metrics,
        });
        group.clear();
    };

    for event in events {
        if event.row.is_none() || event.col.is_none() {
            continue;
        }
        if current.is_empty() {
            current_start = event.start_time;
        } else if (event.start_time - current_start).abs() > ANALYZER_MOMENT_EPSILON {
            flush(&mut current, current_start, &mut moments);
            current_start = event.start_time;
        }
        current.push(event);
    }
    flush(&mut current, current_start, &mut moments);

    moments
}

/// Builds the onion-skin view focused on `index`, or `None` if out of range.
pub fn onion_skin(moments: &[AnalyzedMoment], index: usize) -> Option<OnionSkin> {
    let current = moments.get(index)?;
    let next = moments.get(index + 1)?;

    let current_keys: BTreeSet<String> = current.pad_keys.iter().cloned().collect();
    let next_keys: BTreeSet<String> = next.pad_keys.iter().cloned().collect();

    let shared_pads: BTreeSet<String> = current_keys.intersection(&next_keys).cloned().collect();
    let current_only_pads: BTreeSet<String> = current_keys.difference(&next_keys).cloned().collect();
    let next_only_pads: BTreeSet<String> = next_keys.difference(&current_keys).cloned().collect();

    let finger_moves = next
        .notes
        .iter()
        .map(|next_note| {
            let from = current
                .notes
                .iter()
                .find(|n| n.hand == next_note.hand && n.finger == next_note.finger);
            let from_pad = from.map(|n| n.pad);
            let to_pad = next_note.pad;
            let is_hold = from_pad == Some(to_pad);
            let raw_distance = from_pad.map(|f| pad_distance(f, to_pad));
            let is_impossible = raw_distance.map(|d| d > MAX_REACH).unwrap_or(false);
            FingerMove {
                hand: next_note.hand,
                finger: next_note.finger,
                from_pad,
                to_pad,
                is_hold,
                raw_distance,
                is_impossible,
            }
        })
        .collect();

    Some(OnionSkin {
        shared_pads,
        current_only_pads,
        next_only_pads,
        finger_moves,
    })
}

fn centroid(notes: &[MomentNote]) -> Option<(f32, f32)> {
    if notes.is_empty() {
        return None;
    }
    let n = notes.len() as f32;
    let (sx, sy) = notes
        .iter()
        .fold((0.0, 0.0), |(sx, sy), note| (sx + note.pad.col as f32, sy + note.pad.row as f32));
    Some((sx / n, sy / n))
}

/// Computes one `Transition` per consecutive moment pair.
pub fn transitions(moments: &[AnalyzedMoment]) -> Vec<Transition> {
    moments
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (from, to) = (&pair[0], &pair[1]);
            let time_delta_ms = (to.timestamp - from.timestamp) * 1000.0;
            let grid_distance = match (centroid(&from.notes), centroid(&to.notes)) {
                (Some(a), Some(b)) => {
                    let dx = a.0 - b.0;
                    let dy = a.1 - b.1;
                    (dx * dx + dy * dy).sqrt()
                }
                _ => 0.0,
            };
            let from_hands: BTreeSet<Hand> = from.notes.iter().map(|n| n.hand).collect();
            let to_hands: BTreeSet<Hand> = to.notes.iter().map(|n| n.hand).collect();
            let hand_switch = !from_hands.is_empty() && !to_hands.is_empty() && from_hands != to_hands;

            let from_fingers: BTreeSet<(Hand, Finger)> =
                from.notes.iter().map(|n| (n.hand, n.finger)).collect();
            let to_fingers: BTreeSet<(Hand, Finger)> = to.notes.iter().map(|n| (n.hand, n.finger)).collect();
            let finger_change = from_fingers != to_fingers;

            let elapsed_secs = (time_delta_ms / 1000.0).max(ANALYZER_MOMENT_EPSILON);
            let speed_pressure = grid_distance / elapsed_secs as f32;

            Transition {
                from_index: i,
                to_index: i + 1,
                metrics: TransitionMetrics {
                    time_delta_ms,
                    grid_distance,
                    hand_switch,
                    finger_change,
                    speed_pressure,
                    anatomical_stretch_score: from.metrics.anatomical_stretch.max(to.metrics.anatomical_stretch),
                    composite_difficulty_score: from
                        .metrics
                        .composite_difficulty
                        .max(to.metrics.composite_difficulty),
                },
            }
        })
        .collect()
}
