//! Beam search over a per-moment state graph (§4.4.1).

use crate::consts::{BEAM_MOMENT_EPSILON, FALLBACK_GRIP_PENALTY};
use crate::cost::{attractor_cost, breakdown_average, drift_cost, grip_stretch_cost, transition_cost};
use crate::fatigue::FatigueState;
use crate::feasibility::valid_grips;
use crate::geometry::{neutral_reference, pad_point};
use crate::solver::SolveInput;
use crate::stickiness::StickinessLedger;
use clap::Args;
use padforge_protocol::{
    CostBreakdown, DebugEvent, Difficulty, Finger, Hand, ManualAssignment, Pad, SolverResult,
};
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct BeamParams {
    #[arg(long, default_value_t = crate::consts::DEFAULT_BEAM_WIDTH)]
    pub beam_width: usize,
}

impl Default for BeamParams {
    fn default() -> Self {
        Self {
            beam_width: crate::consts::DEFAULT_BEAM_WIDTH,
        }
    }
}

/// One event folded into its co-moment group, carrying its resolved pad.
struct MomentGroup {
    event_indices: Vec<usize>,
    pads: Vec<Pad>,
    start_time: f64,
}

fn group_moments(input: &SolveInput, unplayable: &mut Vec<usize>) -> Vec<MomentGroup> {
    let sorted = input.performance.sorted_indices();
    let mut groups: Vec<MomentGroup> = Vec::new();

    for idx in sorted {
        let event = &input.performance.events[idx];
        let Some(pad) = input.resolve_pitch(event.pitch) else {
            unplayable.push(idx);
            continue;
        };
        match groups.last_mut() {
            Some(g) if (event.start_time - g.start_time).abs() <= BEAM_MOMENT_EPSILON => {
                g.event_indices.push(idx);
                g.pads.push(pad);
            }
            _ => groups.push(MomentGroup {
                event_indices: vec![idx],
                pads: vec![pad],
                start_time: event.start_time,
            }),
        }
    }
    groups
}

/// One step of the search: both hands' poses after processing some prefix of
/// moment groups, its accumulated cost, and an arena index back to the node
/// it extends.
#[derive(Clone)]
struct BeamNode {
    left_centroid: (f32, f32),
    right_centroid: (f32, f32),
    total_cost: f32,
    parent: Option<usize>,
    /// (event_index, hand, finger, pad, breakdown) assigned at this step.
    assignments: Vec<(usize, Hand, Finger, Pad, CostBreakdown)>,
    depth: usize,
    /// Recency map from pitch to (finger, last-use-time), threaded forward
    /// along this path (§9's per-invocation replacement for a module-level
    /// `noteHistory` global).
    stickiness: StickinessLedger,
    /// Per-finger fatigue accumulated/decayed along this path.
    fatigue: FatigueState,
}

/// Decays `hand`'s fatigue by `dt`, then records every finger use this
/// group assigned to `hand` into `stickiness`/`fatigue`. Applied once per
/// committed child, after a candidate's cost has already been computed
/// against the *parent's* state.
fn commit_state(
    input: &SolveInput,
    stickiness: &mut StickinessLedger,
    fatigue: &mut FatigueState,
    hand: Hand,
    dt: f64,
    timestamp: f64,
    assignments: &[(usize, Hand, Finger, Pad, CostBreakdown)],
) {
    fatigue.decay_only(hand, dt);
    for &(event_index, assigned_hand, finger, _, _) in assignments {
        if assigned_hand != hand {
            continue;
        }
        let pitch = input.performance.events[event_index].pitch;
        stickiness.record(pitch, finger, timestamp);
        fatigue.apply_use(hand, finger, 0.0);
    }
}

fn resting_centroid(input: &SolveInput, hand: Hand) -> (f32, f32) {
    match hand {
        Hand::Left => input.engine_config.resting_pose.left.centroid,
        Hand::Right => input.engine_config.resting_pose.right.centroid,
    }
}

fn manual_override_for(input: &SolveInput, event_indices: &[usize]) -> Option<ManualAssignment> {
    event_indices
        .iter()
        .find_map(|idx| input.manual_assignments.get(idx))
        .copied()
}

/// Builds a `(assignments, cost, is_fallback)` candidate for `group` on a
/// single hand, given the grip generator's output for that hand.
fn single_hand_candidate(
    input: &SolveInput,
    group: &MomentGroup,
    hand: Hand,
    prev_centroid: (f32, f32),
    dt: f64,
    is_first_group: bool,
    manual: Option<ManualAssignment>,
    stickiness: &StickinessLedger,
    fatigue: &FatigueState,
) -> Option<(Vec<(usize, Hand, Finger, Pad, CostBreakdown)>, f32, (f32, f32))> {
    let grips = valid_grips(&group.pads, hand);
    if grips.is_empty() {
        return None;
    }
    if matches!(manual, Some(m) if m.hand != hand) {
        return None;
    }

    let mut candidates: Vec<_> = match manual {
        Some(m) if m.hand == hand => {
            let matching: Vec<_> = grips
                .iter()
                .filter(|g| g.assignment.iter().any(|(f, _, _)| *f == m.finger))
                .cloned()
                .collect();
            if matching.is_empty() {
                grips
            } else {
                matching
            }
        }
        _ => grips,
    };
    // intrinsic ordering: stable order the generator returned them in.
    candidates.sort_by(|a, b| a.max_pairwise_span().partial_cmp(&b.max_pairwise_span()).unwrap());

    let grip = candidates.into_iter().next()?;
    let transition = transition_cost(prev_centroid, grip.centroid, dt);
    if transition.is_infinite() && !is_first_group && !grip.is_fallback() {
        return None;
    }

    let neutral = neutral_reference(input.engine_config, hand, |p| input.resolve_pitch(p));
    let attractor = attractor_cost(grip.centroid, resting_centroid(input, hand), input.engine_config.stiffness);
    let stretch = grip_stretch_cost(grip.max_pairwise_span(), neutral.comfortable_span);
    let fallback_penalty = if grip.is_fallback() { FALLBACK_GRIP_PENALTY } else { 0.0 };
    let drift = drift_cost(grip.centroid, neutral.center);

    let total = if transition.is_infinite() {
        f32::INFINITY
    } else {
        transition + attractor + stretch + fallback_penalty
    };

    let per_note = total / group.pads.len() as f32;
    let crossover = crate::cost::crossover_cost(hand, &grip.assignment);

    // Preview-only state: mirrors what `commit_state` will apply to the
    // chosen child, so each note's bounce/fatigue cost reflects this
    // candidate without mutating the path state before it is selected.
    let mut preview_fatigue = *fatigue;
    preview_fatigue.decay_only(hand, dt);

    let assignments = grip
        .assignment
        .iter()
        .map(|(finger, _point, chord_index)| {
            let event_index = group.event_indices[*chord_index];
            let pitch = input.performance.events[event_index].pitch;
            let bounce = stickiness.penalty(pitch, *finger, group.start_time);
            preview_fatigue.apply_use(hand, *finger, 0.0);
            let fatigue_load = preview_fatigue.get(hand, *finger);
            let breakdown = CostBreakdown {
                stretch,
                crossover,
                drift,
                bounce,
                fatigue: fatigue_load,
                total: per_note,
                ..Default::default()
            };
            (event_index, hand, *finger, group.pads[*chord_index], breakdown)
        })
        .collect();

    Some((assignments, total, grip.centroid))
}

/// Expands one node over one moment group, producing every candidate child
/// (single-hand on each hand, plus split-hand when the group has ≥2 pads).
fn expand(
    input: &SolveInput,
    node: &BeamNode,
    node_idx: usize,
    group: &MomentGroup,
    prev_timestamp: Option<f64>,
    is_first: bool,
) -> Vec<BeamNode> {
    let dt = match prev_timestamp {
        None => 1.0,
        Some(prev) => (group.start_time - prev).max(0.0),
    };
    let manual = manual_override_for(input, &group.event_indices);

    let mut children = Vec::new();

    for hand in [Hand::Left, Hand::Right] {
        let prev = match hand {
            Hand::Left => node.left_centroid,
            Hand::Right => node.right_centroid,
        };
        if let Some((assignments, cost, centroid)) =
            single_hand_candidate(input, group, hand, prev, dt, is_first, manual, &node.stickiness, &node.fatigue)
        {
            let mut child = node.clone();
            child.parent = Some(node_idx);
            child.total_cost = node.total_cost + cost;
            commit_state(input, &mut child.stickiness, &mut child.fatigue, hand, dt, group.start_time, &assignments);
            child.assignments = assignments;
            child.depth = node.depth + 1;
            match hand {
                Hand::Left => child.left_centroid = centroid,
                Hand::Right => child.right_centroid = centroid,
            }
            children.push(child);
        }
    }

    if group.pads.len() >= 2 {
        let mut by_col: Vec<usize> = (0..group.pads.len()).collect();
        by_col.sort_by_key(|&i| group.pads[i].col);
        let mid = by_col.len() / 2;
        let (left_half, right_half) = by_col.split_at(mid);

        let left_group = MomentGroup {
            event_indices: left_half.iter().map(|&i| group.event_indices[i]).collect(),
            pads: left_half.iter().map(|&i| group.pads[i]).collect(),
            start_time: group.start_time,
        };
        let right_group = MomentGroup {
            event_indices: right_half.iter().map(|&i| group.event_indices[i]).collect(),
            pads: right_half.iter().map(|&i| group.pads[i]).collect(),
            start_time: group.start_time,
        };

        if !left_group.pads.is_empty() && !right_group.pads.is_empty() {
            let left = single_hand_candidate(
                input, &left_group, Hand::Left, node.left_centroid, dt, is_first, manual, &node.stickiness, &node.fatigue,
            );
            let right = single_hand_candidate(
                input, &right_group, Hand::Right, node.right_centroid, dt, is_first, manual, &node.stickiness, &node.fatigue,
            );
            if let (Some((la, lc, lcentroid)), Some((ra, rc, rcentroid))) = (left, right) {
                if lc.is_finite() && rc.is_finite() {
                    let mut child = node.clone();
                    child.parent = Some(node_idx);
                    child.total_cost = node.total_cost + lc + rc;
                    commit_state(input, &mut child.stickiness, &mut child.fatigue, Hand::Left, dt, group.start_time, &la);
                    commit_state(input, &mut child.stickiness, &mut child.fatigue, Hand::Right, dt, group.start_time, &ra);
                    child.assignments = la.into_iter().chain(ra).collect();
                    child.depth = node.depth + 1;
                    child.left_centroid = lcentroid;
                    child.right_centroid = rcentroid;
                    children.push(child);
                }
            }
        }
    }

    children
}

/// Last-resort single-finger emergency placement when expansion produced no
/// children at all: nearer hand by column distance, index finger, plus
/// [`FALLBACK_GRIP_PENALTY`] per note.
fn emergency_expand(node: &BeamNode, node_idx: usize, group: &MomentGroup) -> BeamNode {
    let mut child = node.clone();
    child.parent = Some(node_idx);
    child.depth = node.depth + 1;

    let mut assignments = Vec::new();
    for (i, &pad) in group.pads.iter().enumerate() {
        let left_dist = (pad.col as f32 - 2.0).abs();
        let right_dist = (pad.col as f32 - 5.0).abs();
        let hand = if left_dist <= right_dist { Hand::Left } else { Hand::Right };
        let cost = FALLBACK_GRIP_PENALTY;
        child.total_cost += cost;
        assignments.push((
            group.event_indices[i],
            hand,
            Finger::Index,
            pad,
            CostBreakdown { total: cost, ..Default::default() },
        ));
        match hand {
            Hand::Left => child.left_centroid = pad_point(pad),
            Hand::Right => child.right_centroid = pad_point(pad),
        }
    }
    child.assignments = assignments;
    child
}

/// Runs beam search synchronously. This is the function every other solver
/// (genetic's fitness proxy aside, annealing's nested evaluation) delegates
/// fingering cost to.
pub fn solve(input: &SolveInput, params: &BeamParams) -> SolverResult {
    info!(
        "beam solve: {} events, beam_width={}",
        input.performance.events.len(),
        params.beam_width
    );
    let mut unplayable_events = Vec::new();
    let groups = group_moments(input, &mut unplayable_events);

    let mut arena: Vec<BeamNode> = vec![BeamNode {
        left_centroid: resting_centroid(input, Hand::Left),
        right_centroid: resting_centroid(input, Hand::Right),
        total_cost: 0.0,
        parent: None,
        assignments: Vec::new(),
        depth: 0,
        stickiness: StickinessLedger::new(),
        fatigue: FatigueState::new(),
    }];
    let mut frontier = vec![0usize];
    let mut prev_timestamp: Option<f64> = None;

    for (i, group) in groups.iter().enumerate() {
        let mut next_gen: Vec<BeamNode> = Vec::new();
        for &node_idx in &frontier {
            let node = arena[node_idx].clone();
            let children = expand(input, &node, node_idx, group, prev_timestamp, i == 0);
            if children.is_empty() {
                next_gen.push(emergency_expand(&node, node_idx, group));
            } else {
                next_gen.extend(children);
            }
        }
        next_gen.sort_by(|a, b| a.total_cost.partial_cmp(&b.total_cost).unwrap());
        next_gen.truncate(params.beam_width.max(1));

        let base = arena.len();
        frontier = (0..next_gen.len()).map(|k| base + k).collect();
        arena.extend(next_gen);
        prev_timestamp = Some(group.start_time);
    }

    let best_idx = frontier
        .iter()
        .min_by(|&&a, &&b| arena[a].total_cost.partial_cmp(&arena[b].total_cost).unwrap())
        .copied();

    let mut per_event: std::collections::HashMap<usize, (Hand, Finger, Pad, CostBreakdown)> =
        std::collections::HashMap::new();
    if let Some(mut idx) = best_idx {
        loop {
            for &(event_index, hand, finger, pad, breakdown) in &arena[idx].assignments {
                per_event.insert(event_index, (hand, finger, pad, breakdown));
            }
            match arena[idx].parent {
                Some(p) => idx = p,
                None => break,
            }
        }
    }

    let final_fatigue = best_idx.map(|idx| arena[idx].fatigue).unwrap_or_default();
    let result = build_result(input, &per_event, &unplayable_events, &final_fatigue);
    info!(
        "beam solve done: score={} hard={} unplayable={}",
        result.score, result.hard_count, result.unplayable_count
    );
    result
}

fn build_result(
    input: &SolveInput,
    per_event: &std::collections::HashMap<usize, (Hand, Finger, Pad, CostBreakdown)>,
    unplayable_events: &[usize],
    final_fatigue: &FatigueState,
) -> SolverResult {
    let mut debug_events = Vec::with_capacity(input.performance.events.len());
    let mut hard_count = 0usize;
    let mut unplayable_count = unplayable_events.len();
    let mut finger_usage: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    let mut breakdowns = Vec::new();
    let mut drifts = Vec::new();

    for (idx, event) in input.performance.events.iter().enumerate() {
        if let Some(&(hand, finger, pad, breakdown)) = per_event.get(&idx) {
            let difficulty = Difficulty::classify(breakdown.total);
            if difficulty == Difficulty::Hard {
                hard_count += 1;
            }
            *finger_usage.entry(hand.usage_key(finger)).or_insert(0) += 1;
            drifts.push(breakdown.drift);
            breakdowns.push(breakdown);
            debug_events.push(DebugEvent {
                pitch: event.pitch,
                start_time: event.start_time,
                hand: Some(hand),
                finger: Some(finger),
                total_cost: breakdown.total,
                breakdown: Some(breakdown),
                difficulty,
                row: Some(pad.row),
                col: Some(pad.col),
            });
        } else {
            unplayable_count += 1;
            debug_events.push(DebugEvent {
                pitch: event.pitch,
                start_time: event.start_time,
                hand: None,
                finger: None,
                total_cost: f32::INFINITY,
                breakdown: None,
                difficulty: Difficulty::Unplayable,
                row: None,
                col: None,
            });
        }
    }

    debug_events.sort_by(|a, b| a.start_time.partial_cmp(&b.start_time).unwrap());

    let average_drift = if drifts.is_empty() { 0.0 } else { drifts.iter().sum::<f32>() / drifts.len() as f32 };

    SolverResult {
        score: SolverResult::score_from_counts(hard_count, unplayable_count),
        unplayable_count,
        hard_count,
        debug_events,
        finger_usage_stats: finger_usage,
        fatigue_map: final_fatigue.fatigue_map(),
        average_drift,
        average_metrics: breakdown_average(&breakdowns),
        evolution_log: None,
        optimization_log: None,
        annealing_trace: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padforge_protocol::{EngineConfig, InstrumentConfig, ManualAssignments, NoteEvent, Performance};

    fn base_input() -> (Performance, InstrumentConfig, EngineConfig, ManualAssignments) {
        let performance = Performance {
            tempo: 120.0,
            name: None,
            events: vec![NoteEvent { pitch: 36, start_time: 0.0, duration: 0.25 }],
        };
        (performance, InstrumentConfig::default(), EngineConfig::default(), ManualAssignments::new())
    }

    #[test]
    fn single_note_resolves_to_a_playable_grip() {
        let (performance, instrument, engine_config, manual) = base_input();
        let input = SolveInput {
            performance: &performance,
            instrument: &instrument,
            layout: None,
            engine_config: &engine_config,
            manual_assignments: &manual,
        };
        let result = solve(&input, &BeamParams::default());
        assert_eq!(result.unplayable_count, 0);
        assert_eq!(result.debug_events.len(), 1);
        assert!(result.debug_events[0].hand.is_some());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn repeated_finger_replay_accrues_fatigue_and_bounce() {
        let performance = Performance {
            tempo: 120.0,
            name: None,
            events: vec![
                NoteEvent { pitch: 36, start_time: 0.0, duration: 0.1 },
                NoteEvent { pitch: 36, start_time: 0.1, duration: 0.1 },
                NoteEvent { pitch: 36, start_time: 0.2, duration: 0.1 },
            ],
        };
        let instrument = InstrumentConfig::default();
        let engine_config = EngineConfig::default();
        let manual = ManualAssignments::new();
        let input = SolveInput {
            performance: &performance,
            instrument: &instrument,
            layout: None,
            engine_config: &engine_config,
            manual_assignments: &manual,
        };
        let result = solve(&input, &BeamParams::default());
        assert!(!result.fatigue_map.is_empty());
        let played_finger_fatigue: f32 = result.fatigue_map.values().copied().sum();
        assert!(played_finger_fatigue > 0.0);
    }

    #[test]
    fn unresolvable_pitch_is_marked_unplayable() {
        let mut performance = Performance { tempo: 120.0, name: None, events: vec![] };
        performance.events.push(NoteEvent { pitch: 0, start_time: 0.0, duration: 0.25 });
        let instrument = InstrumentConfig::default();
        let engine_config = EngineConfig::default();
        let manual = ManualAssignments::new();
        let input = SolveInput {
            performance: &performance,
            instrument: &instrument,
            layout: None,
            engine_config: &engine_config,
            manual_assignments: &manual,
        };
        let result = solve(&input, &BeamParams::default());
        assert_eq!(result.unplayable_count, 1);
        assert_eq!(result.debug_events[0].difficulty, Difficulty::Unplayable);
    }
}
