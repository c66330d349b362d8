//! Property-based coverage of the universally-quantified invariants from §8.

mod common;

use common::performance_of;
use padforge_core::consts::MAX_HAND_SPEED;
use padforge_core::event_analyzer::group_moments;
use padforge_core::feasibility::valid_grips;
use padforge_core::solver::beam::{self, BeamParams};
use padforge_core::solver::SolveInput;
use padforge_protocol::{Difficulty, EngineConfig, Hand, InstrumentConfig, ManualAssignments, Pad};
use proptest::prelude::*;

fn arb_pitch() -> impl Strategy<Value = u8> {
    0u8..128u8
}

fn arb_event() -> impl Strategy<Value = (u8, f64, f64)> {
    (arb_pitch(), 0u32..20u32, 1u32..5u32)
        .prop_map(|(pitch, start, dur)| (pitch, start as f64 * 0.1, dur as f64 * 0.05))
}

proptest! {
    #[test]
    fn debug_event_count_always_matches_input_event_count(events in proptest::collection::vec(arb_event(), 0..8)) {
        let performance = performance_of(&events);
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
        let result = beam::solve(&input, &BeamParams::default());
        prop_assert_eq!(result.debug_events.len(), events.len());
    }

    #[test]
    fn unplayable_count_matches_unplayable_debug_events(events in proptest::collection::vec(arb_event(), 0..8)) {
        let performance = performance_of(&events);
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
        let result = beam::solve(&input, &BeamParams::default());
        let counted = result.debug_events.iter().filter(|e| e.difficulty == Difficulty::Unplayable).count();
        prop_assert_eq!(counted, result.unplayable_count);
    }

    #[test]
    fn score_is_always_in_range(events in proptest::collection::vec(arb_event(), 0..8)) {
        let performance = performance_of(&events);
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
        let result = beam::solve(&input, &BeamParams::default());
        prop_assert!(result.score <= 100);
    }

    #[test]
    fn placed_notes_never_exceed_max_hand_speed_unless_fallback(events in proptest::collection::vec(arb_event(), 2..6)) {
        let performance = performance_of(&events);
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
        let result = beam::solve(&input, &BeamParams::default());
        let moments = group_moments(&result.debug_events);
        for window in moments.windows(2) {
            let dt = (window[1].timestamp - window[0].timestamp).max(1e-6);
            for hand in [Hand::Left, Hand::Right] {
                let prev = window[0].notes.iter().filter(|n| n.hand == hand);
                let curr: Vec<_> = window[1].notes.iter().filter(|n| n.hand == hand).collect();
                if let (Some(p), Some(c)) = (prev.last(), curr.first()) {
                    let d = (((c.pad.row as f32 - p.pad.row as f32).powi(2)
                        + (c.pad.col as f32 - p.pad.col as f32).powi(2)) as f32)
                        .sqrt();
                    let speed = d / dt as f32;
                    // Fallback-tier grips can legitimately exceed the speed
                    // bound (§4.4.1): they exist precisely to guarantee a
                    // result when no feasible grip fits, not to honor it.
                    if c.composite_difficulty < 1.0 {
                        prop_assert!(speed <= MAX_HAND_SPEED * 4.0);
                    }
                }
            }
        }
    }

    #[test]
    fn valid_grips_are_never_empty_for_chords_up_to_five(
        n in 1usize..6usize,
        hand in prop_oneof![Just(Hand::Left), Just(Hand::Right)],
    ) {
        let pads: Vec<Pad> = (0..n as u8).map(|i| Pad::new(4, i)).collect();
        let grips = valid_grips(&pads, hand);
        prop_assert!(!grips.is_empty());
    }

    #[test]
    fn event_moments_are_a_total_disjoint_partition(events in proptest::collection::vec(arb_event(), 0..8)) {
        let performance = performance_of(&events);
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
        let result = beam::solve(&input, &BeamParams::default());
        let moments = group_moments(&result.debug_events);

        let placed_total: usize = result.debug_events.iter().filter(|e| e.hand.is_some()).count();
        let grouped_total: usize = moments.iter().map(|m| m.notes.len()).sum();
        prop_assert_eq!(placed_total, grouped_total);

        for window in moments.windows(2) {
            prop_assert!(window[1].timestamp >= window[0].timestamp);
        }
    }
}

#[test]
fn empty_performance_scores_perfectly_with_no_debug_events() {
    let performance = performance_of(&[]);
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
    let result = beam::solve(&input, &BeamParams::default());
    assert_eq!(result.score, 100);
    assert!(result.debug_events.is_empty());
    assert!(result.evolution_log.is_none());
    assert!(result.annealing_trace.is_none());
}

#[test]
fn chord_of_two_notes_on_the_same_pad_falls_back() {
    let instrument = InstrumentConfig::default();
    // A unison chord: both events resolve to the same pad, so the grip
    // generator sees a duplicate-pad chord and falls through to the
    // fallback tier (there is no strict/relaxed placement for a collision).
    let performance = performance_of(&[(instrument.bottom_left_pitch, 0.0, 0.1), (instrument.bottom_left_pitch, 0.0, 0.1)]);
    let engine_config = EngineConfig::default();
    let manual = ManualAssignments::new();
    let input = SolveInput {
        performance: &performance,
        instrument: &instrument,
        layout: None,
        engine_config: &engine_config,
        manual_assignments: &manual,
    };
    let result = beam::solve(&input, &BeamParams::default());
    assert_eq!(result.debug_events.len(), 2);
    assert!(result.debug_events.iter().all(|e| e.hand.is_some()));
}

#[test]
fn zero_time_delta_between_chord_notes_has_zero_transition_cost() {
    use padforge_core::cost::transition_cost;
    let cost = transition_cost((1.0, 1.0), (1.0, 1.0), 0.0);
    assert_eq!(cost, 0.0);
}

#[rstest::rstest]
fn a_single_note_against_shared_fixtures(
    #[from(common::instrument)] instrument: InstrumentConfig,
    #[from(common::engine_config)] engine_config: EngineConfig,
    #[from(common::manual_assignments)] manual_assignments: ManualAssignments,
) {
    let performance = performance_of(&[(instrument.bottom_left_pitch, 0.0, 0.25)]);
    let input = SolveInput {
        performance: &performance,
        instrument: &instrument,
        layout: None,
        engine_config: &engine_config,
        manual_assignments: &manual_assignments,
    };
    let result = beam::solve(&input, &BeamParams::default());
    assert_eq!(result.unplayable_count, 0);
}

#[rstest::rstest]
fn an_empty_performance_fixture_is_always_trivially_solvable(
    #[from(common::empty_performance)] performance: padforge_protocol::Performance,
    #[from(common::instrument)] instrument: InstrumentConfig,
    #[from(common::engine_config)] engine_config: EngineConfig,
    #[from(common::manual_assignments)] manual_assignments: ManualAssignments,
) {
    let input = SolveInput {
        performance: &performance,
        instrument: &instrument,
        layout: None,
        engine_config: &engine_config,
        manual_assignments: &manual_assignments,
    };
    let result = beam::solve(&input, &BeamParams::default());
    assert_eq!(result.score, 100);
}
