//! Reproducibility and elitism-monotonicity invariants (§8 round-trips/laws
//! and scenarios 5-6).

use padforge_core::solver::annealing::{self, AnnealingParams};
use padforge_core::solver::genetic::{self, GeneticParams};
use padforge_core::solver::SolveInput;
use padforge_protocol::{EngineConfig, GridMapping, InstrumentConfig, ManualAssignments, NoteEvent, Pad, Performance, Voice};

fn block_on<F: std::future::Future>(mut fut: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    fn clone(_: *const ()) -> RawWaker {
        raw()
    }
    fn no_op(_: *const ()) {}
    fn raw() -> RawWaker {
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }
    let waker = unsafe { Waker::from_raw(raw()) };
    let mut cx = Context::from_waker(&waker);
    let mut fut = unsafe { std::pin::Pin::new_unchecked(&mut fut) };
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}

fn small_performance() -> Performance {
    Performance {
        tempo: 120.0,
        name: None,
        events: vec![
            NoteEvent { pitch: 36, start_time: 0.0, duration: 0.25 },
            NoteEvent { pitch: 38, start_time: 0.5, duration: 0.25 },
            NoteEvent { pitch: 40, start_time: 1.0, duration: 0.25 },
        ],
    }
}

#[test]
fn genetic_replay_with_same_seed_is_byte_identical() {
    let performance = small_performance();
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
    let params = GeneticParams { population: 10, generations: 5, elitism: 2, ..GeneticParams::default() };

    let a = block_on(genetic::solve(&input, &params, Some(123)));
    let b = block_on(genetic::solve(&input, &params, Some(123)));

    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn genetic_evolution_log_best_is_monotone_non_increasing() {
    let performance = small_performance();
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
    let params = GeneticParams { population: 10, generations: 5, elitism: 2, ..GeneticParams::default() };

    let result = block_on(genetic::solve(&input, &params, Some(9)));
    let log = result.evolution_log.expect("genetic solver always records an evolution log");
    for pair in log.windows(2) {
        assert!(pair[1].best <= pair[0].best, "best cost must never regress between generations");
    }
}

fn sample_mapping() -> GridMapping {
    let mut mapping = GridMapping::default();
    mapping.set_voice(Pad::new(4, 0), Voice { id: "kick".into(), original_midi_note: 36, label: None, color: None });
    mapping.set_voice(Pad::new(4, 1), Voice { id: "snare".into(), original_midi_note: 38, label: None, color: None });
    mapping
}

#[test]
fn annealing_best_cost_is_monotone_non_increasing() {
    let performance = small_performance();
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
    let params = AnnealingParams { iterations: 30, ..AnnealingParams::default() };

    let outcome = block_on(annealing::solve(&input, sample_mapping(), &params, Some(42))).unwrap();
    let trace = outcome.result.annealing_trace.expect("annealing always records a trace");
    assert_eq!(trace.len(), 30);
    for pair in trace.windows(2) {
        assert!(pair[1].best_cost <= pair[0].best_cost);
    }
}

#[test]
fn annealing_with_empty_mapping_is_a_fatal_error() {
    let performance = small_performance();
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
    let params = AnnealingParams::default();

    let result = block_on(annealing::solve(&input, GridMapping::default(), &params, Some(1)));
    assert!(result.is_err());
}
