//! Genetic algorithm over whole-sequence chromosomes (§4.4.2).

use crate::consts::{
    GENETIC_DEFAULT_ELITISM, GENETIC_DEFAULT_GENERATIONS, GENETIC_DEFAULT_MUTATION_RATE,
    GENETIC_DEFAULT_POPULATION, GENETIC_DEFAULT_TOURNAMENT_SIZE, GENETIC_FALLBACK_PENALTY,
    GENETIC_INFEASIBLE_TRANSITION_PENALTY, GENETIC_YIELD_EVERY,
};
use crate::cost::{attractor_cost, breakdown_average, grip_stretch_cost, transition_cost};
use crate::fatigue::FatigueState;
use crate::feasibility::valid_grips;
use crate::geometry::neutral_reference;
use crate::solver::SolveInput;
use crate::yield_now::yield_now;
use clap::Args;
use padforge_protocol::{
    CostBreakdown, DebugEvent, Difficulty, EvolutionGenerationRecord, Finger, Hand, Pad, SolverResult,
};
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct GeneticParams {
    #[arg(long, default_value_t = GENETIC_DEFAULT_POPULATION)]
    pub population: usize,
    #[arg(long, default_value_t = GENETIC_DEFAULT_GENERATIONS)]
    pub generations: usize,
    #[arg(long, default_value_t = GENETIC_DEFAULT_MUTATION_RATE)]
    pub mutation_rate: f32,
    #[arg(long, default_value_t = GENETIC_DEFAULT_TOURNAMENT_SIZE)]
    pub tournament_size: usize,
    #[arg(long, default_value_t = GENETIC_DEFAULT_ELITISM)]
    pub elitism: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population: GENETIC_DEFAULT_POPULATION,
            generations: GENETIC_DEFAULT_GENERATIONS,
            mutation_rate: GENETIC_DEFAULT_MUTATION_RATE,
            tournament_size: GENETIC_DEFAULT_TOURNAMENT_SIZE,
            elitism: GENETIC_DEFAULT_ELITISM,
        }
    }
}

#[derive(Clone)]
struct Gene {
    event_index: usize,
    hand: Hand,
    finger: Finger,
    pad: Pad,
    pose: (f32, f32),
    is_fallback: bool,
}

#[derive(Clone)]
struct Chromosome {
    genes: Vec<Gene>,
    fitness: f32,
}

/// One admissible `(hand, grip)` choice for `pad`, cached per event so
/// random-gene resampling and mutation share the same candidate pool.
struct EventOptions {
    event_index: usize,
    options: Vec<Gene>,
}

fn build_event_options(input: &SolveInput) -> Vec<EventOptions> {
    let sorted = input.performance.sorted_indices();
    let mut out = Vec::new();
    for idx in sorted {
        let event = &input.performance.events[idx];
        let Some(pad) = input.resolve_pitch(event.pitch) else {
            continue;
        };
        let mut options = Vec::new();
        for hand in [Hand::Left, Hand::Right] {
            if let Some(m) = input.manual_assignments.get(&idx) {
                if m.hand != hand {
                    continue;
                }
            }
            for grip in valid_grips(std::slice::from_ref(&pad), hand) {
                if let Some(finger) = grip.finger_for_chord_index(0) {
                    if let Some(m) = input.manual_assignments.get(&idx) {
                        if m.finger != finger {
                            continue;
                        }
                    }
                    options.push(Gene {
                        event_index: idx,
                        hand,
                        finger,
                        pad,
                        pose: grip.centroid,
                        is_fallback: grip.is_fallback(),
                    });
                }
            }
        }
        if !options.is_empty() {
            out.push(EventOptions { event_index: idx, options });
        }
    }
    out
}

fn random_gene(options: &EventOptions, rng: &mut fastrand::Rng) -> Gene {
    let i = rng.usize(0..options.options.len());
    options.options[i].clone()
}

fn random_chromosome(events: &[EventOptions], rng: &mut fastrand::Rng) -> Chromosome {
    let genes = events.iter().map(|e| random_gene(e, rng)).collect();
    Chromosome { genes, fitness: f32::MAX }
}

fn evaluate(input: &SolveInput, chromosome: &mut Chromosome) {
    let mut total = 0.0f32;
    let mut last_pose: std::collections::HashMap<Hand, (f32, f32)> = std::collections::HashMap::new();

    for gene in &chromosome.genes {
        let neutral = neutral_reference(input.engine_config, gene.hand, |p| input.resolve_pitch(p));
        let resting = match gene.hand {
            Hand::Left => input.engine_config.resting_pose.left.centroid,
            Hand::Right => input.engine_config.resting_pose.right.centroid,
        };
        total += grip_stretch_cost(0.0, neutral.comfortable_span);
        total += attractor_cost(gene.pose, resting, input.engine_config.stiffness);
        if gene.is_fallback {
            total += GENETIC_FALLBACK_PENALTY;
        }

        if let Some(&prev) = last_pose.get(&gene.hand) {
            let t = transition_cost(prev, gene.pose, 1.0);
            total += if t.is_infinite() { GENETIC_INFEASIBLE_TRANSITION_PENALTY } else { t };
        }
        last_pose.insert(gene.hand, gene.pose);
    }

    chromosome.fitness = total;
}

fn tournament_select<'a>(population: &'a [Chromosome], k: usize, rng: &mut fastrand::Rng) -> &'a Chromosome {
    let mut best: Option<&Chromosome> = None;
    for _ in 0..k.max(1) {
        let candidate = &population[rng.usize(0..population.len())];
        best = match best {
            None => Some(candidate),
            Some(b) if candidate.fitness < b.fitness => Some(candidate),
            Some(b) => Some(b),
        };
    }
    best.expect("tournament size is at least 1")
}

fn crossover(a: &Chromosome, b: &Chromosome, events: &[EventOptions], rng: &mut fastrand::Rng) -> Chromosome {
    let n = a.genes.len();
    if n < 2 {
        return a.clone();
    }
    let point = rng.usize(1..n);
    let mut genes: Vec<Gene> = a.genes[..point].iter().chain(&b.genes[point..]).cloned().collect();

    // boundary gene may create an infeasible same-hand jump; resample it.
    if point < n {
        let same_hand_break = point > 0 && genes[point - 1].hand == genes[point].hand
            && transition_cost(genes[point - 1].pose, genes[point].pose, 1.0).is_infinite();
        if same_hand_break {
            genes[point] = random_gene(&events[point], rng);
        }
    }

    Chromosome { genes, fitness: f32::MAX }
}

fn mutate(
    chromosome: &mut Chromosome,
    events: &[EventOptions],
    mutation_rate: f32,
    rng: &mut fastrand::Rng,
) {
    for (i, gene) in chromosome.genes.iter_mut().enumerate() {
        if rng.f32() < mutation_rate {
            *gene = random_gene(&events[i], rng);
        }
    }
}

fn reapply_manual(chromosome: &mut Chromosome, input: &SolveInput, events: &[EventOptions]) {
    for (i, event_opts) in events.iter().enumerate() {
        if let Some(m) = input.manual_assignments.get(&event_opts.event_index) {
            if let Some(fixed) = event_opts.options.iter().find(|g| g.hand == m.hand && g.finger == m.finger) {
                chromosome.genes[i] = fixed.clone();
            }
        }
    }
}

/// Runs the genetic algorithm, yielding cooperatively every
/// [`GENETIC_YIELD_EVERY`] generations.
pub async fn solve(input: &SolveInput, params: &GeneticParams, seed: Option<u64>) -> SolverResult {
    info!(
        "genetic solve: {} events, population={}, generations={}",
        input.performance.events.len(),
        params.population,
        params.generations
    );
    let events = build_event_options(input);
    let mut rng = seed.map(fastrand::Rng::with_seed).unwrap_or_else(fastrand::Rng::new);

    if events.is_empty() {
        return empty_result(input);
    }

    let mut population: Vec<Chromosome> = (0..params.population.max(1))
        .map(|_| {
            let mut c = random_chromosome(&events, &mut rng);
            reapply_manual(&mut c, input, &events);
            c
        })
        .collect();
    population.par_iter_mut().for_each(|c| evaluate(input, c));

    let mut evolution_log = Vec::with_capacity(params.generations);

    for generation in 0..params.generations {
        population.sort_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap());

        let elites: Vec<Chromosome> = population.iter().take(params.elitism).cloned().collect();
        let mut next_gen = elites.clone();

        while next_gen.len() < population.len() {
            let parent_a = tournament_select(&population, params.tournament_size, &mut rng);
            let parent_b = tournament_select(&population, params.tournament_size, &mut rng);
            let mut child = crossover(parent_a, parent_b, &events, &mut rng);
            mutate(&mut child, &events, params.mutation_rate, &mut rng);
            reapply_manual(&mut child, input, &events);
            next_gen.push(child);
        }

        next_gen.par_iter_mut().for_each(|c| evaluate(input, c));
        population = next_gen;

        let best = population.iter().map(|c| c.fitness).fold(f32::MAX, f32::min);
        let worst = population.iter().map(|c| c.fitness).fold(f32::MIN, f32::max);
        let average = population.iter().map(|c| c.fitness).sum::<f32>() / population.len() as f32;
        evolution_log.push(EvolutionGenerationRecord { generation, best, average, worst });

        if generation % GENETIC_YIELD_EVERY == 0 {
            yield_now().await;
        }
    }

    population.sort_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap());
    let best = &population[0];

    let mut result = build_result(input, best);
    result.evolution_log = Some(evolution_log);
    info!(
        "genetic solve done: score={} hard={} unplayable={}",
        result.score, result.hard_count, result.unplayable_count
    );
    result
}

/// Reconstructs the per-finger fatigue implied by the winning chromosome, in
/// event order, the same way a beam path accumulates it along the way.
fn replay_fatigue(input: &SolveInput, chromosome: &Chromosome) -> FatigueState {
    let mut state = FatigueState::new();
    let mut last_time: std::collections::HashMap<Hand, f64> = std::collections::HashMap::new();
    for gene in &chromosome.genes {
        let start_time = input.performance.events[gene.event_index].start_time;
        let dt = last_time.get(&gene.hand).map(|&t| (start_time - t).max(0.0)).unwrap_or(0.0);
        state.apply_use(gene.hand, gene.finger, dt);
        last_time.insert(gene.hand, start_time);
    }
    state
}

fn empty_result(input: &SolveInput) -> SolverResult {
    let debug_events = input
        .performance
        .events
        .iter()
        .map(|e| DebugEvent {
            pitch: e.pitch,
            start_time: e.start_time,
            hand: None,
            finger: None,
            total_cost: f32::INFINITY,
            breakdown: None,
            difficulty: Difficulty::Unplayable,
            row: None,
            col: None,
        })
        .collect::<Vec<_>>();
    let unplayable_count = debug_events.len();
    SolverResult {
        score: SolverResult::score_from_counts(0, unplayable_count),
        unplayable_count,
        hard_count: 0,
        debug_events,
        finger_usage_stats: Default::default(),
        fatigue_map: FatigueState::new().fatigue_map(),
        average_drift: 0.0,
        average_metrics: CostBreakdown::default(),
        evolution_log: Some(Vec::new()),
        optimization_log: None,
        annealing_trace: None,
    }
}

fn build_result(input: &SolveInput, chromosome: &Chromosome) -> SolverResult {
    let by_event: std::collections::HashMap<usize, &Gene> =
        chromosome.genes.iter().map(|g| (g.event_index, g)).collect();

    let mut debug_events = Vec::with_capacity(input.performance.events.len());
    let mut hard_count = 0usize;
    let mut unplayable_count = 0usize;
    let mut finger_usage: std::collections::HashMap<String, u32> = std::collections::HashMap::new();

    for (idx, event) in input.performance.events.iter().enumerate() {
        if let Some(gene) = by_event.get(&idx) {
            let per_note_cost = chromosome.fitness / chromosome.genes.len().max(1) as f32;
            let difficulty = Difficulty::classify(per_note_cost);
            if difficulty == Difficulty::Hard {
                hard_count += 1;
            }
            *finger_usage.entry(gene.hand.usage_key(gene.finger)).or_insert(0) += 1;
            debug_events.push(DebugEvent {
                pitch: event.pitch,
                start_time: event.start_time,
                hand: Some(gene.hand),
                finger: Some(gene.finger),
                total_cost: per_note_cost,
                breakdown: None,
                difficulty,
                row: Some(gene.pad.row),
                col: Some(gene.pad.col),
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

    SolverResult {
        score: SolverResult::score_from_counts(hard_count, unplayable_count),
        unplayable_count,
        hard_count,
        debug_events,
        finger_usage_stats: finger_usage,
        fatigue_map: replay_fatigue(input, chromosome).fatigue_map(),
        average_drift: 0.0,
        average_metrics: breakdown_average(&[]),
        evolution_log: None,
        optimization_log: None,
        annealing_trace: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padforge_protocol::{EngineConfig, InstrumentConfig, ManualAssignments, NoteEvent, Performance};

    fn input_for(events: Vec<NoteEvent>) -> (Performance, InstrumentConfig, EngineConfig, ManualAssignments) {
        (
            Performance { tempo: 120.0, name: None, events },
            InstrumentConfig::default(),
            EngineConfig::default(),
            ManualAssignments::new(),
        )
    }

    #[test]
    fn winning_chromosome_yields_a_nonempty_fatigue_map() {
        let (performance, instrument, engine_config, manual) =
            input_for(vec![NoteEvent { pitch: 36, start_time: 0.0, duration: 0.25 }]);
        let input = SolveInput {
            performance: &performance,
            instrument: &instrument,
            layout: None,
            engine_config: &engine_config,
            manual_assignments: &manual,
        };
        let params = GeneticParams { population: 6, generations: 3, ..GeneticParams::default() };
        let result = pollster_block_on(solve(&input, &params, Some(11)));
        assert!(!result.fatigue_map.is_empty());
        assert!(result.fatigue_map.values().any(|&v| v > 0.0));
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let (performance, instrument, engine_config, manual) =
            input_for(vec![NoteEvent { pitch: 36, start_time: 0.0, duration: 0.25 }]);
        let input = SolveInput {
            performance: &performance,
            instrument: &instrument,
            layout: None,
            engine_config: &engine_config,
            manual_assignments: &manual,
        };
        let params = GeneticParams { population: 6, generations: 3, ..GeneticParams::default() };

        let a = pollster_block_on(solve(&input, &params, Some(42)));
        let b = pollster_block_on(solve(&input, &params, Some(42)));
        assert_eq!(a.debug_events[0].hand, b.debug_events[0].hand);
        assert_eq!(a.debug_events[0].finger, b.debug_events[0].finger);
    }

    /// Minimal inline `block_on`: `YieldNow` only ever yields once per await
    /// and carries no external wakeup source, so busy-polling a no-op waker
    /// is sufficient to drive it to completion in tests.
    fn pollster_block_on<F: std::future::Future>(mut fut: F) -> F::Output {
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
}
