//! Simulated annealing over the grid mapping, nested on top of beam search
//! for fingering cost (§4.4.3).

use crate::consts::{
    ANNEALING_DEFAULT_COOLING_RATE, ANNEALING_DEFAULT_FAST_BEAM_WIDTH, ANNEALING_DEFAULT_FINAL_BEAM_WIDTH,
    ANNEALING_DEFAULT_INITIAL_TEMP, ANNEALING_DEFAULT_ITERATIONS, ANNEALING_YIELD_EVERY,
};
use crate::error::{EngineError, EngineResult};
use crate::solver::beam::{self, BeamParams};
use crate::solver::SolveInput;
use crate::yield_now::yield_now;
use clap::Args;
use padforge_protocol::{AnnealingSnapshot, CostBreakdown, GridMapping, OptimizationLogEntry, SolverResult};
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct AnnealingParams {
    #[arg(long, default_value_t = ANNEALING_DEFAULT_INITIAL_TEMP)]
    pub initial_temp: f32,
    #[arg(long, default_value_t = ANNEALING_DEFAULT_COOLING_RATE)]
    pub cooling_rate: f32,
    #[arg(long, default_value_t = ANNEALING_DEFAULT_ITERATIONS)]
    pub iterations: usize,
    #[arg(long, default_value_t = ANNEALING_DEFAULT_FAST_BEAM_WIDTH)]
    pub fast_beam_width: usize,
    #[arg(long, default_value_t = ANNEALING_DEFAULT_FINAL_BEAM_WIDTH)]
    pub final_beam_width: usize,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temp: ANNEALING_DEFAULT_INITIAL_TEMP,
            cooling_rate: ANNEALING_DEFAULT_COOLING_RATE,
            iterations: ANNEALING_DEFAULT_ITERATIONS,
            fast_beam_width: ANNEALING_DEFAULT_FAST_BEAM_WIDTH,
            final_beam_width: ANNEALING_DEFAULT_FINAL_BEAM_WIDTH,
        }
    }
}

/// Swaps two occupied pads' voices (and finger constraints), or moves one
/// voice from an occupied pad to an empty one, carrying its finger
/// constraint to the destination. Falls back to swap when there is no empty
/// pad, and returns the mapping unchanged if neither move is possible.
fn mutate_mapping(mapping: &GridMapping, grid_rows: u8, grid_cols: u8, rng: &mut fastrand::Rng) -> GridMapping {
    let mut next = mapping.clone();
    next.touch();

    let occupied: Vec<String> = mapping.cells.keys().cloned().collect();
    if occupied.is_empty() {
        return next;
    }

    let all_keys: Vec<String> = (0..grid_rows)
        .flat_map(|r| (0..grid_cols).map(move |c| format!("{},{}", r, c)))
        .collect();
    let empty: Vec<String> = all_keys.iter().filter(|k| !mapping.cells.contains_key(*k)).cloned().collect();

    let do_move = !empty.is_empty() && rng.bool();

    if do_move {
        let from = occupied[rng.usize(0..occupied.len())].clone();
        let to = empty[rng.usize(0..empty.len())].clone();
        if let Some(voice) = next.cells.remove(&from) {
            next.cells.insert(to.clone(), voice);
            if let Some(constraint) = next.finger_constraints.remove(&from) {
                next.finger_constraints.insert(to, constraint);
            }
        }
    } else if occupied.len() >= 2 {
        let i = rng.usize(0..occupied.len());
        let mut j = rng.usize(0..occupied.len());
        while j == i {
            j = rng.usize(0..occupied.len());
        }
        let (key_a, key_b) = (occupied[i].clone(), occupied[j].clone());
        let voice_a = next.cells.get(&key_a).cloned();
        let voice_b = next.cells.get(&key_b).cloned();
        if let (Some(a), Some(b)) = (voice_a, voice_b) {
            next.cells.insert(key_a.clone(), b);
            next.cells.insert(key_b.clone(), a);
        }
        let constraint_a = next.finger_constraints.remove(&key_a);
        let constraint_b = next.finger_constraints.remove(&key_b);
        if let Some(c) = constraint_b {
            next.finger_constraints.insert(key_a, c);
        }
        if let Some(c) = constraint_a {
            next.finger_constraints.insert(key_b, c);
        }
    }

    next
}

fn component_shares(sums: &CostBreakdown) -> CostBreakdown {
    let total = sums.total.max(f32::EPSILON);
    sums.scaled(1.0 / total)
}

/// Runs simulated annealing over the grid mapping, yielding cooperatively
/// every [`ANNEALING_YIELD_EVERY`] iterations. `initial_mapping` must be
/// non-empty.
pub async fn solve(
    input: &SolveInput<'_>,
    initial_mapping: GridMapping,
    params: &AnnealingParams,
    seed: Option<u64>,
) -> EngineResult<AnnealingOutcome> {
    if initial_mapping.is_empty() {
        return Err(EngineError::EmptyInitialMapping);
    }

    info!(
        "annealing solve: {} iterations, initial_temp={}, cooling_rate={}",
        params.iterations, params.initial_temp, params.cooling_rate
    );

    let mut rng = seed.map(fastrand::Rng::with_seed).unwrap_or_else(fastrand::Rng::new);
    let mut temperature = params.initial_temp;

    let fast_params = BeamParams { beam_width: params.fast_beam_width.max(1) };

    let mut current_mapping = initial_mapping.clone();
    let current_input = SolveInput { layout: Some(&current_mapping), ..clone_without_layout(input) };
    let mut current_cost = beam::solve(&current_input, &fast_params).average_metrics.total;

    let mut best_mapping = current_mapping.clone();
    let mut best_cost = current_cost;

    let mut trace = Vec::with_capacity(params.iterations);
    let mut optimization_log = Vec::with_capacity(params.iterations);

    for iteration in 0..params.iterations {
        let candidate_mapping = mutate_mapping(&current_mapping, input.instrument.rows, input.instrument.cols, &mut rng);
        let candidate_input = SolveInput { layout: Some(&candidate_mapping), ..clone_without_layout(input) };
        let candidate_result = beam::solve(&candidate_input, &fast_params);
        let candidate_cost = candidate_result.average_metrics.total;

        let delta = candidate_cost - current_cost;
        let acceptance_probability = if delta <= 0.0 { 1.0 } else { (-delta / temperature.max(f32::EPSILON)).exp() };
        let accepted = delta <= 0.0 || rng.f32() < acceptance_probability;

        if accepted {
            current_mapping = candidate_mapping;
            current_cost = candidate_cost;
            if candidate_cost < best_cost {
                best_cost = candidate_cost;
                best_mapping = current_mapping.clone();
            }
        }

        let sums = candidate_result.average_metrics;
        trace.push(AnnealingSnapshot {
            iteration,
            temperature,
            current_cost,
            best_cost,
            accepted,
            delta_cost: delta,
            acceptance_probability,
            component_sums: sums,
            component_shares: component_shares(&sums),
        });
        optimization_log.push(OptimizationLogEntry { iteration, best_cost });

        temperature *= params.cooling_rate;

        if iteration % ANNEALING_YIELD_EVERY == 0 {
            yield_now().await;
        }
    }

    let final_params = BeamParams { beam_width: params.final_beam_width.max(1) };
    let final_input = SolveInput { layout: Some(&best_mapping), ..clone_without_layout(input) };
    let mut result = beam::solve(&final_input, &final_params);

    result.evolution_log = Some(Vec::new());
    result.optimization_log = Some(optimization_log);
    result.annealing_trace = Some(trace);
    info!("annealing solve done: best_cost={}", best_cost);
    Ok(AnnealingOutcome { result, best_mapping })
}

/// Shallow-clones a `SolveInput`'s non-layout fields so the layout reference
/// can be swapped per candidate without re-borrowing the caller's input.
fn clone_without_layout<'a>(input: &SolveInput<'a>) -> SolveInput<'a> {
    SolveInput {
        performance: input.performance,
        instrument: input.instrument,
        layout: None,
        engine_config: input.engine_config,
        manual_assignments: input.manual_assignments,
    }
}

/// Exposes the best mapping found after [`solve`] has run, matching the
/// spec's `getBestMapping()` accessor: callers that need both the
/// `SolverResult` and the mapping it was computed from should keep this
/// pairing themselves rather than recomputing via a second solve.
pub struct AnnealingOutcome {
    pub result: SolverResult,
    pub best_mapping: GridMapping,
}
