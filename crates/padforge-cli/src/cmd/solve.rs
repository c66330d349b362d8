use crate::reports;
use clap::{Args, ValueEnum};
use padforge_core::job::JobIdentifier;
use padforge_core::solver::annealing::{self, AnnealingParams};
use padforge_core::solver::beam::{self, BeamParams};
use padforge_core::solver::genetic::{self, GeneticParams};
use padforge_core::solver::SolveInput;
use padforge_protocol::{EngineConfig, GridMapping, InstrumentConfig, ManualAssignments, Performance};
use std::path::PathBuf;
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverChoice {
    Beam,
    Genetic,
    Annealing,
}

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Performance JSON file (a `Performance`: tempo, events).
    #[arg(long)]
    pub performance: PathBuf,

    /// Optional grid-mapping JSON file; falls back to quadrant tiling where absent.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Instrument config JSON file; falls back to the standard 8x8 default.
    #[arg(long)]
    pub instrument: Option<PathBuf>,

    /// Engine config JSON file (resting poses, stiffness, beam width); falls back to defaults.
    #[arg(long)]
    pub engine_config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SolverChoice::Beam)]
    pub solver: SolverChoice,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full SolverResult JSON here.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub beam: BeamParams,

    #[command(flatten)]
    pub genetic: GeneticParams,

    #[command(flatten)]
    pub annealing: AnnealingParams,
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Option<PathBuf>) -> padforge_core::EngineResult<T> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(T::default()),
    }
}

/// Minimal inline executor: the solvers yield cooperatively but this CLI has
/// no async runtime of its own, so busy-polling a no-op waker is enough to
/// drive them to completion for a one-shot command invocation.
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

pub fn run(args: SolveArgs) -> padforge_core::EngineResult<()> {
    let performance: Performance = {
        let text = std::fs::read_to_string(&args.performance)?;
        serde_json::from_str(&text)?
    };
    let layout: Option<GridMapping> = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Some(serde_json::from_str(&text)?)
        }
        None => None,
    };
    let instrument: InstrumentConfig = load_json(&args.instrument)?;
    let engine_config: EngineConfig = load_json(&args.engine_config)?;
    let manual_assignments = ManualAssignments::new();

    let job_id = JobIdentifier::from_parts(&performance, &engine_config, &instrument, layout.as_ref(), args.seed);
    info!("solve started, job {} via {:?}", job_id.hash, args.solver);
    let started = std::time::Instant::now();

    let input = SolveInput {
        performance: &performance,
        instrument: &instrument,
        layout: layout.as_ref(),
        engine_config: &engine_config,
        manual_assignments: &manual_assignments,
    };

    let result = match args.solver {
        SolverChoice::Beam => beam::solve(&input, &args.beam),
        SolverChoice::Genetic => block_on(genetic::solve(&input, &args.genetic, args.seed)),
        SolverChoice::Annealing => {
            let initial_mapping = layout.clone().unwrap_or_default();
            let outcome = block_on(annealing::solve(&input, initial_mapping, &args.annealing, args.seed))?;
            outcome.result
        }
    };

    info!("solve finished in {:.2?}", started.elapsed());
    reports::print_solve_summary(&result);

    if let Some(out) = &args.out {
        std::fs::write(out, serde_json::to_string_pretty(&result)?)?;
        info!("wrote result to {}", out.display());
    }

    Ok(())
}
