//! The solver interface (§4.4): a shared input bundle and capability marker
//! implemented by each of the three search strategies.

pub mod annealing;
pub mod beam;
pub mod genetic;

use padforge_protocol::{EngineConfig, GridMapping, InstrumentConfig, ManualAssignments, Performance, SolverKind};

/// Everything a solver needs to produce a [`padforge_protocol::SolverResult`],
/// borrowed rather than owned so callers can reuse the same performance
/// across several solver invocations.
pub struct SolveInput<'a> {
    pub performance: &'a Performance,
    pub instrument: &'a InstrumentConfig,
    pub layout: Option<&'a GridMapping>,
    pub engine_config: &'a EngineConfig,
    pub manual_assignments: &'a ManualAssignments,
}

impl<'a> SolveInput<'a> {
    pub fn resolve_pitch(&self, pitch: u8) -> Option<padforge_protocol::Pad> {
        crate::grid::resolve_pitch(pitch, self.instrument, self.layout)
    }
}

/// Capability descriptor every solver exposes alongside its `solve` function.
pub trait Solver {
    fn name(&self) -> &'static str;
    fn kind(&self) -> SolverKind;
    fn is_synchronous(&self) -> bool;
}

pub struct BeamSolver;
impl Solver for BeamSolver {
    fn name(&self) -> &'static str {
        "Beam Search"
    }
    fn kind(&self) -> SolverKind {
        SolverKind::Beam
    }
    fn is_synchronous(&self) -> bool {
        true
    }
}

pub struct GeneticSolver;
impl Solver for GeneticSolver {
    fn name(&self) -> &'static str {
        "Genetic Algorithm"
    }
    fn kind(&self) -> SolverKind {
        SolverKind::Genetic
    }
    fn is_synchronous(&self) -> bool {
        false
    }
}

pub struct AnnealingSolver;
impl Solver for AnnealingSolver {
    fn name(&self) -> &'static str {
        "Simulated Annealing"
    }
    fn kind(&self) -> SolverKind {
        SolverKind::Annealing
    }
    fn is_synchronous(&self) -> bool {
        false
    }
}
