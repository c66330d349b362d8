pub mod engine_config;
pub mod finger;
pub mod instrument;
pub mod layout;
pub mod manual;
pub mod pad;
pub mod performance;
pub mod result;

pub use engine_config::{EngineConfig, HandPose, RestingPoses};
pub use finger::{Finger, Hand};
pub use instrument::InstrumentConfig;
pub use layout::{GridMapping, Voice};
pub use manual::{ManualAssignment, ManualAssignments};
pub use pad::Pad;
pub use performance::{NoteEvent, Performance};
pub use result::{
    AnnealingSnapshot, CostBreakdown, DebugEvent, Difficulty, EvolutionGenerationRecord,
    OptimizationLogEntry, SolverKind, SolverResult,
};
