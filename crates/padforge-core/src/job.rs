//! Deterministic run-identifier hashing (§10.3): a (performance, engine
//! config, instrument, layout, seed) tuple hashes to the same id every time,
//! so two identical runs can be recognized without re-running the solver.

use padforge_protocol::{EngineConfig, GridMapping, InstrumentConfig, Performance};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobIdentifier {
    pub hash: String,
}

impl JobIdentifier {
    /// Generates a deterministic hash from the inputs that define a solver
    /// run's search landscape. Unrelated mutable state (solver logs, traces)
    /// never affects the hash — only what changes what the run *means*.
    pub fn from_parts(
        performance: &Performance,
        engine_config: &EngineConfig,
        instrument: &InstrumentConfig,
        layout: Option<&GridMapping>,
        seed: Option<u64>,
    ) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(serde_json::to_string(performance).unwrap().as_bytes());
        hasher.update(serde_json::to_string(engine_config).unwrap().as_bytes());
        hasher.update(serde_json::to_string(instrument).unwrap().as_bytes());
        if let Some(layout) = layout {
            hasher.update(serde_json::to_string(layout).unwrap().as_bytes());
        }
        hasher.update(seed.unwrap_or(0).to_le_bytes());

        Self { hash: hex::encode(hasher.finalize()) }
    }
}
