use crate::reports;
use clap::Args;
use padforge_core::event_analyzer::{group_moments, onion_skin, transitions};
use padforge_protocol::SolverResult;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// A previously saved `SolverResult` JSON file (see `solve --out`).
    #[arg(long)]
    pub result: PathBuf,

    /// Print the onion-skin view (shared/only pads, finger moves) for this moment index.
    #[arg(long)]
    pub focus: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> padforge_core::EngineResult<()> {
    let text = std::fs::read_to_string(&args.result)?;
    let result: SolverResult = serde_json::from_str(&text)?;

    let moments = group_moments(&result.debug_events);
    info!("grouped {} debug events into {} moments", result.debug_events.len(), moments.len());

    reports::print_moments(&moments);
    reports::print_transitions(&transitions(&moments));

    if let Some(index) = args.focus {
        match onion_skin(&moments, index) {
            Some(skin) => reports::print_onion_skin(index, &skin),
            None => warn!("no onion-skin view for moment {} (out of range, or it's the last moment)", index),
        }
    }

    Ok(())
}
