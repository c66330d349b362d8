use crate::reports;
use clap::Args;
use padforge_core::grid::resolve_pitch;
use padforge_protocol::{GridMapping, InstrumentConfig};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Instrument config JSON file; falls back to the standard 8x8 default.
    #[arg(long)]
    pub instrument: Option<PathBuf>,

    /// Optional grid-mapping JSON file whose explicit placements win over quadrant tiling.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[arg(long, default_value_t = 36)]
    pub from: u8,

    #[arg(long, default_value_t = 99)]
    pub to: u8,
}

pub fn run(args: GridArgs) -> padforge_core::EngineResult<()> {
    let instrument: InstrumentConfig = match &args.instrument {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => InstrumentConfig::default(),
    };
    let layout: Option<GridMapping> = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Some(serde_json::from_str(&text)?)
        }
        None => None,
    };

    let rows: Vec<(u8, Option<(u8, u8)>)> = (args.from..=args.to)
        .map(|pitch| (pitch, resolve_pitch(pitch, &instrument, layout.as_ref()).map(|p| (p.row, p.col))))
        .collect();

    reports::print_pitch_grid(&rows);
    Ok(())
}
