use clap::{Parser, Subcommand};
use tracing_subscriber::fmt;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fingering and layout optimizer for pad-grid MIDI controllers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a performance against a layout with one of the three solvers.
    Solve(cmd::solve::SolveArgs),
    /// Replay event-analysis over a previously saved solver result.
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Print the resolved pitch -> pad table for an instrument/layout.
    Grid(cmd::grid::GridArgs),
}

fn main() {
    fmt::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve(args) => cmd::solve::run(args),
        Commands::Analyze(args) => cmd::analyze::run(args),
        Commands::Grid(args) => cmd::grid::run(args),
    };

    if let Err(e) = outcome {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
