use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// District-sampling CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "gerrywalk", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed a partition and run a Metropolis-Hastings walk
    Walk(WalkArgs),

    /// Seed a partition and print its score breakdown
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Input graph file (header, precinct records, edge records)
    #[arg(value_hint = ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Compactness weight
    pub alpha: f64,

    /// Population-balance weight
    pub beta: f64,

    /// Border-preservation weight
    pub gamma: f64,

    /// Minority-representation weight
    pub eta: f64,

    /// Number of accepted steps to take
    pub steps: usize,

    /// RNG seed for a reproducible walk
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write the accepted-step history as JSON
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Input graph file (header, precinct records, edge records)
    #[arg(value_hint = ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Compactness weight
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Population-balance weight
    #[arg(long, default_value_t = 1.0)]
    pub beta: f64,

    /// Border-preservation weight
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f64,

    /// Minority-representation weight
    #[arg(long, default_value_t = 1.0)]
    pub eta: f64,

    /// RNG seed for a reproducible seeding
    #[arg(short, long)]
    pub seed: Option<u64>,
}
