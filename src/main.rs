use anyhow::Result;
use clap::Parser;

use gerrywalk::cli::{Cli, Commands};
use gerrywalk::commands::{score, walk};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Walk(args) => walk::run(&cli, args),
        Commands::Score(args) => score::run(&cli, args),
    }
}
