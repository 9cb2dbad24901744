use anyhow::{Context, Result};

use crate::cli::{Cli, WalkArgs};
use crate::io::read_graph_file;
use crate::{Sampler, ScoreWeights};

pub fn run(cli: &Cli, args: &WalkArgs) -> Result<()> {
    let mut graph = read_graph_file(&args.graph)?;
    if cli.verbose > 0 {
        eprintln!(
            "[walk] loaded {} precincts, {} districts, population {}",
            graph.num_precincts(), graph.num_districts(), graph.state_pop(),
        );
    }

    let mut sampler = match args.seed {
        Some(seed) => Sampler::with_seed(&mut graph, seed),
        None => Sampler::new(&mut graph),
    };
    sampler.seed()?;
    if cli.verbose > 0 {
        eprintln!("[walk] seeded; {} crossing edges", sampler.graph().crossing_edge_count());
    }

    // One accepted step per call, so interrupting between steps (and printing
    // per-step progress) stays possible at the driver level.
    let weights = ScoreWeights::new(args.alpha, args.beta, args.gamma, args.eta);
    for step in 0..args.steps {
        let score = sampler.walk(1, weights)?;
        if cli.verbose > 0 {
            eprintln!("step {step}  score = {score:.6}");
        }
    }

    let breakdown = sampler.score();
    println!(
        "accepted {} steps  total={:.6} compact={:.6} pop={:.6} border={:.6} vra={:.6}",
        sampler.history().len(),
        breakdown.total, breakdown.compactness, breakdown.population,
        breakdown.border, breakdown.vra,
    );

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(sampler.history())
            .context("[walk] failed to encode history")?;
        std::fs::write(path, json)
            .with_context(|| format!("[walk] failed to write {}", path.display()))?;
        if cli.verbose > 0 {
            eprintln!("[walk] wrote history to {}", path.display());
        }
    }

    Ok(())
}
