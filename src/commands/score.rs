use anyhow::Result;

use crate::cli::{Cli, ScoreArgs};
use crate::io::read_graph_file;
use crate::{Sampler, ScoreWeights};

pub fn run(cli: &Cli, args: &ScoreArgs) -> Result<()> {
    let mut graph = read_graph_file(&args.graph)?;

    let mut sampler = match args.seed {
        Some(seed) => Sampler::with_seed(&mut graph, seed),
        None => Sampler::new(&mut graph),
    };
    sampler.seed()?;

    if cli.verbose > 0 {
        let graph = sampler.graph();
        for k in 0..graph.num_districts() {
            eprintln!(
                "district {k}: {} precincts, pop {}, minority {}",
                graph.members(k).len(), graph.total_pop(k), graph.minority_pop(k),
            );
        }
    }

    let weights = ScoreWeights::new(args.alpha, args.beta, args.gamma, args.eta);
    let breakdown = weights.evaluate(sampler.graph());
    println!(
        "total={:.6} compact={:.6} pop={:.6} border={:.6} vra={:.6}",
        breakdown.total, breakdown.compactness, breakdown.population,
        breakdown.border, breakdown.vra,
    );

    Ok(())
}
