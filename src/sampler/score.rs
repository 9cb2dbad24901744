use serde::{Deserialize, Serialize};

use crate::graph::PrecinctGraph;

/// Weights of the four energy terms in the walk's target distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub alpha: f64, // compactness
    pub beta: f64,  // population balance
    pub gamma: f64, // border preservation
    pub eta: f64,   // minority representation
}

impl ScoreWeights {
    pub fn new(alpha: f64, beta: f64, gamma: f64, eta: f64) -> Self {
        Self { alpha, beta, gamma, eta }
    }

    /// Evaluate all four terms and their weighted sum for the current
    /// partition. Each term is recomputed from scratch.
    pub fn evaluate(&self, graph: &PrecinctGraph) -> ScoreBreakdown {
        let compactness = graph.compactness_energy();
        let population = graph.population_energy();
        let border = graph.border_energy();
        let vra = graph.vra_energy();

        ScoreBreakdown {
            compactness,
            population,
            border,
            vra,
            total: self.alpha * compactness
                + self.beta * population
                + self.gamma * border
                + self.eta * vra,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self { Self::new(1.0, 1.0, 1.0, 1.0) }
}

/// The four energy terms of one evaluation plus their weighted total.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "compact")]
    pub compactness: f64,
    #[serde(rename = "pop")]
    pub population: f64,
    pub border: f64,
    pub vra: f64,
    pub total: f64,
}

impl PrecinctGraph {
    /// Compactness energy: for each district, the squared count of crossing
    /// half-edges leaving it, divided by its size. Lower is more compact.
    pub fn compactness_energy(&self) -> f64 {
        (0..self.num_districts()).map(|k| {
            let size = self.members(k).len();
            if size == 0 { return 0.0 }

            let foreign = self.perimeter(k).iter()
                .map(|&v| self.foreign_neighbors(k, v).count())
                .sum::<usize>();
            (foreign * foreign) as f64 / size as f64
        }).sum()
    }

    /// Signed linear deviation of district populations from the state
    /// average, averaged over districts. The average uses integer division,
    /// so the term reduces to a remainder effect; the sign is retained.
    pub fn population_energy(&self) -> f64 {
        let districts = self.num_districts() as u64;
        let average = self.state_pop() / districts;

        (0..self.num_districts())
            .map(|k| self.total_pop(k) as f64 - average as f64)
            .sum::<f64>() / districts as f64
    }

    /// Border-preservation energy.
    // TODO: score agreement with a baseline plan once callers can supply one
    // through set_districts; until then the term is wired but always zero.
    pub fn border_energy(&self) -> f64 {
        0.0
    }

    /// Minority-representation energy: districts where the minority share is
    /// below one half contribute that share. Zero-population districts
    /// contribute nothing.
    pub fn vra_energy(&self) -> f64 {
        (0..self.num_districts()).map(|k| {
            let total = self.total_pop(k);
            if total == 0 { return 0.0 }

            let share = self.minority_pop(k) as f64 / total as f64;
            if share < 0.5 { share } else { 0.0 }
        }).sum()
    }
}
