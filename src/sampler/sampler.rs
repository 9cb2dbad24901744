use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::graph::PrecinctGraph;
use crate::sampler::{History, ScoreBreakdown, ScoreWeights};

/// Proposal attempts (invalid draws and rejections combined) allowed while
/// hunting for one accepted step before the walk gives up.
const MAX_ATTEMPTS_PER_STEP: usize = 4096;

/// Outcome of a single proposal draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Proposal {
    /// Applied and recorded.
    Accepted,
    /// Applied, lost the acceptance draw, rolled back.
    Rejected,
    /// Failed a validity check before scoring; redraw.
    Invalid,
}

/// Metropolis-Hastings driver over a precinct graph.
///
/// Holds a mutable handle to the graph, the walk's RNG, the installed
/// weights, and the history of accepted steps. `R` defaults to `StdRng`;
/// tests substitute scripted generators.
pub struct Sampler<'g, R: Rng = StdRng> {
    graph: &'g mut PrecinctGraph,
    rng: R,
    weights: ScoreWeights,
    history: History,
    seeded: bool,
}

impl<'g> Sampler<'g, StdRng> {
    /// Driver with an OS-entropy RNG. Prefer `with_seed` when the walk must
    /// be reproducible.
    pub fn new(graph: &'g mut PrecinctGraph) -> Self {
        Self::with_rng(graph, StdRng::from_os_rng())
    }

    /// Driver with a deterministic RNG: identical (seed, graph, weights,
    /// step-count) tuples produce identical walks.
    pub fn with_seed(graph: &'g mut PrecinctGraph, seed: u64) -> Self {
        Self::with_rng(graph, StdRng::seed_from_u64(seed))
    }
}

impl<'g, R: Rng> Sampler<'g, R> {
    /// Driver over a caller-supplied RNG.
    pub fn with_rng(graph: &'g mut PrecinctGraph, rng: R) -> Self {
        let seeded = graph.unassigned().is_empty();
        Self {
            graph,
            rng,
            weights: ScoreWeights::default(),
            history: History::new(),
            seeded,
        }
    }

    /// Read-only view of the graph being walked.
    #[inline] pub fn graph(&self) -> &PrecinctGraph { &self.graph }

    /// The log of accepted steps.
    #[inline] pub fn history(&self) -> &History { &self.history }

    /// The most recently installed weights.
    #[inline] pub fn weights(&self) -> ScoreWeights { self.weights }

    /// Returns true once a valid partition is in place.
    #[inline] pub fn is_seeded(&self) -> bool { self.seeded }

    /// Grow a fresh random partition, discarding any previous walk history.
    pub fn seed(&mut self) -> Result<()> {
        self.graph.seed_districts(&mut self.rng)?;
        self.history.clear();
        self.seeded = true;
        Ok(())
    }

    /// Install an externally supplied partition, discarding any previous
    /// walk history.
    pub fn set_districts(&mut self, assignments: &[u32]) -> Result<()> {
        self.graph.set_districts(assignments)?;
        self.history.clear();
        self.seeded = true;
        Ok(())
    }

    /// Score the current partition under the installed weights.
    pub fn score(&self) -> ScoreBreakdown {
        self.weights.evaluate(self.graph)
    }

    /// Copies of the accepted assignment vectors, in step order.
    pub fn maps(&self) -> Vec<Vec<u32>> {
        self.history.assignment_vectors().map(<[u32]>::to_vec).collect()
    }

    /// Copies of the accepted score breakdowns, in step order.
    pub fn scores(&self) -> Vec<ScoreBreakdown> {
        self.history.score_records().copied().collect()
    }

    /// Install `weights` and perform exactly `steps` accepted steps.
    /// Rejected and invalid proposals are retried without consuming a step.
    /// Returns the weighted score after the final accepted step.
    pub fn walk(&mut self, steps: usize, weights: ScoreWeights) -> Result<f64> {
        if !self.seeded {
            return Err(Error::IllegalTransition(
                "walk requires a seeded partition; call seed or set_districts first".into(),
            ));
        }
        self.weights = weights;

        let mut accepted = 0;
        let mut attempts = 0;
        while accepted < steps {
            if attempts == MAX_ATTEMPTS_PER_STEP {
                return Err(Error::WalkStalled { attempts });
            }
            attempts += 1;

            if self.try_proposal()? == Proposal::Accepted {
                accepted += 1;
                attempts = 0;
            }
        }

        Ok(self.score().total)
    }

    /// Draw one proposal from the crossing-edge set, validate it, and if it
    /// survives, apply it tentatively and accept or reject.
    ///
    /// Drawing a crossing half-edge uniformly selects an undirected crossing
    /// edge uniformly and picks the victim endpoint by fair coin, since both
    /// half-edges of a crossing edge are always present. The half-edge's
    /// owner is reassigned into its head's district.
    pub(crate) fn try_proposal(&mut self) -> Result<Proposal> {
        if self.graph.crossing().is_empty() {
            return Err(Error::NoCrossingEdges);
        }

        let candidates = self.graph.crossing().len();
        let he = self.graph.crossing().get(self.rng.random_range(0..candidates));
        let victim = self.graph.edge_tail(he);
        let donor = self.graph.edge_head(he);

        let (Some(from), Some(into)) = (self.graph.district_of(victim), self.graph.district_of(donor)) else {
            return Err(Error::Internal(format!(
                "crossing edge ({victim}, {donor}) touches unassigned territory"
            )));
        };

        // Validity: distinct districts across a real edge, no district left
        // empty, no district severed. Failures redraw, they are not errors.
        if victim == donor || from == into {
            return Ok(Proposal::Invalid);
        }
        if !self.graph.contains_edge(victim, donor) || !self.graph.contains_edge(donor, victim) {
            return Ok(Proposal::Invalid);
        }
        if self.graph.members(from).len() <= 1 {
            return Ok(Proposal::Invalid);
        }
        if !self.graph.would_stay_connected(victim, into) {
            return Ok(Proposal::Invalid);
        }

        // Tentatively apply, then decide.
        let before = self.weights.evaluate(self.graph);
        self.graph.set_district(victim, into)?;
        let after = self.weights.evaluate(self.graph);

        let accept = after.total <= before.total
            || self.rng.random::<f64>() <= before.total / after.total;

        if accept {
            self.history.record(self.graph.assignments(), after);
            Ok(Proposal::Accepted)
        } else {
            self.graph.set_district(victim, from)?;
            Ok(Proposal::Rejected)
        }
    }
}
