mod history;
mod sampler;
mod score;
mod seed;

pub use history::{History, HistoryEntry};
pub use sampler::Sampler;
pub use score::{ScoreBreakdown, ScoreWeights};
