#![doc = "Gerrywalk: MCMC sampling over contiguous district partitions"]

pub mod cli;
pub mod commands;
mod error;
mod graph;
pub mod io;
mod sampler;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::{GraphBuilder, PartitionSnapshot, PrecinctGraph};

#[doc(inline)]
pub use sampler::{History, HistoryEntry, Sampler, ScoreBreakdown, ScoreWeights};
