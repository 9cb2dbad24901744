//! Error types for the gerrywalk core library.

use thiserror::Error;

/// An error produced by graph construction, seeding, or the sampler.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A caller-supplied id, count, or assignment was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Finalization or bulk assignment found the graph in a state that
    /// contradicts its own declared totals or structure.
    #[error("invariant broken: {0}")]
    InvariantBroken(String),

    /// Round-robin district growth made a full pass without assigning a
    /// precinct; the graph is disconnected for the requested district count.
    #[error("seeding failed: no district could grow (graph disconnected for {num_districts} districts)")]
    SeedingFailed { num_districts: u32 },

    /// An operation was invoked in the wrong sampler state.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// The crossing-edge set is empty with more than one district, so no
    /// proposal can ever be drawn.
    #[error("no crossing edges: the walk cannot propose a move")]
    NoCrossingEdges,

    /// A single step exhausted its proposal-attempt budget without an
    /// acceptance.
    #[error("walk stalled after {attempts} proposal attempts without an accepted step")]
    WalkStalled { attempts: usize },

    /// A post-condition check failed. Should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = std::result::Result<T, Error>;
