mod boundary;
mod contiguity;
mod district_set;
mod graph;

pub(crate) use boundary::{CrossingEdges, PerimeterSet};
pub(crate) use district_set::DistrictSet;
pub use graph::{GraphBuilder, PartitionSnapshot, PrecinctGraph};
