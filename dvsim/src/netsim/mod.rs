//! # Network Simulation
//!
//! The shared state of the simulated network: the cost matrix with its row guards
//! ([`Topology`]), the per-router change flags ([`ConvergenceTracker`]), and the snapshot printer
//! ([`Reporter`]).

mod reporter;
mod topology;
mod tracker;
mod types;

pub use reporter::Reporter;
pub use topology::{RowGuard, Topology};
pub use tracker::ConvergenceTracker;
pub use types::{Cost, NodeId, TopologyError, NUM_NODES, UNREACHABLE};
