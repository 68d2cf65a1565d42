//! # Example Networks
//!
//! Topologies with a fixed set of seed edges, used by the binary and by the tests.

use crate::netsim::{Cost, NodeId, Topology, TopologyError};

mod seed;
pub use seed::SeedNetwork;

/// A network with a fixed set of routers and seed links
pub trait ExampleNetwork {
    /// Number of routers
    fn num_nodes() -> usize;

    /// The seed links `(a, b, cost)`. Every link is written in both directions.
    fn edges() -> Vec<(NodeId, NodeId, Cost)>;

    /// Build the initial topology: all self-costs 0, all seed links applied, everything else
    /// unreachable.
    fn net() -> Result<Topology, TopologyError> {
        Topology::from_edges(Self::num_nodes(), &Self::edges())
    }

    /// True shortest-path costs of the seed network, to compare a converged matrix against
    fn shortest_paths() -> Vec<Vec<Cost>> {
        Topology::reference_distances(Self::num_nodes(), &Self::edges())
    }
}
