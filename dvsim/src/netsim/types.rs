use thiserror::Error;

/// Index of a router in the topology, `0..NUM_NODES`
pub type NodeId = usize;

/// Cost of a link or of a path
pub type Cost = u32;

/// Number of routers in the simulated network
pub const NUM_NODES: usize = 5;

/// Sentinel for "no known path". It is larger than any real path in the network, and adding it to
/// a link cost does not overflow.
pub const UNREACHABLE: Cost = 9999;

/// Errors raised when accessing the topology
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// The node does not exist in the topology
    #[error("Router {0} does not exist")]
    NodeOutOfRange(NodeId),
    /// An edge must connect two distinct routers
    #[error("Cannot change the cost of router {0} to itself")]
    SelfLoop(NodeId),
    /// The cost is zero or not below the unreachable sentinel
    #[error("Invalid link cost: {0}")]
    InvalidCost(Cost),
}
