//! # DvSim: Distance-Vector Convergence Simulator
//!
//! This crate simulates how a distance-vector routing protocol converges when every router
//! recomputes its own distance vector concurrently, using the Bellman-Ford relaxation step, while
//! the network topology keeps changing underneath it.
//!
//! The network is not real: it is an in-memory cost matrix ([`netsim::Topology`]) with one
//! exclusive guard per row. Every router is driven by a [`routing::RouterAgent`], which repeatedly
//! relaxes its row against the rows of its neighbors, occasionally perturbs a random link
//! ([`routing::Perturber`]), prints the current state ([`netsim::Reporter`]), and stops as soon as
//! no router has flagged a change in the shared [`netsim::ConvergenceTracker`].
//!
//! ## Usage
//!
//! ```no_run
//! use dvsim::example_networks::{ExampleNetwork, SeedNetwork};
//! use dvsim::routing::{Executor, ThreadedExec};
//! use dvsim::{SimConfig, Stopper};
//! use std::sync::Arc;
//!
//! let topology = Arc::new(SeedNetwork::net().unwrap());
//! let exec = ThreadedExec::new(SimConfig::default(), Stopper::new());
//! let summary = exec.execute(&topology).unwrap();
//! println!("{} perturbations", summary.perturbations());
//! ```
//!
//! ## Convergence
//!
//! Each agent checks the tracker on its own, without any barrier. An agent may therefore leave
//! while a peer is about to flag a new change. The simulator only guarantees eventual convergence
//! of the routers that are still running, not a strictly settled network at the moment every
//! agent has exited.

#![deny(missing_docs)]

pub mod config;
pub mod example_networks;
pub mod netsim;
pub mod routing;

#[cfg(test)]
mod test;

pub use config::{ConfigError, SimConfig};

use crate::netsim::{NodeId, TopologyError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Main error type of the simulator
#[derive(Error, Debug)]
pub enum Error {
    /// Error raised by the topology
    #[error("Topology Error: {0}")]
    TopologyError(#[from] TopologyError),
    /// Error in the simulation configuration
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ConfigError),
    /// The worker thread of a router panicked
    #[error("Agent of router {0} panicked")]
    AgentPanicked(NodeId),
    /// The worker thread of a router could not be started
    #[error("Cannot spawn the agent of router {0}")]
    SpawnFailed(NodeId),
}

/// Cancellation signal shared between the driver and all agents. Cloning it yields a handle to
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct Stopper {
    stop: Arc<AtomicBool>,
}

impl Stopper {
    /// Create a new stopper, which is not yet triggered.
    pub fn new() -> Self {
        Self { stop: Arc::new(AtomicBool::new(false)) }
    }

    /// Ask every agent holding this stopper to leave after its current pass.
    pub fn send_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Returns true if a stop was requested.
    pub fn is_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}
