use super::agent::{relax_row, RouterAgent};
use super::types::{AgentSummary, ExecutionSummary, Termination};
use crate::config::SimConfig;
use crate::netsim::{ConvergenceTracker, NodeId, Reporter, Topology};
use crate::{Error, Stopper};
use log::*;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Drives the relaxation of all routers of a topology until the network settles
pub trait Executor {
    /// Run the simulation on the shared topology
    fn execute(&self, topology: &Arc<Topology>) -> Result<ExecutionSummary, Error>;
}

/// Runs one OS thread per router, each driven by its own [`RouterAgent`]. All threads share the
/// topology and one [`ConvergenceTracker`]. The executor returns once every agent stopped.
#[derive(Debug, Clone)]
pub struct ThreadedExec {
    config: SimConfig,
    stopper: Stopper,
}

impl ThreadedExec {
    /// Create a new executor. The `stopper` can be used to cancel a running simulation.
    pub fn new(config: SimConfig, stopper: Stopper) -> Self {
        Self { config, stopper }
    }
}

impl Executor for ThreadedExec {
    fn execute(&self, topology: &Arc<Topology>) -> Result<ExecutionSummary, Error> {
        self.config.validate()?;
        let num_nodes = topology.num_nodes();
        let tracker = Arc::new(ConvergenceTracker::new(num_nodes));
        Reporter::new(self.config.report).print_matrix(topology);

        let agents = (0..num_nodes)
            .map(|id| {
                RouterAgent::new(
                    id,
                    Arc::clone(topology),
                    Arc::clone(&tracker),
                    &self.config,
                    self.stopper.clone(),
                )
            })
            .collect::<Result<Vec<_>, Error>>()?;

        info!("Starting {} router agents", num_nodes);
        let start_time = Instant::now();
        let mut handles: Vec<(NodeId, JoinHandle<Result<AgentSummary, Error>>)> = Vec::new();
        for agent in agents {
            let id = agent.id();
            match thread::Builder::new().name(format!("router-{}", id)).spawn(move || agent.run()) {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    error!("Cannot spawn the agent of router {}: {}", id, e);
                    // let the agents that already run leave, then report the failure
                    self.stopper.send_stop();
                    for (_, handle) in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::SpawnFailed(id));
                }
            }
        }

        // join every agent before looking at the results
        let results: Vec<Result<AgentSummary, Error>> = handles
            .into_iter()
            .map(|(id, handle)| handle.join().unwrap_or_else(|_| Err(Error::AgentPanicked(id))))
            .collect();
        let summary = ExecutionSummary { agents: results.into_iter().collect::<Result<Vec<_>, Error>>()? };

        info!(
            "All agents stopped after {:?}: converged = {}, perturbations = {}",
            start_time.elapsed(),
            summary.converged(),
            summary.perturbations()
        );
        Ok(summary)
    }
}

/// Relaxes all routers one after the other, in rounds, on the calling thread. The run ends after
/// the first round in which no router changed, or after `max_rounds` rounds. Without threads and
/// perturbations, the result is fully deterministic.
#[derive(Debug, Clone)]
pub struct RoundRobinExec {
    max_rounds: usize,
    stopper: Stopper,
}

impl RoundRobinExec {
    /// Create a new executor running at most `max_rounds` rounds.
    pub fn new(max_rounds: usize, stopper: Stopper) -> Self {
        Self { max_rounds, stopper }
    }
}

impl Executor for RoundRobinExec {
    fn execute(&self, topology: &Arc<Topology>) -> Result<ExecutionSummary, Error> {
        let num_nodes = topology.num_nodes();
        let tracker = ConvergenceTracker::new(num_nodes);

        let mut rounds = 0;
        let termination = loop {
            if self.stopper.is_stop() {
                break Termination::Stopped;
            }
            if rounds >= self.max_rounds {
                warn!("Network did not settle within {} rounds", self.max_rounds);
                break Termination::PassCap;
            }
            for node in 0..num_nodes {
                relax_row(topology, &tracker, node)?;
            }
            rounds += 1;
            debug!("round {}: changed = {}", rounds, tracker.any_changed());
            if !tracker.any_changed() {
                break Termination::Converged;
            }
        };

        Ok(ExecutionSummary {
            agents: (0..num_nodes)
                .map(|node| AgentSummary { node, passes: rounds, perturbations: 0, termination })
                .collect(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::netsim::{Cost, NUM_NODES};

    #[test]
    fn test_round_robin_empty_network() {
        let topology = Arc::new(Topology::new(NUM_NODES));
        let summary = RoundRobinExec::new(10, Stopper::new()).execute(&topology).unwrap();
        assert!(summary.converged());
        assert_eq!(summary.max_passes(), 1);
    }

    #[test]
    fn test_round_robin_round_cap() {
        let edges: Vec<(NodeId, NodeId, Cost)> = (0..NUM_NODES - 1).map(|i| (i, i + 1, 1)).collect();
        let topology = Arc::new(Topology::from_edges(NUM_NODES, &edges).unwrap());
        let summary = RoundRobinExec::new(1, Stopper::new()).execute(&topology).unwrap();
        assert!(!summary.converged());
        assert!(summary.agents.iter().all(|a| a.termination == Termination::PassCap));
    }

    #[test]
    fn test_threaded_rejects_invalid_config() {
        let topology = Arc::new(Topology::new(NUM_NODES));
        let config = SimConfig::fast_local().with_perturbation_probability(-1.0);
        let result = ThreadedExec::new(config, Stopper::new()).execute(&topology);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_threaded_stopped_before_start() {
        let topology = Arc::new(Topology::new(NUM_NODES));
        let stopper = Stopper::new();
        stopper.send_stop();
        let summary = ThreadedExec::new(SimConfig::fast_local(), stopper).execute(&topology).unwrap();
        assert_eq!(summary.agents.len(), NUM_NODES);
        assert!(summary.agents.iter().all(|a| a.termination == Termination::Stopped && a.passes == 0));
    }
}
