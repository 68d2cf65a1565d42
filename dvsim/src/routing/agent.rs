use super::perturber::Perturber;
use super::types::{AgentState, AgentSummary, Termination};
use crate::config::SimConfig;
use crate::netsim::{ConvergenceTracker, NodeId, Reporter, Topology, TopologyError, UNREACHABLE};
use crate::{Error, Stopper};
use log::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Run one Bellman-Ford relaxation pass on the row of `node`, while holding the guard of that
/// row. The change flag of `node` is cleared when the pass starts, and set again if any entry
/// improved. Returns true if the row changed.
///
/// Costs never grow during a pass, and the cost of `node` to itself stays 0.
pub fn relax_row(topology: &Topology, tracker: &ConvergenceTracker, node: NodeId) -> Result<bool, TopologyError> {
    let mut row = topology.lock_row(node)?;
    tracker.clear(node);

    let mut changed = false;
    for dest in 0..topology.num_nodes() {
        let current = row.get(dest)?;
        let mut min_cost = current;
        for neighbor in 0..topology.num_nodes() {
            let to_neighbor = row.get(neighbor)?;
            if to_neighbor == 0 || to_neighbor == UNREACHABLE {
                continue;
            }
            let candidate = to_neighbor.saturating_add(topology.neighbor_cost(neighbor, dest)?);
            if candidate < min_cost {
                min_cost = candidate;
            }
        }
        if min_cost < current {
            row.set(dest, min_cost)?;
            changed = true;
        }
    }

    if changed {
        tracker.mark_changed(node);
    }
    Ok(changed)
}

/// # Router Agent
///
/// Drives the distance vector of a single router. Each pass the agent
///
/// 1. relaxes its own row ([`relax_row`]),
/// 2. gives the [`Perturber`] a chance to change a random link,
/// 3. prints the matrix,
/// 4. sleeps for a random delay.
///
/// As long as its own row keeps changing, the agent stays [`AgentState::Relaxing`]. Once a pass
/// leaves its flag cleared, the agent is [`AgentState::ConvergedLocally`] and looks at the flags
/// of all routers: if none is set it terminates, otherwise it continues relaxing. A perturbation
/// may flag a router that already stopped, so the own flag alone is never enough to leave.
pub struct RouterAgent {
    id: NodeId,
    topology: Arc<Topology>,
    tracker: Arc<ConvergenceTracker>,
    perturber: Perturber,
    reporter: Reporter,
    rng: StdRng,
    delay_unit: Duration,
    max_delay_units: u32,
    max_passes: Option<usize>,
    stopper: Stopper,
    state: AgentState,
    passes: usize,
    perturbations: usize,
}

impl RouterAgent {
    /// Create the agent of router `id`. The configuration is expected to be valid.
    pub fn new(
        id: NodeId,
        topology: Arc<Topology>,
        tracker: Arc<ConvergenceTracker>,
        config: &SimConfig,
        stopper: Stopper,
    ) -> Result<Self, Error> {
        if id >= topology.num_nodes() || id >= tracker.num_nodes() {
            return Err(TopologyError::NodeOutOfRange(id).into());
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            id,
            topology,
            tracker,
            perturber: Perturber::from_config(config),
            reporter: Reporter::new(config.report),
            rng,
            delay_unit: config.delay_unit,
            max_delay_units: config.max_delay_units,
            max_passes: config.max_passes,
            stopper,
            state: AgentState::Relaxing,
            passes: 0,
            perturbations: 0,
        })
    }

    /// The router driven by this agent
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current state of the agent
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Run the agent until it terminates, and return its statistics.
    pub fn run(mut self) -> Result<AgentSummary, Error> {
        self.reporter.router_started(self.id);
        let termination = loop {
            if let AgentState::Terminated(termination) = self.state {
                break termination;
            }
            self.step()?;
        };
        self.reporter.router_finished(self.id);
        debug!("router {} stopped after {} passes: {:?}", self.id, self.passes, termination);

        Ok(AgentSummary {
            node: self.id,
            passes: self.passes,
            perturbations: self.perturbations,
            termination,
        })
    }

    /// Perform a single transition of the state machine.
    pub fn step(&mut self) -> Result<AgentState, Error> {
        self.state = match self.state {
            AgentState::Relaxing => {
                if self.stopper.is_stop() {
                    AgentState::Terminated(Termination::Stopped)
                } else if self.max_passes.map(|max| self.passes >= max).unwrap_or(false) {
                    warn!("router {} reached the pass cap of {}", self.id, self.passes);
                    AgentState::Terminated(Termination::PassCap)
                } else {
                    self.pass()?;
                    if self.tracker.is_changed(self.id) {
                        AgentState::Relaxing
                    } else {
                        AgentState::ConvergedLocally
                    }
                }
            }
            AgentState::ConvergedLocally => {
                if self.tracker.any_changed() {
                    AgentState::Relaxing
                } else {
                    AgentState::Terminated(Termination::Converged)
                }
            }
            terminated @ AgentState::Terminated(_) => terminated,
        };
        Ok(self.state)
    }

    fn pass(&mut self) -> Result<(), Error> {
        let changed = relax_row(&self.topology, &self.tracker, self.id)?;
        self.passes += 1;
        debug!("router {} pass {}: changed = {}", self.id, self.passes, changed);

        if let Some(p) = self.perturber.maybe_perturb(&self.topology, &self.tracker, &mut self.rng)? {
            self.perturbations += 1;
            debug!("router {} perturbed {}", self.id, p);
            self.reporter.link_changed(p.a, p.b, p.cost);
        }

        self.reporter.print_matrix(&self.topology);

        let units: u32 = self.rng.gen_range(0, self.max_delay_units + 1);
        let delay = self.delay_unit * units;
        if delay > Duration::from_secs(0) {
            thread::sleep(delay);
        }
        Ok(())
    }
}
