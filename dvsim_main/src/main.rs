//! Runs the distance-vector simulation on the seed network, with the default parameters.

use dvsim::example_networks::{ExampleNetwork, SeedNetwork};
use dvsim::routing::{Executor, ThreadedExec};
use dvsim::{Error, SimConfig, Stopper};
use log::*;
use std::sync::Arc;

fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let topology = Arc::new(SeedNetwork::net()?);
    let summary = ThreadedExec::new(SimConfig::default(), Stopper::new()).execute(&topology)?;

    for agent in summary.agents.iter() {
        info!(
            "router {}: {} passes, {} perturbations, {:?}",
            agent.node, agent.passes, agent.perturbations, agent.termination
        );
    }
    Ok(())
}
