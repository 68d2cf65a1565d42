//! # Routing
//!
//! The concurrent side of the simulator: one [`RouterAgent`] per router relaxing its distance
//! vector, the [`Perturber`] injecting link changes, and the [`Executor`]s driving the agents.

mod agent;
mod executor;
mod perturber;
mod types;

pub use agent::{relax_row, RouterAgent};
pub use executor::{Executor, RoundRobinExec, ThreadedExec};
pub use perturber::{Perturbation, Perturber};
pub use types::{AgentState, AgentSummary, ExecutionSummary, Termination};
