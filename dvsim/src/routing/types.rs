use crate::netsim::NodeId;

/// State of a single router agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// The agent keeps running relaxation passes
    Relaxing,
    /// The last pass left the row (and its change flag) untouched. The agent needs to check the
    /// flags of all other routers before it may stop.
    ConvergedLocally,
    /// The agent stopped
    Terminated(Termination),
}

/// Why an agent stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No router had a change flag set when the agent checked
    Converged,
    /// The agent reached the configured maximum number of passes
    PassCap,
    /// A stop was requested through the [`crate::Stopper`]
    Stopped,
}

/// Statistics of one agent after it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    /// The router driven by this agent
    pub node: NodeId,
    /// Number of relaxation passes
    pub passes: usize,
    /// Number of links changed by this agent
    pub perturbations: usize,
    /// Why the agent stopped
    pub termination: Termination,
}

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// One entry per router, ordered by router index
    pub agents: Vec<AgentSummary>,
}

impl ExecutionSummary {
    /// Returns true if every agent stopped because it observed a settled network
    pub fn converged(&self) -> bool {
        self.agents.iter().all(|a| a.termination == Termination::Converged)
    }

    /// Total number of perturbations of all agents
    pub fn perturbations(&self) -> usize {
        self.agents.iter().map(|a| a.perturbations).sum()
    }

    /// Largest number of passes of any agent
    pub fn max_passes(&self) -> usize {
        self.agents.iter().map(|a| a.passes).max().unwrap_or(0)
    }
}
