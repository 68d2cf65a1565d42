use crate::config::SimConfig;
use crate::netsim::{ConvergenceTracker, Cost, NodeId, Topology, TopologyError};
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;

/// A single change of a link cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perturbation {
    /// First router of the link
    pub a: NodeId,
    /// Second router of the link, distinct from `a`
    pub b: NodeId,
    /// New cost of the link in both directions
    pub cost: Cost,
}

impl fmt::Display for Perturbation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link {} <-> {} := {}", self.a, self.b, self.cost)
    }
}

/// Randomly rewrites the cost of a link, simulating a change of the physical network. This is
/// the only way a cost in the matrix can grow.
#[derive(Debug, Clone)]
pub struct Perturber {
    probability: f64,
    cost_range: RangeInclusive<Cost>,
}

impl Perturber {
    /// Create a new perturber. `probability` must be within `[0, 1]`, see
    /// [`SimConfig::validate`].
    pub fn new(probability: f64, cost_range: RangeInclusive<Cost>) -> Self {
        Self { probability, cost_range }
    }

    /// Create the perturber described by the configuration
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.perturbation_probability, config.cost_range.clone())
    }

    /// Returns true if this perturber never changes anything
    pub fn is_disabled(&self) -> bool {
        self.probability <= 0.0
    }

    /// With the configured probability, pick and apply a random perturbation. Returns the applied
    /// perturbation, or `None` if the network was left unchanged.
    pub fn maybe_perturb<R: Rng>(
        &self,
        topology: &Topology,
        tracker: &ConvergenceTracker,
        rng: &mut R,
    ) -> Result<Option<Perturbation>, TopologyError> {
        if self.is_disabled() || !rng.gen_bool(self.probability) {
            return Ok(None);
        }
        match self.pick(topology.num_nodes(), rng) {
            Some(perturbation) => {
                Self::apply(topology, tracker, perturbation)?;
                Ok(Some(perturbation))
            }
            None => Ok(None),
        }
    }

    /// Choose two distinct routers and a new cost, uniformly at random. Returns `None` if the
    /// network has less than two routers.
    pub fn pick<R: Rng>(&self, num_nodes: usize, rng: &mut R) -> Option<Perturbation> {
        if num_nodes < 2 {
            return None;
        }
        let a = rng.gen_range(0, num_nodes);
        let mut b = rng.gen_range(0, num_nodes - 1);
        if b >= a {
            b += 1;
        }
        let cost = rng.gen_range(*self.cost_range.start(), *self.cost_range.end() + 1);
        Some(Perturbation { a, b, cost })
    }

    /// Write the perturbation into the topology and flag both routers as changed.
    pub fn apply(
        topology: &Topology,
        tracker: &ConvergenceTracker,
        perturbation: Perturbation,
    ) -> Result<(), TopologyError> {
        let Perturbation { a, b, cost } = perturbation;
        topology.update_edge(a, b, cost)?;
        tracker.mark_changed(a);
        tracker.mark_changed(b);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::netsim::NUM_NODES;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_distinct_and_in_range() {
        let perturber = Perturber::new(1.0, 1..=10);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = perturber.pick(NUM_NODES, &mut rng).unwrap();
            assert_ne!(p.a, p.b);
            assert!(p.a < NUM_NODES && p.b < NUM_NODES);
            assert!(p.cost >= 1 && p.cost <= 10);
        }
    }

    #[test]
    fn test_pick_too_small() {
        let perturber = Perturber::new(1.0, 1..=10);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(perturber.pick(1, &mut rng), None);
    }

    #[test]
    fn test_always_perturb() {
        let topology = Topology::new(NUM_NODES);
        let tracker = ConvergenceTracker::new(NUM_NODES);
        let perturber = Perturber::new(1.0, 3..=3);
        let mut rng = StdRng::seed_from_u64(7);
        let p = perturber.maybe_perturb(&topology, &tracker, &mut rng).unwrap().unwrap();
        assert_eq!(p.cost, 3);
        assert_eq!(topology.read_row(p.a).unwrap()[p.b], 3);
        assert_eq!(topology.read_row(p.b).unwrap()[p.a], 3);
        assert!(tracker.is_changed(p.a));
        assert!(tracker.is_changed(p.b));
    }

    #[test]
    fn test_never_perturb() {
        let topology = Topology::new(NUM_NODES);
        let tracker = ConvergenceTracker::new(NUM_NODES);
        let perturber = Perturber::new(0.0, 1..=10);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(perturber.maybe_perturb(&topology, &tracker, &mut rng).unwrap(), None);
        }
        assert!(!tracker.any_changed());
    }
}
