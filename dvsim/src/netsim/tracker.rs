use super::types::NodeId;
use std::sync::atomic::{AtomicBool, Ordering};

/// One "changed" flag per router, used to decide when the network has settled.
///
/// A flag is cleared by its router at the start of every relaxation pass, and set whenever the
/// pass modified the row, or when a perturbation changed a link of that router.
#[derive(Debug)]
pub struct ConvergenceTracker {
    changed: Vec<AtomicBool>,
}

impl ConvergenceTracker {
    /// Create a tracker for `num_nodes` routers, with all flags cleared.
    pub fn new(num_nodes: usize) -> Self {
        Self { changed: (0..num_nodes).map(|_| AtomicBool::new(false)).collect() }
    }

    /// Flag `node` as changed.
    ///
    /// # Panics
    /// Panics if `node` is not a router of the network.
    pub fn mark_changed(&self, node: NodeId) {
        self.changed[node].store(true, Ordering::SeqCst);
    }

    /// Clear the flag of `node`.
    ///
    /// # Panics
    /// Panics if `node` is not a router of the network.
    pub fn clear(&self, node: NodeId) {
        self.changed[node].store(false, Ordering::SeqCst);
    }

    /// Returns true if the flag of `node` is set
    pub fn is_changed(&self, node: NodeId) -> bool {
        self.changed.get(node).map(|flag| flag.load(Ordering::SeqCst)).unwrap_or(false)
    }

    /// Number of routers tracked
    pub fn num_nodes(&self) -> usize {
        self.changed.len()
    }

    /// Returns true if any router has a change that is not yet settled. The flags are read one
    /// after the other, without stopping any router in between.
    pub fn any_changed(&self) -> bool {
        self.changed.iter().any(|flag| flag.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flags() {
        let tracker = ConvergenceTracker::new(3);
        assert!(!tracker.any_changed());
        tracker.mark_changed(1);
        assert!(tracker.is_changed(1));
        assert!(!tracker.is_changed(0));
        assert!(tracker.any_changed());
        tracker.clear(1);
        assert!(!tracker.any_changed());
    }

    #[test]
    #[should_panic]
    fn test_unknown_node() {
        let tracker = ConvergenceTracker::new(2);
        tracker.mark_changed(5);
    }
}
