use super::topology::Topology;
use super::types::{Cost, NodeId, UNREACHABLE};
use itertools::Itertools;
use std::io::Write;

/// Prints the state of the network to stdout.
///
/// The reporter keeps no state besides whether it is enabled. Matrix snapshots are taken while
/// other routers keep relaxing, so they are only meant for observation.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    enabled: bool,
}

impl Reporter {
    /// Create a new reporter. A disabled reporter prints nothing.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Render the distance vectors, one router per line, with unreachable entries shown as `INF`.
    pub fn render(matrix: &[Vec<Cost>]) -> String {
        let mut out = String::from("Router Distance Vectors:\n");
        for (node, row) in matrix.iter().enumerate() {
            let costs = row
                .iter()
                .map(|c| if *c == UNREACHABLE { "INF".to_string() } else { c.to_string() })
                .join(" ");
            out.push_str(&format!("Router {}: {}\n", node, costs));
        }
        out
    }

    /// Print the current distance vectors of all routers
    pub fn print_matrix(&self, topology: &Topology) {
        if self.enabled {
            self.emit(&Self::render(&topology.snapshot()));
        }
    }

    /// Announce that a router starts its computation
    pub fn router_started(&self, node: NodeId) {
        if self.enabled {
            self.emit(&format!("Router {} starts recalculating its distance vector...\n", node));
        }
    }

    /// Announce that a router stopped its computation
    pub fn router_finished(&self, node: NodeId) {
        if self.enabled {
            self.emit(&format!("Router {} finishes recalculating its distance vector.\n", node));
        }
    }

    /// Announce a change of a link cost
    pub fn link_changed(&self, a: NodeId, b: NodeId, cost: Cost) {
        if self.enabled {
            self.emit(&format!("Changing cost between Router {} and Router {} to {}\n", a, b, cost));
        }
    }

    // one lock per block, so concurrent routers never interleave their lines
    fn emit(&self, text: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(text.as_bytes());
        let _ = handle.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() {
        let matrix = vec![vec![0, 3, UNREACHABLE], vec![3, 0, 1], vec![UNREACHABLE, 1, 0]];
        assert_eq!(
            Reporter::render(&matrix),
            "Router Distance Vectors:\nRouter 0: 0 3 INF\nRouter 1: 3 0 1\nRouter 2: INF 1 0\n"
        );
    }
}
