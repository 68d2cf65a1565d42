use super::types::*;
use itertools::iproduct;
use log::*;
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The distance vector of one router, together with the guard that serializes all writes to it.
#[derive(Debug)]
struct Row {
    guard: Mutex<()>,
    cost: Vec<AtomicU32>,
}

impl Row {
    fn new(node: NodeId, num_nodes: usize) -> Self {
        Self {
            guard: Mutex::new(()),
            cost: (0..num_nodes)
                .map(|dest| AtomicU32::new(if dest == node { 0 } else { UNREACHABLE }))
                .collect(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data of its own, every cell is atomic. A panic while holding it
        // cannot leave the row in a state that is worse than a torn relaxation pass.
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self, dest: NodeId) -> Cost {
        self.cost[dest].load(Ordering::Acquire)
    }

    fn store(&self, dest: NodeId, cost: Cost) {
        self.cost[dest].store(cost, Ordering::Release)
    }
}

/// # Topology
///
/// The shared cost matrix of the network. Row `i` is the distance vector of router `i`, i.e. the
/// cost router `i` believes it has to reach every other router. Every row carries its own guard:
///
/// - All writes to a row happen while holding the guard of that row.
/// - A write touching two rows ([`Topology::update_edge`]) acquires both guards in ascending
///   index order, at every call site.
/// - Reading a *foreign* row during relaxation ([`Topology::neighbor_cost`]) does not take its
///   guard. Such a read may observe a neighbor in the middle of its own pass, just like a router
///   may receive a stale advertisement from its neighbor.
///
/// The topology is constructed once, and then shared (usually behind an `Arc`) by all agents.
#[derive(Debug)]
pub struct Topology {
    rows: Vec<Row>,
}

impl Topology {
    /// Create a topology with `num_nodes` routers, where every router reaches only itself.
    pub fn new(num_nodes: usize) -> Self {
        Self { rows: (0..num_nodes).map(|node| Row::new(node, num_nodes)).collect() }
    }

    /// Create a topology of `num_nodes` routers and apply the given seed edges. Each edge
    /// `(a, b, cost)` is written in both directions.
    pub fn from_edges(num_nodes: usize, edges: &[(NodeId, NodeId, Cost)]) -> Result<Self, TopologyError> {
        let topology = Self::new(num_nodes);
        for (a, b, cost) in edges {
            topology.update_edge(*a, *b, *cost)?;
        }
        Ok(topology)
    }

    /// Returns the number of routers in the network
    pub fn num_nodes(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, node: NodeId) -> Result<&Row, TopologyError> {
        self.rows.get(node).ok_or(TopologyError::NodeOutOfRange(node))
    }

    fn check_node(&self, node: NodeId) -> Result<(), TopologyError> {
        self.row(node).map(|_| ())
    }

    /// Acquire exclusive access to the row of `node`. The row stays locked until the returned
    /// guard is dropped.
    pub fn lock_row(&self, node: NodeId) -> Result<RowGuard<'_>, TopologyError> {
        let row = self.row(node)?;
        let lock = row.lock();
        Ok(RowGuard { node, row, _lock: lock })
    }

    /// Returns a consistent snapshot of the distance vector of `node`, taken under its guard.
    pub fn read_row(&self, node: NodeId) -> Result<Vec<Cost>, TopologyError> {
        Ok(self.lock_row(node)?.to_vec())
    }

    /// Returns the cost `neighbor` currently advertises towards `dest`. The guard of `neighbor` is
    /// not taken, so the value may belong to a pass that is still in progress.
    pub fn neighbor_cost(&self, neighbor: NodeId, dest: NodeId) -> Result<Cost, TopologyError> {
        self.check_node(dest)?;
        Ok(self.row(neighbor)?.load(dest))
    }

    /// Overwrite a single entry of the row of `node`, under its guard.
    pub fn update_cost(&self, node: NodeId, dest: NodeId, cost: Cost) -> Result<(), TopologyError> {
        self.lock_row(node)?.set(dest, cost)
    }

    /// Set the cost of the link between `a` and `b` in both directions. Both guards are taken in
    /// ascending index order and released in reverse order.
    pub fn update_edge(&self, a: NodeId, b: NodeId, cost: Cost) -> Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        if cost == 0 || cost > UNREACHABLE {
            return Err(TopologyError::InvalidCost(cost));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (low_row, high_row) = (self.row(low)?, self.row(high)?);

        trace!("update_edge({}, {}): locking {} then {}", a, b, low, high);
        let low_lock = low_row.lock();
        let high_lock = high_row.lock();
        low_row.store(high, cost);
        high_row.store(low, cost);
        drop(high_lock);
        drop(low_lock);
        Ok(())
    }

    /// Snapshot of the whole matrix. Every row is consistent on its own, but rows may belong to
    /// different points in time.
    pub fn snapshot(&self) -> Vec<Vec<Cost>> {
        self.rows.iter().map(|row| {
            let _lock = row.lock();
            (0..row.cost.len()).map(|dest| row.load(dest)).collect()
        }).collect()
    }

    /// Returns true if no entry of the matrix can be improved by going through any other router,
    /// i.e. `cost[i][j] <= cost[i][k] + cost[k][j]` for every reachable pair.
    pub fn is_shortest_path_closed(&self) -> bool {
        let m = self.snapshot();
        let n = self.num_nodes();
        iproduct!(0..n, 0..n, 0..n).all(|(i, j, k)| {
            m[i][k] == UNREACHABLE || m[k][j] == UNREACHABLE || m[i][j] <= m[i][k] + m[k][j]
        })
    }

    /// Compute the true shortest-path costs of an undirected network with the given edges, using
    /// Dijkstra from every router. Pairs without a path are set to [`UNREACHABLE`].
    pub fn reference_distances(num_nodes: usize, edges: &[(NodeId, NodeId, Cost)]) -> Vec<Vec<Cost>> {
        let mut graph = UnGraph::<NodeId, Cost>::new_undirected();
        let nodes: Vec<NodeIndex> = (0..num_nodes).map(|n| graph.add_node(n)).collect();
        let mut weights: HashMap<(NodeId, NodeId), Cost> = HashMap::new();
        for (a, b, cost) in edges {
            // later writes to the same link overwrite earlier ones
            weights.insert((*a.min(b), *a.max(b)), *cost);
        }
        for ((a, b), cost) in weights {
            graph.add_edge(nodes[a], nodes[b], cost);
        }

        nodes
            .iter()
            .map(|src| {
                let dist = dijkstra(&graph, *src, None, |e| *e.weight());
                nodes.iter().map(|dst| dist.get(dst).copied().unwrap_or(UNREACHABLE)).collect()
            })
            .collect()
    }
}

/// Exclusive access to the distance vector of one router. The row is unlocked when the guard is
/// dropped.
#[derive(Debug)]
pub struct RowGuard<'a> {
    node: NodeId,
    row: &'a Row,
    _lock: MutexGuard<'a, ()>,
}

impl<'a> RowGuard<'a> {
    /// The router owning this row
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current cost towards `dest`
    pub fn get(&self, dest: NodeId) -> Result<Cost, TopologyError> {
        if dest >= self.row.cost.len() {
            return Err(TopologyError::NodeOutOfRange(dest));
        }
        Ok(self.row.load(dest))
    }

    /// Overwrite the cost towards `dest`. The cost towards the router itself cannot be changed.
    pub fn set(&mut self, dest: NodeId, cost: Cost) -> Result<(), TopologyError> {
        if dest >= self.row.cost.len() {
            return Err(TopologyError::NodeOutOfRange(dest));
        }
        if dest == self.node {
            return Err(TopologyError::SelfLoop(dest));
        }
        if cost > UNREACHABLE {
            return Err(TopologyError::InvalidCost(cost));
        }
        self.row.store(dest, cost);
        Ok(())
    }

    /// Copy of the whole row
    pub fn to_vec(&self) -> Vec<Cost> {
        (0..self.row.cost.len()).map(|dest| self.row.load(dest)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_init() {
        let t = Topology::new(NUM_NODES);
        for i in 0..NUM_NODES {
            let row = t.read_row(i).unwrap();
            for j in 0..NUM_NODES {
                assert_eq!(row[j], if i == j { 0 } else { UNREACHABLE });
            }
        }
    }

    #[test]
    fn test_edge_symmetric() {
        let t = Topology::new(NUM_NODES);
        t.update_edge(3, 1, 7).unwrap();
        assert_eq!(t.read_row(1).unwrap()[3], 7);
        assert_eq!(t.read_row(3).unwrap()[1], 7);
        t.update_edge(1, 3, 2).unwrap();
        assert_eq!(t.read_row(1).unwrap()[3], 2);
        assert_eq!(t.read_row(3).unwrap()[1], 2);
    }

    #[test]
    fn test_out_of_range() {
        let t = Topology::new(NUM_NODES);
        assert_eq!(t.read_row(5).unwrap_err(), TopologyError::NodeOutOfRange(5));
        assert_eq!(t.update_edge(0, 7, 1).unwrap_err(), TopologyError::NodeOutOfRange(7));
        assert_eq!(t.update_cost(9, 0, 1).unwrap_err(), TopologyError::NodeOutOfRange(9));
        assert_eq!(t.update_cost(0, 9, 1).unwrap_err(), TopologyError::NodeOutOfRange(9));
        assert_eq!(t.neighbor_cost(0, 5).unwrap_err(), TopologyError::NodeOutOfRange(5));
        assert_eq!(t.neighbor_cost(5, 0).unwrap_err(), TopologyError::NodeOutOfRange(5));
    }

    #[test]
    fn test_self_cost_protected() {
        let t = Topology::new(NUM_NODES);
        assert_eq!(t.update_edge(2, 2, 4).unwrap_err(), TopologyError::SelfLoop(2));
        assert_eq!(t.update_cost(2, 2, 4).unwrap_err(), TopologyError::SelfLoop(2));
        assert_eq!(t.read_row(2).unwrap()[2], 0);
    }

    #[test]
    fn test_invalid_cost() {
        let t = Topology::new(NUM_NODES);
        assert_eq!(t.update_edge(0, 1, 0).unwrap_err(), TopologyError::InvalidCost(0));
        assert_eq!(
            t.update_edge(0, 1, UNREACHABLE + 1).unwrap_err(),
            TopologyError::InvalidCost(UNREACHABLE + 1)
        );
    }

    #[test]
    fn test_row_guard() {
        let t = Topology::new(NUM_NODES);
        {
            let mut row = t.lock_row(4).unwrap();
            assert_eq!(row.node(), 4);
            row.set(0, 12).unwrap();
            assert_eq!(row.get(0).unwrap(), 12);
        }
        assert_eq!(t.neighbor_cost(4, 0).unwrap(), 12);
        // only the row of router 4 is changed
        assert_eq!(t.neighbor_cost(0, 4).unwrap(), UNREACHABLE);
    }

    #[test]
    fn test_reference_distances() {
        let d = Topology::reference_distances(4, &[(0, 1, 2), (1, 2, 2), (0, 2, 7)]);
        assert_eq!(d[0], vec![0, 2, 4, UNREACHABLE]);
        assert_eq!(d[2], vec![4, 2, 0, UNREACHABLE]);
        assert_eq!(d[3], vec![UNREACHABLE, UNREACHABLE, UNREACHABLE, 0]);
    }

    #[test]
    fn test_shortest_path_closed() {
        let t = Topology::from_edges(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 5)]).unwrap();
        assert!(!t.is_shortest_path_closed());
        t.update_cost(0, 2, 2).unwrap();
        t.update_cost(2, 0, 2).unwrap();
        assert!(t.is_shortest_path_closed());
    }
}
