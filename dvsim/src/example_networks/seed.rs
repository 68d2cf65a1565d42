use super::ExampleNetwork;
use crate::netsim::{Cost, NodeId, NUM_NODES};

/// The five router network the simulator starts from:
///
/// ```text
///        1       3
///   0 ------ 1 ------ 3 ---- 4
///   |                 |   2
///   +-------- 2 ------+
///        5        1
/// ```
pub struct SeedNetwork {}

impl ExampleNetwork for SeedNetwork {
    fn num_nodes() -> usize {
        NUM_NODES
    }

    fn edges() -> Vec<(NodeId, NodeId, Cost)> {
        vec![(0, 1, 1), (0, 2, 5), (1, 3, 3), (2, 3, 1), (3, 4, 2)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::netsim::UNREACHABLE;

    #[test]
    fn test_seed_matrix() {
        let net = SeedNetwork::net().unwrap();
        assert_eq!(net.read_row(0).unwrap(), vec![0, 1, 5, UNREACHABLE, UNREACHABLE]);
        assert_eq!(net.read_row(3).unwrap(), vec![UNREACHABLE, 3, 1, 0, 2]);
        assert_eq!(net.read_row(4).unwrap(), vec![UNREACHABLE, UNREACHABLE, UNREACHABLE, 2, 0]);
    }

    #[test]
    fn test_seed_shortest_paths() {
        let d = SeedNetwork::shortest_paths();
        assert_eq!(d[0], vec![0, 1, 5, 4, 6]);
        assert_eq!(d[2], vec![5, 4, 0, 1, 3]);
    }
}
