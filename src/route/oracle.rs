//! Exhaustive Steiner tree cost for small graphs.

use crate::network::Graph;

/// Cheapest edge subset connecting the start to every destination.
///
/// Enumerates all `2^n_edges` subsets; keep graphs small.
pub(crate) fn steiner_cost(graph: &Graph) -> Option<i64> {
    let edges = graph.edges();
    assert!(edges.len() <= 20, "oracle is exponential in the edge count");

    let mut best: Option<i64> = None;
    for mask in 0u32..(1 << edges.len()) {
        let cost: i64 = edges
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, e)| e.cost)
            .sum();
        if best.is_some_and(|b| cost >= b) {
            continue;
        }

        let mut parent: Vec<usize> = (0..=graph.graph_size()).collect();
        for (i, e) in edges.iter().enumerate() {
            if mask & (1 << i) != 0 {
                let (a, b) = (find(&mut parent, e.from), find(&mut parent, e.to));
                parent[a] = b;
            }
        }
        let root = find(&mut parent, graph.start());
        if graph.dest().iter().all(|&d| find(&mut parent, d) == root) {
            best = Some(cost);
        }
    }
    best
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances::Example;
    use crate::network::Edge;

    #[test]
    fn test_oracle_on_bundled_examples() {
        for example in Example::all() {
            assert_eq!(
                steiner_cost(&example.graph()),
                Some(example.optimal_cost()),
                "{}",
                example.name()
            );
        }
    }

    #[test]
    fn test_oracle_disconnected() {
        let edges = vec![Edge::new(1, 2, 1), Edge::new(2, 3, 1)];
        let graph = Graph::new(4, 1, vec![4], edges).unwrap();
        assert_eq!(steiner_cost(&graph), None);
    }
}
