//! Bundled problems and random graph generation.

use crate::network::{check_graph_size, Edge, Graph, GraphError, GraphSpec, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Small problems with known optimal costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Example {
    /// One destination; the answer is the shortest path 1-3-5-4-6.
    Single,
    /// Two destinations sharing the prefix 1-3-5.
    SharedPrefix,
    /// Two destinations on a denser graph.
    Dense,
    /// Dense graph, start 5, three destinations.
    ThreeDestinations,
    /// Sparse graph, start 3, four destinations.
    FourDestinations,
    /// Eight nodes where the best tree branches twice.
    Branching,
}

const SPARSE_FROM: [NodeId; 7] = [1, 1, 2, 2, 3, 4, 4];
const SPARSE_TO: [NodeId; 7] = [2, 3, 3, 4, 5, 5, 6];
const SPARSE_COST: [i64; 7] = [4, 2, 5, 10, 3, 4, 11];

const DENSE_FROM: [NodeId; 9] = [1, 1, 1, 2, 2, 3, 3, 3, 4];
const DENSE_TO: [NodeId; 9] = [2, 3, 4, 3, 5, 4, 5, 6, 6];
const DENSE_COST: [i64; 9] = [6, 1, 5, 5, 3, 5, 6, 4, 2];

impl Example {
    pub fn all() -> [Example; 6] {
        [
            Example::Single,
            Example::SharedPrefix,
            Example::Dense,
            Example::ThreeDestinations,
            Example::FourDestinations,
            Example::Branching,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Example::Single => "single",
            Example::SharedPrefix => "shared-prefix",
            Example::Dense => "dense",
            Example::ThreeDestinations => "three-destinations",
            Example::FourDestinations => "four-destinations",
            Example::Branching => "branching",
        }
    }

    /// Looks an example up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Example> {
        Example::all().into_iter().find(|e| e.name() == name)
    }

    /// Cost of the optimal route.
    pub fn optimal_cost(self) -> i64 {
        match self {
            Example::Single | Example::SharedPrefix | Example::FourDestinations => 20,
            Example::Dense | Example::ThreeDestinations => 11,
            Example::Branching => 8,
        }
    }

    pub fn spec(self) -> GraphSpec {
        let sparse = |start: NodeId, dest: &[NodeId]| GraphSpec {
            graph_size: 6,
            start,
            dest: dest.to_vec(),
            from: SPARSE_FROM.to_vec(),
            to: SPARSE_TO.to_vec(),
            cost: SPARSE_COST.to_vec(),
        };
        let dense = |start: NodeId, dest: &[NodeId]| GraphSpec {
            graph_size: 6,
            start,
            dest: dest.to_vec(),
            from: DENSE_FROM.to_vec(),
            to: DENSE_TO.to_vec(),
            cost: DENSE_COST.to_vec(),
        };
        match self {
            Example::Single => sparse(1, &[6]),
            Example::SharedPrefix => sparse(1, &[5, 6]),
            Example::Dense => dense(1, &[5, 6]),
            Example::ThreeDestinations => dense(5, &[1, 3, 6]),
            Example::FourDestinations => sparse(3, &[1, 4, 5, 6]),
            Example::Branching => GraphSpec {
                graph_size: 8,
                start: 1,
                dest: vec![5, 7, 8],
                from: vec![1, 1, 2, 2, 3, 3, 4, 4, 6],
                to: vec![2, 4, 5, 6, 5, 7, 6, 7, 8],
                cost: vec![1, 2, 2, 1, 2, 1, 2, 2, 1],
            },
        }
    }

    pub fn graph(self) -> Graph {
        match Graph::try_from(self.spec()) {
            Ok(graph) => graph,
            Err(e) => unreachable!("bundled example {} is invalid: {e}", self.name()),
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seeded random connected graph.
///
/// A random spanning tree guarantees connectivity; `extra_edges` more
/// edges join random distinct node pairs. Costs are drawn from
/// `1..=max_cost`. Destinations are distinct nodes other than the start,
/// at most `graph_size - 1` of them; a one-node graph gets the start as
/// its only destination.
///
/// # Examples
///
/// ```
/// use u_flowpath::instances::random_connected;
///
/// let graph = random_connected(7, 6, 3, 2, 10).unwrap();
/// assert_eq!(graph.n_edges(), 5 + 3);
/// assert_eq!(graph.n_dests(), 2);
/// ```
pub fn random_connected(
    seed: u64,
    graph_size: usize,
    extra_edges: usize,
    n_dests: usize,
    max_cost: i64,
) -> Result<Graph, GraphError> {
    check_graph_size(graph_size)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let max_cost = max_cost.max(1);
    let mut edges = Vec::with_capacity(graph_size - 1 + extra_edges);

    for v in 2..=graph_size {
        let parent = rng.random_range(1..v);
        edges.push(Edge::new(parent, v, rng.random_range(1..=max_cost)));
    }
    if graph_size > 1 {
        for _ in 0..extra_edges {
            let a = rng.random_range(1..=graph_size);
            let mut b = rng.random_range(1..graph_size);
            if b >= a {
                b += 1;
            }
            edges.push(Edge::new(a, b, rng.random_range(1..=max_cost)));
        }
    }

    let start = rng.random_range(1..=graph_size);
    let dest = if graph_size == 1 {
        vec![start]
    } else {
        let mut others: Vec<NodeId> = (1..=graph_size).filter(|&n| n != start).collect();
        others.shuffle(&mut rng);
        others.truncate(n_dests);
        others
    };
    Graph::new(graph_size, start, dest, edges)
}
