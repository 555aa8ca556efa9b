//! Undirected weighted graph with a start node and destinations.

use std::fmt;

/// Node identifier, `1..=graph_size`.
pub type NodeId = usize;

/// Largest accepted `graph_size`.
pub const MAX_GRAPH_SIZE: usize = 1 << 20;

/// Undirected edge `{from, to}` with a non-negative cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: i64,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, cost: i64) -> Self {
        Self { from, to, cost }
    }
}

/// Raw, unvalidated problem description.
///
/// Edges are given as parallel arrays, the way problem files list them.
/// Convert with [`Graph::try_from`] to validate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSpec {
    /// Number of nodes; nodes are numbered `1..=graph_size`.
    pub graph_size: usize,
    /// Node every path starts from.
    pub start: NodeId,
    /// Nodes that must be reached.
    pub dest: Vec<NodeId>,
    /// First endpoint of each edge.
    pub from: Vec<NodeId>,
    /// Second endpoint of each edge.
    pub to: Vec<NodeId>,
    /// Cost of each edge.
    pub cost: Vec<i64>,
}

/// Which part of the input a node reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Start,
    Destination,
    EdgeEndpoint { edge: usize },
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Start => write!(f, "start"),
            NodeRole::Destination => write!(f, "destination"),
            NodeRole::EdgeEndpoint { edge } => write!(f, "endpoint of edge #{edge}"),
        }
    }
}

/// Malformed graph input, rejected before any model is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// `from`, `to` and `cost` differ in length.
    LengthMismatch { from: usize, to: usize, cost: usize },
    /// `graph_size` is zero.
    EmptyGraph,
    /// `graph_size` exceeds [`MAX_GRAPH_SIZE`].
    TooManyNodes { graph_size: usize, max: usize },
    /// The destination list is empty.
    NoDestinations,
    /// A node lies outside `1..=graph_size`.
    NodeOutOfRange {
        role: NodeRole,
        node: NodeId,
        graph_size: usize,
    },
    /// A destination is listed twice.
    DuplicateDestination(NodeId),
    /// An edge has a negative cost.
    NegativeCost { edge: usize, cost: i64 },
    /// Costs are too large for the flow-cost bound to fit in an `i64`.
    CostOverflow,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::LengthMismatch { from, to, cost } => write!(
                f,
                "edge arrays differ in length: from has {from}, to has {to}, cost has {cost}"
            ),
            GraphError::EmptyGraph => write!(f, "graph has no nodes"),
            GraphError::TooManyNodes { graph_size, max } => {
                write!(f, "graph size {graph_size} exceeds the limit of {max} nodes")
            }
            GraphError::NoDestinations => write!(f, "no destinations given"),
            GraphError::NodeOutOfRange {
                role,
                node,
                graph_size,
            } => write!(f, "{role} node {node} is outside 1..={graph_size}"),
            GraphError::DuplicateDestination(node) => {
                write!(f, "destination {node} is listed more than once")
            }
            GraphError::NegativeCost { edge, cost } => {
                write!(f, "edge #{edge} has negative cost {cost}")
            }
            GraphError::CostOverflow => write!(f, "edge costs overflow the cost bound"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Checks `graph_size` before anything is sized by it.
pub(crate) fn check_graph_size(graph_size: usize) -> Result<(), GraphError> {
    if graph_size == 0 {
        Err(GraphError::EmptyGraph)
    } else if graph_size > MAX_GRAPH_SIZE {
        Err(GraphError::TooManyNodes {
            graph_size,
            max: MAX_GRAPH_SIZE,
        })
    } else {
        Ok(())
    }
}

/// Validated, immutable problem graph.
///
/// # Examples
///
/// ```
/// use u_flowpath::network::{Edge, Graph};
///
/// let graph = Graph::new(3, 1, vec![3], vec![Edge::new(1, 2, 4), Edge::new(2, 3, 1)]).unwrap();
/// assert_eq!(graph.n_dests(), 1);
/// assert_eq!(graph.total_edge_cost(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GraphSpec", into = "GraphSpec")
)]
pub struct Graph {
    graph_size: usize,
    start: NodeId,
    dest: Vec<NodeId>,
    edges: Vec<Edge>,
    total_edge_cost: i64,
}

impl Graph {
    /// Validates and builds a graph.
    pub fn new(
        graph_size: usize,
        start: NodeId,
        dest: Vec<NodeId>,
        edges: Vec<Edge>,
    ) -> Result<Self, GraphError> {
        check_graph_size(graph_size)?;
        let in_range = |role: NodeRole, node: NodeId| {
            if (1..=graph_size).contains(&node) {
                Ok(())
            } else {
                Err(GraphError::NodeOutOfRange {
                    role,
                    node,
                    graph_size,
                })
            }
        };

        in_range(NodeRole::Start, start)?;
        if dest.is_empty() {
            return Err(GraphError::NoDestinations);
        }
        let mut seen = vec![false; graph_size + 1];
        for &d in &dest {
            in_range(NodeRole::Destination, d)?;
            if std::mem::replace(&mut seen[d], true) {
                return Err(GraphError::DuplicateDestination(d));
            }
        }

        let mut total_edge_cost: i64 = 0;
        for (i, edge) in edges.iter().enumerate() {
            in_range(NodeRole::EdgeEndpoint { edge: i }, edge.from)?;
            in_range(NodeRole::EdgeEndpoint { edge: i }, edge.to)?;
            if edge.cost < 0 {
                return Err(GraphError::NegativeCost {
                    edge: i,
                    cost: edge.cost,
                });
            }
            total_edge_cost = total_edge_cost
                .checked_add(edge.cost)
                .ok_or(GraphError::CostOverflow)?;
        }
        // the flow-cost variable ranges up to n_dests * total, doubled for both directions
        i64::try_from(dest.len())
            .ok()
            .and_then(|n| total_edge_cost.checked_mul(n))
            .and_then(|c| c.checked_mul(2))
            .ok_or(GraphError::CostOverflow)?;

        Ok(Self {
            graph_size,
            start,
            dest,
            edges,
            total_edge_cost,
        })
    }

    pub fn graph_size(&self) -> usize {
        self.graph_size
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Destinations in input order.
    pub fn dest(&self) -> &[NodeId] {
        &self.dest
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn n_dests(&self) -> usize {
        self.dest.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Sum of all edge costs, the largest cost a route can have.
    pub fn total_edge_cost(&self) -> i64 {
        self.total_edge_cost
    }

    /// All node ids, `1..=graph_size`.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        1..=self.graph_size
    }

    /// Back to raw parallel arrays.
    pub fn to_spec(&self) -> GraphSpec {
        GraphSpec {
            graph_size: self.graph_size,
            start: self.start,
            dest: self.dest.clone(),
            from: self.edges.iter().map(|e| e.from).collect(),
            to: self.edges.iter().map(|e| e.to).collect(),
            cost: self.edges.iter().map(|e| e.cost).collect(),
        }
    }
}

impl TryFrom<GraphSpec> for Graph {
    type Error = GraphError;

    fn try_from(spec: GraphSpec) -> Result<Self, Self::Error> {
        if spec.from.len() != spec.to.len() || spec.from.len() != spec.cost.len() {
            return Err(GraphError::LengthMismatch {
                from: spec.from.len(),
                to: spec.to.len(),
                cost: spec.cost.len(),
            });
        }
        let edges = spec
            .from
            .iter()
            .zip(&spec.to)
            .zip(&spec.cost)
            .map(|((&from, &to), &cost)| Edge { from, to, cost })
            .collect();
        Graph::new(spec.graph_size, spec.start, spec.dest, edges)
    }
}

impl From<Graph> for GraphSpec {
    fn from(graph: Graph) -> Self {
        graph.to_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GraphSpec {
        GraphSpec {
            graph_size: 4,
            start: 1,
            dest: vec![3, 4],
            from: vec![1, 2, 2],
            to: vec![2, 3, 4],
            cost: vec![5, 1, 2],
        }
    }

    #[test]
    fn test_valid_spec() {
        let graph = Graph::try_from(spec()).unwrap();
        assert_eq!(graph.graph_size(), 4);
        assert_eq!(graph.start(), 1);
        assert_eq!(graph.dest(), &[3, 4]);
        assert_eq!(graph.n_edges(), 3);
        assert_eq!(graph.edges()[1], Edge::new(2, 3, 1));
        assert_eq!(graph.total_edge_cost(), 8);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(graph.to_spec(), spec());
    }

    #[test]
    fn test_length_mismatch() {
        let mut s = spec();
        s.cost.pop();
        assert_eq!(
            Graph::try_from(s),
            Err(GraphError::LengthMismatch {
                from: 3,
                to: 3,
                cost: 2
            })
        );
    }

    #[test]
    fn test_empty_and_no_destinations() {
        let mut s = spec();
        s.graph_size = 0;
        assert_eq!(Graph::try_from(s), Err(GraphError::EmptyGraph));

        let mut s = spec();
        s.dest.clear();
        assert_eq!(Graph::try_from(s), Err(GraphError::NoDestinations));
    }

    #[test]
    fn test_graph_size_limit() {
        let mut s = spec();
        s.graph_size = usize::MAX;
        assert_eq!(
            Graph::try_from(s),
            Err(GraphError::TooManyNodes {
                graph_size: usize::MAX,
                max: MAX_GRAPH_SIZE
            })
        );

        let mut s = spec();
        s.graph_size = 100_000_000_000;
        let err = Graph::try_from(s).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("graph size 100000000000 exceeds the limit of {MAX_GRAPH_SIZE} nodes")
        );

        let mut s = spec();
        s.graph_size = MAX_GRAPH_SIZE;
        assert!(Graph::try_from(s).is_ok());
    }

    #[test]
    fn test_node_out_of_range() {
        let mut s = spec();
        s.start = 0;
        assert!(matches!(
            Graph::try_from(s),
            Err(GraphError::NodeOutOfRange {
                role: NodeRole::Start,
                node: 0,
                ..
            })
        ));

        let mut s = spec();
        s.dest = vec![5];
        assert!(matches!(
            Graph::try_from(s),
            Err(GraphError::NodeOutOfRange {
                role: NodeRole::Destination,
                ..
            })
        ));

        let mut s = spec();
        s.to[2] = 9;
        let err = Graph::try_from(s).unwrap_err();
        assert_eq!(err.to_string(), "endpoint of edge #2 node 9 is outside 1..=4");
    }

    #[test]
    fn test_duplicate_destination() {
        let mut s = spec();
        s.dest = vec![3, 4, 3];
        assert_eq!(
            Graph::try_from(s),
            Err(GraphError::DuplicateDestination(3))
        );
    }

    #[test]
    fn test_negative_cost() {
        let mut s = spec();
        s.cost[1] = -1;
        assert_eq!(
            Graph::try_from(s),
            Err(GraphError::NegativeCost { edge: 1, cost: -1 })
        );
    }

    #[test]
    fn test_cost_overflow() {
        let mut s = spec();
        s.cost = vec![i64::MAX, 1, 0];
        assert_eq!(Graph::try_from(s), Err(GraphError::CostOverflow));

        let mut s = spec();
        s.cost = vec![i64::MAX / 3, 0, 0];
        assert_eq!(Graph::try_from(s), Err(GraphError::CostOverflow));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_goes_through_validation() {
        let graph = Graph::try_from(spec()).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(serde_json::from_str::<Graph>(&json).unwrap(), graph);

        let bad = json.replace("\"start\":1", "\"start\":7");
        assert!(serde_json::from_str::<Graph>(&bad).is_err());
    }

    #[test]
    fn test_start_may_be_a_destination() {
        let mut s = spec();
        s.dest = vec![1, 3];
        assert!(Graph::try_from(s).is_ok());
    }
}
