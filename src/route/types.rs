//! Route result types.

use crate::cp::SearchStats;
use crate::network::{ArcRole, Direction, NetNode, NodeId};
use std::fmt;

/// A directed edge arc that carries flow in the returned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversedArc {
    pub from: NodeId,
    pub to: NodeId,
    /// Index of the input edge.
    pub edge: usize,
    pub direction: Direction,
    pub cost: i64,
    /// Units crossing the arc, one per destination served through it.
    pub flow: i64,
}

/// Flow and usage of one network arc in the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcAssignment {
    pub role: ArcRole,
    pub from: NetNode,
    pub to: NetNode,
    pub flow: i64,
    pub usage: i64,
}

/// Minimum-cost route from the start node to every destination.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Node every path starts from.
    pub start: NodeId,

    /// Total cost with each used edge charged once.
    pub cost: i64,

    /// Plain min-cost-flow cost, charging an edge once per unit of flow.
    pub flow_cost: i64,

    /// Edge arcs with non-zero flow, in branching order.
    pub arcs: Vec<TraversedArc>,

    /// Flow and usage of every edge arc, in branching order.
    pub assignments: Vec<ArcAssignment>,

    /// Flow entering the sink from each destination, in destination order.
    pub sink_flows: Vec<(NodeId, i64)>,

    /// Whether the search tree was exhausted, proving `cost` minimal.
    pub proven_optimal: bool,

    /// Search counters.
    pub stats: SearchStats,

    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl RouteResult {
    /// Nodes touched by the route, including the start, in ascending order.
    pub fn visited_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = std::iter::once(self.start)
            .chain(self.arcs.iter().flat_map(|a| [a.from, a.to]))
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Indices of the input edges the route pays for.
    pub fn used_edges(&self) -> Vec<usize> {
        let mut edges: Vec<usize> = self.arcs.iter().map(|a| a.edge).collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}

/// Lists the traversed arcs as `(1->3) (3->5) ...`.
impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({}->{})", arc.from, arc.to)?;
        }
        Ok(())
    }
}
