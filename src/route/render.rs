//! Graphviz DOT rendering of a graph and its route.

use super::types::RouteResult;
use crate::network::{Direction, Graph, NodeId};
use petgraph::dot::Dot;
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Draws `graph` in DOT, highlighting the edges `route` pays for.
///
/// Edge labels are costs. Used edges are red and point the way the flow
/// goes. The start node is a box, destinations are double circles.
pub fn to_dot(graph: &Graph, route: Option<&RouteResult>) -> String {
    let mut g: UnGraph<NodeId, i64> =
        UnGraph::with_capacity(graph.graph_size(), graph.n_edges());
    let nodes: Vec<NodeIndex> = graph.nodes().map(|n| g.add_node(n)).collect();
    for e in graph.edges() {
        g.add_edge(nodes[e.from - 1], nodes[e.to - 1], e.cost);
    }

    let used: HashMap<usize, Direction> = route
        .map(|r| r.arcs.iter().map(|a| (a.edge, a.direction)).collect())
        .unwrap_or_default();

    let edge_attrs = |_: &UnGraph<NodeId, i64>, e: EdgeReference<'_, i64>| {
        match used.get(&e.id().index()) {
            Some(Direction::Forward) => "color=red penwidth=2 dir=forward".to_string(),
            Some(Direction::Reverse) => "color=red penwidth=2 dir=back".to_string(),
            None => String::new(),
        }
    };
    let node_attrs = |_: &UnGraph<NodeId, i64>, (_, &n): (NodeIndex, &NodeId)| {
        if n == graph.start() {
            "shape=box".to_string()
        } else if graph.dest().contains(&n) {
            "shape=doublecircle".to_string()
        } else {
            String::new()
        }
    };

    format!("{}", Dot::with_attr_getters(&g, &[], &edge_attrs, &node_attrs))
}
