//! Graph to flow network.

use super::graph::{Graph, NodeId};
use crate::cp::{Atom, CpModel, Formula, IntVar, Relation, VarId};
use log::debug;
use std::fmt;

/// Node of the flow network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetNode {
    /// Synthetic node supplying one unit per destination.
    Source,
    /// A node of the input graph.
    Vertex(NodeId),
    /// Synthetic node absorbing one unit per destination.
    Sink,
}

impl fmt::Display for NetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetNode::Source => write!(f, "source"),
            NetNode::Vertex(n) => write!(f, "{n}"),
            NetNode::Sink => write!(f, "sink"),
        }
    }
}

/// Orientation of an edge arc relative to the input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// `from -> to`
    Forward,
    /// `to -> from`
    Reverse,
}

/// What a directed arc stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArcRole {
    /// `source -> start`
    Source,
    /// One direction of input edge `edge`.
    Edge { edge: usize, direction: Direction },
    /// `dest -> sink`
    Sink { dest: NodeId },
}

/// Arc of the flow network together with its model variables.
#[derive(Debug, Clone)]
pub struct DirectedArc {
    pub from: NetNode,
    pub to: NetNode,
    pub cost: i64,
    /// Flow amount, `[0, n_dests]`.
    pub flow: VarId,
    /// 0/1 usage indicator, set on edge arcs once the corrector is imposed.
    pub usage: Option<VarId>,
    pub role: ArcRole,
}

impl DirectedArc {
    pub fn is_edge(&self) -> bool {
        matches!(self.role, ArcRole::Edge { .. })
    }
}

/// Min-cost-flow formulation of a routing problem.
///
/// Arcs are stored in branching order: the source arc, every edge in its
/// forward direction, every edge in its reverse direction, then one sink
/// arc per destination.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    pub(super) model: CpModel,
    pub(super) arcs: Vec<DirectedArc>,
    pub(super) supply: i64,
    pub(super) flow_cost: VarId,
    pub(super) total_cost: Option<VarId>,
}

impl FlowNetwork {
    pub fn model(&self) -> &CpModel {
        &self.model
    }

    pub fn arcs(&self) -> &[DirectedArc] {
        &self.arcs
    }

    /// Edge arcs in branching order.
    pub fn edge_arcs(&self) -> impl Iterator<Item = &DirectedArc> {
        self.arcs.iter().filter(|a| a.is_edge())
    }

    /// Sink arcs in destination order.
    pub fn sink_arcs(&self) -> impl Iterator<Item = &DirectedArc> {
        self.arcs
            .iter()
            .filter(|a| matches!(a.role, ArcRole::Sink { .. }))
    }

    /// Units leaving the source, one per destination.
    pub fn supply(&self) -> i64 {
        self.supply
    }

    /// `sum(cost * flow)` over the edge arcs.
    pub fn flow_cost(&self) -> VarId {
        self.flow_cost
    }

    /// `sum(cost * usage)` over the edge arcs, once the objective is imposed.
    pub fn total_cost(&self) -> Option<VarId> {
        self.total_cost
    }

    pub fn into_model(self) -> CpModel {
        self.model
    }
}

/// Builds the [`FlowNetwork`] of a graph.
pub struct FlowNetworkBuilder;

impl FlowNetworkBuilder {
    /// Creates a fresh model holding the flow variables and constraints.
    ///
    /// Every feasible assignment routes one unit from the source through
    /// the start node to each destination and on to the sink.
    pub fn build(graph: &Graph) -> FlowNetwork {
        let supply = graph.n_dests() as i64;
        let mut model = CpModel::new("flowpath");
        let mut arcs = Vec::with_capacity(2 * graph.n_edges() + graph.n_dests() + 1);

        let mut add_arc = |model: &mut CpModel, from: NetNode, to: NetNode, cost, role| {
            let flow = model.add_int_var(IntVar::new(format!("x[{from}->{to}]"), 0, supply));
            arcs.push(DirectedArc {
                from,
                to,
                cost,
                flow,
                usage: None,
                role,
            });
        };

        add_arc(
            &mut model,
            NetNode::Source,
            NetNode::Vertex(graph.start()),
            0,
            ArcRole::Source,
        );
        for direction in [Direction::Forward, Direction::Reverse] {
            for (i, edge) in graph.edges().iter().enumerate() {
                let (from, to) = match direction {
                    Direction::Forward => (edge.from, edge.to),
                    Direction::Reverse => (edge.to, edge.from),
                };
                add_arc(
                    &mut model,
                    NetNode::Vertex(from),
                    NetNode::Vertex(to),
                    edge.cost,
                    ArcRole::Edge { edge: i, direction },
                );
            }
        }
        for &d in graph.dest() {
            add_arc(
                &mut model,
                NetNode::Vertex(d),
                NetNode::Sink,
                0,
                ArcRole::Sink { dest: d },
            );
        }

        // supply and demand
        model.add_linear(vec![(arcs[0].flow, 1)], Relation::Eq, supply);
        let sink_terms = arcs
            .iter()
            .filter(|a| a.to == NetNode::Sink)
            .map(|a| (a.flow, 1))
            .collect();
        model.add_linear(sink_terms, Relation::Eq, supply);

        // conservation; a self-loop enters and leaves the same node and cancels out
        let mut balance: Vec<Vec<(VarId, i64)>> = vec![Vec::new(); graph.graph_size() + 1];
        for arc in arcs.iter().filter(|a| a.from != a.to) {
            if let NetNode::Vertex(v) = arc.to {
                balance[v].push((arc.flow, 1));
            }
            if let NetNode::Vertex(v) = arc.from {
                balance[v].push((arc.flow, -1));
            }
        }
        for terms in balance.into_iter().filter(|t| !t.is_empty()) {
            model.add_linear(terms, Relation::Eq, 0);
        }

        for arc in arcs.iter().filter(|a| a.to == NetNode::Sink) {
            model.add_formula(Formula::atom(Atom::GreaterThan {
                var: arc.flow,
                value: 0,
            }));
        }

        // both directions of an edge may carry flow, so the bound is doubled
        let flow_cost = model.add_int_var(IntVar::new(
            "flow_cost",
            0,
            2 * supply * graph.total_edge_cost(),
        ));
        let (edge_flows, edge_costs): (Vec<VarId>, Vec<i64>) = arcs
            .iter()
            .filter(|a| a.is_edge())
            .map(|a| (a.flow, a.cost))
            .unzip();
        model.add_weighted_sum(&edge_flows, &edge_costs, flow_cost);

        model.set_branching(arcs.iter().map(|a| a.flow).collect());

        debug!(
            "flow network: {} arcs, {} variables, {} constraints",
            arcs.len(),
            model.var_count(),
            model.constraint_count()
        );

        FlowNetwork {
            model,
            arcs,
            supply,
            flow_cost,
            total_cost: None,
        }
    }
}
