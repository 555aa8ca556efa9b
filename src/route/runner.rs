//! Route search driver.

use super::error::RouteError;
use super::types::{ArcAssignment, RouteResult, TraversedArc};
use crate::cp::{BranchAndBoundSolver, CpSolution, CpSolver, SolverConfig, SolverStatus, VarId};
use crate::network::{
    ArcRole, CostObjective, FlowNetwork, FlowNetworkBuilder, Graph, GraphSpec, NetNode,
};
use log::info;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Solves routing problems.
///
/// Each call builds a fresh flow network with the usage corrector and the
/// cost objective, then runs branch-and-bound over the arc flows in input
/// order, smallest value first.
///
/// # Examples
///
/// ```
/// use u_flowpath::cp::SolverConfig;
/// use u_flowpath::instances::Example;
/// use u_flowpath::route::RouteRunner;
///
/// let graph = Example::SharedPrefix.graph();
/// let route = RouteRunner::run(&graph, &SolverConfig::default()).unwrap();
/// assert_eq!(route.cost, 20);
/// assert!(route.proven_optimal);
/// ```
pub struct RouteRunner;

impl RouteRunner {
    /// Finds the cheapest route.
    pub fn run(graph: &Graph, config: &SolverConfig) -> Result<RouteResult, RouteError> {
        Self::run_with_cancel(graph, config, None)
    }

    /// Finds the cheapest route with an optional cancellation token.
    ///
    /// If the token is set before any route is found the result is
    /// [`RouteError::SolverFailure`]; if a route was already found it is
    /// returned with `proven_optimal == false`.
    pub fn run_with_cancel(
        graph: &Graph,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RouteResult, RouteError> {
        config.validate().map_err(RouteError::InvalidConfig)?;

        let mut network = FlowNetworkBuilder::build(graph);
        let total = CostObjective::impose(&mut network);
        network.model().validate().map_err(RouteError::Model)?;

        let solver = match cancel {
            Some(flag) => BranchAndBoundSolver::with_cancel(flag),
            None => BranchAndBoundSolver::new(),
        };
        let solution = solver.solve(network.model(), config);

        match solution.status {
            SolverStatus::Optimal | SolverStatus::Feasible => {
                let result = decode(graph, &network, total, solution)?;
                info!(
                    "route cost {} (flow cost {}) over {} arcs, {}",
                    result.cost,
                    result.flow_cost,
                    result.arcs.len(),
                    if result.proven_optimal {
                        "optimal"
                    } else {
                        "not proven optimal"
                    }
                );
                Ok(result)
            }
            SolverStatus::Infeasible => {
                info!("no route reaches every destination");
                Err(RouteError::Infeasible)
            }
            SolverStatus::ModelInvalid => Err(RouteError::Model(
                "solver rejected the flow model".to_string(),
            )),
            status => Err(RouteError::SolverFailure(status)),
        }
    }

    /// Validates raw input, then solves it.
    pub fn run_spec(spec: GraphSpec, config: &SolverConfig) -> Result<RouteResult, RouteError> {
        let graph = Graph::try_from(spec)?;
        Self::run(&graph, config)
    }

    /// Solves independent graphs, in parallel with the `parallel` feature.
    ///
    /// Results are in input order.
    pub fn run_batch(
        graphs: &[Graph],
        config: &SolverConfig,
    ) -> Vec<Result<RouteResult, RouteError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            graphs.par_iter().map(|g| Self::run(g, config)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            graphs.iter().map(|g| Self::run(g, config)).collect()
        }
    }
}

fn decode(
    graph: &Graph,
    network: &FlowNetwork,
    total: VarId,
    solution: CpSolution,
) -> Result<RouteResult, RouteError> {
    let value = |var: VarId| {
        solution
            .value(var)
            .ok_or_else(|| RouteError::Model(format!("solution has no value for {var}")))
    };

    let mut arcs = Vec::new();
    let mut assignments = Vec::with_capacity(2 * graph.n_edges());
    let mut sink_flows = Vec::with_capacity(graph.n_dests());

    for arc in network.arcs() {
        let flow = value(arc.flow)?;
        match arc.role {
            ArcRole::Source => {}
            ArcRole::Edge { edge, direction } => {
                let usage = match arc.usage {
                    Some(u) => value(u)?,
                    None => return Err(RouteError::Model(format!("edge arc {edge} has no usage"))),
                };
                assignments.push(ArcAssignment {
                    role: arc.role,
                    from: arc.from,
                    to: arc.to,
                    flow,
                    usage,
                });
                match (arc.from, arc.to) {
                    (NetNode::Vertex(from), NetNode::Vertex(to)) if flow > 0 => {
                        arcs.push(TraversedArc {
                            from,
                            to,
                            edge,
                            direction,
                            cost: arc.cost,
                            flow,
                        });
                    }
                    _ => {}
                }
            }
            ArcRole::Sink { dest } => sink_flows.push((dest, flow)),
        }
    }

    Ok(RouteResult {
        start: graph.start(),
        cost: value(total)?,
        flow_cost: value(network.flow_cost())?,
        arcs,
        assignments,
        sink_flows,
        proven_optimal: solution.status == SolverStatus::Optimal,
        stats: solution.stats,
        solve_time_ms: solution.solve_time_ms,
    })
}
