//! Corrected route cost as the minimization objective.

use super::builder::{ArcRole, Direction, FlowNetwork};
use super::corrector::UsageCorrector;
use crate::cp::{IntVar, Objective, VarId};

/// Minimizes `sum(cost * usage)` over the edge arcs.
pub struct CostObjective;

impl CostObjective {
    /// Binds the corrected cost to a new variable and minimizes it.
    ///
    /// The variable ranges over `[0, sum of edge costs]`: a route pays each
    /// edge at most once. The usage corrector is imposed first if the
    /// network does not carry it yet. Returns the cost variable.
    pub fn impose(network: &mut FlowNetwork) -> VarId {
        if let Some(total) = network.total_cost {
            return total;
        }
        UsageCorrector::impose(network);

        let max_cost: i64 = network
            .arcs
            .iter()
            .filter(|a| {
                matches!(
                    a.role,
                    ArcRole::Edge {
                        direction: Direction::Forward,
                        ..
                    }
                )
            })
            .map(|a| a.cost)
            .sum();
        let (usages, costs): (Vec<VarId>, Vec<i64>) = network
            .arcs
            .iter()
            .filter_map(|a| a.usage.map(|u| (u, a.cost)))
            .unzip();

        let model = &mut network.model;
        let total = model.add_int_var(IntVar::new("total_cost", 0, max_cost));
        model.add_weighted_sum(&usages, &costs, total);
        model.set_objective(Objective::Minimize(total));
        network.total_cost = Some(total);
        total
    }
}
