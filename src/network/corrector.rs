//! Usage corrector: charge an edge once however much flow crosses it.
//!
//! Min-cost flow charges an arc once per unit of flow. For routing to
//! several destinations a shared edge must only be paid once, so every
//! edge arc gets a 0/1 usage variable tied to its flow by
//!
//! ```text
//! (flow > 1 -> usage = 1) and (not (flow > 1) -> usage = flow)
//! ```
//!
//! which leaves exactly `usage = min(flow, 1)` for any flow amount.

use super::builder::FlowNetwork;
use crate::cp::{Atom, BoolVar, Formula, Relation, VarId};

/// Ties a usage indicator to every edge arc of a [`FlowNetwork`].
pub struct UsageCorrector;

impl UsageCorrector {
    /// Adds a usage variable and its rule to each edge arc.
    ///
    /// Source and sink arcs are left alone. Arcs that already carry a
    /// usage variable are skipped, so imposing twice is a no-op. Returns
    /// the usage variables in arc order.
    pub fn impose(network: &mut FlowNetwork) -> Vec<VarId> {
        let supply = network.supply;
        let model = &mut network.model;
        let mut usages = Vec::new();

        for arc in network.arcs.iter_mut().filter(|a| a.is_edge()) {
            if let Some(usage) = arc.usage {
                usages.push(usage);
                continue;
            }
            let usage = model.add_bool_var(BoolVar::new(format!("u[{}->{}]", arc.from, arc.to)));
            model.add_formula(Self::rule(arc.flow, usage));
            // usage <= flow and flow <= supply * usage
            model.add_linear(vec![(usage, 1), (arc.flow, -1)], Relation::Le, 0);
            model.add_linear(vec![(arc.flow, 1), (usage, -supply)], Relation::Le, 0);
            arc.usage = Some(usage);
            usages.push(usage);
        }
        usages
    }

    /// `(not p or q) and (p or r)` with `p = flow > 1`, `q = usage == 1`,
    /// `r = usage == flow`.
    pub fn rule(flow: VarId, usage: VarId) -> Formula {
        let p = Formula::atom(Atom::GreaterThan {
            var: flow,
            value: 1,
        });
        let q = Formula::atom(Atom::EqualConst {
            var: usage,
            value: 1,
        });
        let r = Formula::atom(Atom::EqualVar { a: usage, b: flow });
        Formula::and(vec![
            Formula::implies(p.clone(), q),
            Formula::implies(Formula::not(p), r),
        ])
    }

    /// The only usage value the rule admits for a non-negative flow.
    pub fn usage_for_flow(flow: i64) -> i64 {
        flow.clamp(0, 1)
    }

    /// Whether `(flow, usage)` satisfies the rule.
    pub fn is_consistent(flow: i64, usage: i64) -> bool {
        if flow > 1 {
            usage == 1
        } else {
            usage == flow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BranchAndBoundSolver, CpModel, CpSolver, IntVar, SolverConfig};
    use crate::network::{Edge, FlowNetworkBuilder, Graph};

    #[test]
    fn test_usage_for_flow() {
        assert_eq!(UsageCorrector::usage_for_flow(0), 0);
        assert_eq!(UsageCorrector::usage_for_flow(1), 1);
        assert_eq!(UsageCorrector::usage_for_flow(4), 1);
        for flow in 0..5 {
            assert!(UsageCorrector::is_consistent(
                flow,
                UsageCorrector::usage_for_flow(flow)
            ));
        }
    }

    #[test]
    fn test_is_consistent_rejects_mismatches() {
        assert!(!UsageCorrector::is_consistent(0, 1));
        assert!(!UsageCorrector::is_consistent(1, 0));
        assert!(!UsageCorrector::is_consistent(3, 0));
    }

    #[test]
    fn test_rule_matches_is_consistent() {
        let mut model = CpModel::new("rule");
        let flow = model.add_int_var(IntVar::new("x", 0, 3));
        let usage = model.add_bool_var(BoolVar::new("u"));
        let rule = UsageCorrector::rule(flow, usage);
        for x in 0..=3 {
            for u in 0..=1 {
                assert_eq!(rule.check(&[x, u]), UsageCorrector::is_consistent(x, u));
            }
        }
    }

    #[test]
    fn test_rule_propagates_usage_from_flow() {
        // every flow value leaves exactly one usage value
        for x in 0..=3 {
            let mut model = CpModel::new("rule");
            let flow = model.add_int_var(IntVar::fixed("x", x));
            let usage = model.add_bool_var(BoolVar::new("u"));
            model.add_formula(UsageCorrector::rule(flow, usage));

            let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
            assert_eq!(solution.value(usage), Some(UsageCorrector::usage_for_flow(x)));
            assert_eq!(solution.stats.failures, 0);
        }
    }

    #[test]
    fn test_impose_covers_edge_arcs_only() {
        let edges = vec![Edge::new(1, 2, 1), Edge::new(2, 3, 1)];
        let graph = Graph::new(3, 1, vec![3], edges).unwrap();
        let mut network = FlowNetworkBuilder::build(&graph);
        let vars_before = network.model().var_count();

        let usages = UsageCorrector::impose(&mut network);
        assert_eq!(usages.len(), 4);
        assert_eq!(network.model().var_count(), vars_before + 4);
        for arc in network.arcs() {
            assert_eq!(arc.usage.is_some(), arc.is_edge());
        }
        assert_eq!(network.model().var(usages[0]).name, "u[1->2]");

        let again = UsageCorrector::impose(&mut network);
        assert_eq!(again, usages);
        assert_eq!(network.model().var_count(), vars_before + 4);
        assert!(network.model().validate().is_ok());
    }
}
