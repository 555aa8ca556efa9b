//! CP solver interface and the branch-and-bound implementation.

use super::domain::Domains;
use super::model::{CpModel, Objective};
use super::propagate::Propagator;
use super::variables::VarId;
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded its time or node limit before finding a solution.
    Timeout,
    /// No solution found for unknown reasons (e.g. cancelled).
    Unknown,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::ModelInvalid => "model invalid",
            SolverStatus::Timeout => "timeout",
            SolverStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Counters collected during search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Search nodes visited (decisions applied and propagated).
    pub nodes: u64,
    /// Nodes whose propagation failed.
    pub failures: u64,
    /// Improving solutions found.
    pub solutions: u64,
    /// Deepest decision level reached.
    pub max_depth: usize,
    /// Whether the search was stopped by the cancellation flag.
    pub cancelled: bool,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective value of the best solution (if any).
    pub objective_value: Option<i64>,
    /// Value of every variable, indexed by [`VarId::index`]. Empty when
    /// no solution was found.
    pub values: Vec<i64>,
    /// Search counters.
    pub stats: SearchStats,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            stats: SearchStats::default(),
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value assigned to `var`, if a solution was found.
    pub fn value(&self, var: VarId) -> Option<i64> {
        self.values.get(var.0).copied()
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_flowpath::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_node_limit(1_000_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds. 0 = no limit.
    pub time_limit_ms: i64,
    /// Maximum number of search nodes. 0 = no limit.
    pub node_limit: u64,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            node_limit: 0,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = nodes;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms < 0 {
            return Err(format!(
                "time_limit_ms must be non-negative, got {}",
                self.time_limit_ms
            ));
        }
        Ok(())
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Depth-first branch-and-bound over bounds domains.
///
/// Variables are labelled in [`CpModel::search_order`]. At each node the
/// first unfixed variable `x` is split into `x == min(x)` (explored first)
/// and `x >= min(x) + 1`. Whenever a solution is found the objective is
/// bounded to be strictly better and the search goes on until the tree
/// is exhausted.
///
/// The open nodes live on an explicit stack, each holding its own domain
/// snapshot, so deep trees never touch the call stack.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    cancel: Option<Arc<AtomicBool>>,
}

/// Decision applied when an open node is expanded.
#[derive(Debug, Clone, Copy)]
enum Decision {
    Fix(VarId, i64),
    AtLeast(VarId, i64),
}

struct Node {
    domains: Domains,
    decision: Option<Decision>,
    depth: usize,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Solver that stops when `cancel` is set to `true`.
    pub fn with_cancel(cancel: Arc<AtomicBool>) -> Self {
        Self {
            cancel: Some(cancel),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if let Err(reason) = model.validate() {
            debug!("model {} rejected: {reason}", model.name);
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }
        if let Err(reason) = config.validate() {
            debug!("config rejected: {reason}");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let propagator = Propagator::new(model);
        let order = model.search_order();
        let objective = model.objective();

        debug!(
            "solving {}: {} variables, {} constraints",
            model.name,
            model.var_count(),
            model.constraint_count()
        );

        let mut stats = SearchStats::default();
        let mut best: Option<(i64, Vec<i64>)> = None;
        let mut limit_hit = false;

        let mut root = Domains::new(model.initial_bounds());
        let mut stack = Vec::new();
        if propagator.propagate_all(&mut root).is_ok() {
            stack.push(Node {
                domains: root,
                decision: None,
                depth: 0,
            });
        } else {
            stats.failures += 1;
        }

        while let Some(Node {
            mut domains,
            decision,
            depth,
        }) = stack.pop()
        {
            if self.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if (config.node_limit > 0 && stats.nodes >= config.node_limit)
                || (config.time_limit_ms > 0
                    && start_time.elapsed().as_millis() as i64 >= config.time_limit_ms)
            {
                limit_hit = true;
                break;
            }
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);

            let mut changed = Vec::with_capacity(2);
            let applied = apply(&mut domains, decision, &mut changed)
                .and_then(|_| bound_objective(&mut domains, objective, &best, &mut changed));
            if applied.is_err() || propagator.propagate_from(&mut domains, &changed).is_err() {
                stats.failures += 1;
                continue;
            }

            let Some(var) = order.iter().copied().find(|&v| !domains.is_fixed(v)) else {
                // every variable is fixed: a solution strictly better than the incumbent
                let Some(values) = domains.assignment() else {
                    continue;
                };
                let cost = objective.map_or(0, |o| values[o.var().0]);
                stats.solutions += 1;
                debug!(
                    "solution #{} with objective {cost} at node {}",
                    stats.solutions, stats.nodes
                );
                best = Some((cost, values));
                if objective.is_none() || config.stop_after_first {
                    break;
                }
                continue;
            };

            let value = domains.min(var);
            trace!("depth {depth}: branch on {var} = {value}");
            stack.push(Node {
                domains: domains.clone(),
                decision: Some(Decision::AtLeast(var, value + 1)),
                depth: depth + 1,
            });
            stack.push(Node {
                domains,
                decision: Some(Decision::Fix(var, value)),
                depth: depth + 1,
            });
        }

        let exhausted = stack.is_empty() && !stats.cancelled && !limit_hit;
        let status = match (&best, exhausted) {
            (Some(_), true) if objective.is_some() => SolverStatus::Optimal,
            (Some(_), _) => SolverStatus::Feasible,
            (None, true) => SolverStatus::Infeasible,
            (None, false) if limit_hit => SolverStatus::Timeout,
            (None, false) => SolverStatus::Unknown,
        };

        let solve_time_ms = start_time.elapsed().as_millis() as i64;
        info!(
            "{}: {status} after {} nodes, {} failures, {solve_time_ms} ms",
            model.name, stats.nodes, stats.failures
        );

        let (objective_value, values) = match best {
            Some((cost, values)) => (objective.map(|_| cost), values),
            None => (None, Vec::new()),
        };

        CpSolution {
            status,
            objective_value,
            values,
            stats,
            solve_time_ms,
        }
    }
}

fn apply(
    domains: &mut Domains,
    decision: Option<Decision>,
    changed: &mut Vec<VarId>,
) -> Result<(), super::domain::Conflict> {
    match decision {
        Some(Decision::Fix(var, value)) => {
            domains.fix(var, value)?;
            changed.push(var);
        }
        Some(Decision::AtLeast(var, value)) => {
            domains.set_min(var, value)?;
            changed.push(var);
        }
        None => {}
    }
    Ok(())
}

/// Requires the objective to beat the incumbent.
fn bound_objective(
    domains: &mut Domains,
    objective: Option<Objective>,
    best: &Option<(i64, Vec<i64>)>,
    changed: &mut Vec<VarId>,
) -> Result<(), super::domain::Conflict> {
    let (Some(objective), Some((cost, _))) = (objective, best) else {
        return Ok(());
    };
    let tightened = match objective {
        Objective::Minimize(var) => domains.set_max(var, cost - 1)?,
        Objective::Maximize(var) => domains.set_min(var, cost + 1)?,
    };
    if tightened {
        changed.push(objective.var());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{Atom, BoolVar, Formula, IntVar, Relation};

    fn solve(model: &CpModel) -> CpSolution {
        BranchAndBoundSolver::new().solve(model, &SolverConfig::default())
    }

    #[test]
    fn test_minimize_linear() {
        // minimize x subject to x + y >= 7, y <= 4
        let mut model = CpModel::new("test");
        let x = model.add_int_var(IntVar::new("x", 0, 10));
        let y = model.add_int_var(IntVar::new("y", 0, 4));
        model.add_linear(vec![(x, 1), (y, 1)], Relation::Ge, 7);
        model.set_objective(Objective::Minimize(x));

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.objective_value, Some(3));
        assert_eq!(solution.value(y), Some(4));
        assert!(model.is_satisfied(&solution.values));
    }

    #[test]
    fn test_maximize() {
        let mut model = CpModel::new("test");
        let x = model.add_int_var(IntVar::new("x", 0, 10));
        let y = model.add_int_var(IntVar::new("y", 0, 10));
        model.add_linear(vec![(x, 2), (y, 3)], Relation::Le, 12);
        model.add_linear(vec![(x, 1), (y, -1)], Relation::Eq, 1);
        model.set_objective(Objective::Maximize(x));

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Optimal);
        // 2x + 3(x - 1) <= 12 => x <= 3
        assert_eq!(solution.objective_value, Some(3));
        assert_eq!(solution.value(y), Some(2));
    }

    #[test]
    fn test_infeasible() {
        let mut model = CpModel::new("test");
        let x = model.add_int_var(IntVar::new("x", 0, 3));
        let y = model.add_int_var(IntVar::new("y", 0, 3));
        model.add_linear(vec![(x, 1), (y, 1)], Relation::Eq, 3);
        model.add_formula(Formula::or(vec![
            Formula::atom(Atom::EqualVar { a: x, b: y }),
            Formula::atom(Atom::GreaterThan { var: x, value: 5 }),
        ]));
        model.set_objective(Objective::Minimize(x));

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_satisfaction_without_objective() {
        let mut model = CpModel::new("test");
        let a = model.add_bool_var(BoolVar::new("a"));
        let b = model.add_bool_var(BoolVar::new("b"));
        model.add_formula(Formula::or(vec![
            Formula::atom(Atom::EqualConst { var: a, value: 1 }),
            Formula::atom(Atom::EqualConst { var: b, value: 1 }),
        ]));

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Feasible);
        assert_eq!(solution.objective_value, None);
        // min-value-first: a = 0 forces b = 1
        assert_eq!(solution.values, vec![0, 1]);
    }

    #[test]
    fn test_branching_order_is_respected() {
        // with b labelled first, b takes its minimum and a compensates
        let mut model = CpModel::new("test");
        let a = model.add_int_var(IntVar::new("a", 0, 5));
        let b = model.add_int_var(IntVar::new("b", 0, 5));
        model.add_linear(vec![(a, 1), (b, 1)], Relation::Eq, 5);
        model.set_branching(vec![b, a]);

        let solution = solve(&model);
        assert_eq!(solution.values, vec![5, 0]);
    }

    #[test]
    fn test_stop_after_first_is_feasible_not_optimal() {
        // the first solution in min-value order is x = 0, y = 9 (cost 9)
        let mut model = CpModel::new("test");
        let x = model.add_int_var(IntVar::new("x", 0, 9));
        let y = model.add_int_var(IntVar::new("y", 0, 9));
        let cost = model.add_int_var(IntVar::new("cost", 0, 100));
        model.add_linear(vec![(x, 1), (y, 1)], Relation::Eq, 9);
        model.add_weighted_sum(&[x, y], &[2, 1], cost);
        model.set_branching(vec![x, y]);
        model.set_objective(Objective::Maximize(cost));

        let config = SolverConfig::default().with_stop_after_first(true);
        let first = BranchAndBoundSolver::new().solve(&model, &config);
        assert_eq!(first.status, SolverStatus::Feasible);
        assert_eq!(first.objective_value, Some(9));
        assert_eq!(first.stats.solutions, 1);

        let full = solve(&model);
        assert_eq!(full.status, SolverStatus::Optimal);
        assert_eq!(full.objective_value, Some(18));
        assert!(full.stats.solutions >= 2);
    }

    #[test]
    fn test_node_limit_without_solution_is_timeout() {
        let mut model = CpModel::new("test");
        let vars: Vec<VarId> = (0..6)
            .map(|i| model.add_int_var(IntVar::new(format!("x{i}"), 0, 3)))
            .collect();
        let terms = vars.iter().map(|&v| (v, 1)).collect();
        model.add_linear(terms, Relation::Eq, 17);

        let config = SolverConfig::default().with_node_limit(1);
        let solution = BranchAndBoundSolver::new().solve(&model, &config);
        assert_eq!(solution.status, SolverStatus::Timeout);
        assert_eq!(solution.stats.nodes, 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut model = CpModel::new("test");
        let x = model.add_int_var(IntVar::new("x", 0, 3));
        model.set_objective(Objective::Minimize(x));

        let cancel = Arc::new(AtomicBool::new(true));
        let solution =
            BranchAndBoundSolver::with_cancel(cancel).solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Unknown);
        assert!(solution.stats.cancelled);
    }

    #[test]
    fn test_invalid_model() {
        let mut model = CpModel::new("test");
        model.add_int_var(IntVar::new("x", 3, 1));
        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
    }

    #[test]
    fn test_invalid_config() {
        let model = CpModel::new("test");
        let config = SolverConfig::default().with_time_limit_ms(-5);
        assert!(config.validate().is_err());
        let solution = BranchAndBoundSolver::new().solve(&model, &config);
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, 60_000);
        assert_eq!(config.node_limit, 0);
        assert!(!config.stop_after_first);
    }

    #[test]
    fn test_deterministic() {
        let mut model = CpModel::new("test");
        let vars: Vec<VarId> = (0..4)
            .map(|i| model.add_int_var(IntVar::new(format!("x{i}"), 0, 4)))
            .collect();
        let cost = model.add_int_var(IntVar::new("cost", 0, 100));
        model.add_linear(vars.iter().map(|&v| (v, 1)).collect(), Relation::Eq, 6);
        model.add_weighted_sum(&vars, &[3, 1, 2, 1], cost);
        model.set_objective(Objective::Minimize(cost));

        let a = solve(&model);
        let b = solve(&model);
        assert_eq!(a.values, b.values);
        assert_eq!(a.stats.nodes, b.stats.nodes);
        assert_eq!(a.objective_value, Some(6));
    }
}
