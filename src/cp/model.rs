//! CP model definition.

use super::formula::Formula;
use super::variables::{BoolVar, IntVar, VarId};

/// Comparison used by a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `sum == rhs`
    Eq,
    /// `sum <= rhs`
    Le,
    /// `sum >= rhs`
    Ge,
}

/// A constraint in the CP model.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Linear constraint `sum(coef * var) (relation) rhs`.
    Linear {
        /// (variable, coefficient) pairs.
        terms: Vec<(VarId, i64)>,
        /// Comparison between the sum and `rhs`.
        relation: Relation,
        /// Right-hand side constant.
        rhs: i64,
    },

    /// A boolean formula over comparison atoms that must hold.
    Formula(Formula),
}

impl Constraint {
    /// Variables the constraint depends on, deduplicated.
    pub fn vars(&self) -> Vec<VarId> {
        match self {
            Constraint::Linear { terms, .. } => {
                let mut vars: Vec<VarId> = terms.iter().map(|&(v, _)| v).collect();
                vars.sort_unstable();
                vars.dedup();
                vars
            }
            Constraint::Formula(f) => f.vars(),
        }
    }

    /// Evaluates the constraint on a complete assignment.
    pub fn check(&self, values: &[i64]) -> bool {
        match self {
            Constraint::Linear {
                terms,
                relation,
                rhs,
            } => {
                let sum: i64 = terms.iter().map(|&(v, c)| c * values[v.0]).sum();
                match relation {
                    Relation::Eq => sum == *rhs,
                    Relation::Le => sum <= *rhs,
                    Relation::Ge => sum >= *rhs,
                }
            }
            Constraint::Formula(f) => f.check(values),
        }
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Minimize the value of a variable.
    Minimize(VarId),
    /// Maximize the value of a variable.
    Maximize(VarId),
}

impl Objective {
    pub fn var(&self) -> VarId {
        match *self {
            Objective::Minimize(v) | Objective::Maximize(v) => v,
        }
    }
}

/// A constraint programming model.
///
/// Contains variables, constraints, an optional objective and the order
/// in which the search labels variables.
///
/// # Examples
///
/// ```
/// use u_flowpath::cp::{CpModel, IntVar, Objective, Relation};
///
/// let mut model = CpModel::new("example");
/// let x = model.add_int_var(IntVar::new("x", 0, 10));
/// let y = model.add_int_var(IntVar::new("y", 0, 10));
/// model.add_linear(vec![(x, 1), (y, 1)], Relation::Ge, 7);
/// model.set_objective(Objective::Minimize(x));
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    vars: Vec<IntVar>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    branching: Vec<VarId>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            branching: Vec::new(),
        }
    }

    /// Adds an integer variable and returns its handle.
    pub fn add_int_var(&mut self, var: IntVar) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(var);
        id
    }

    /// Adds a boolean (0/1) variable and returns its handle.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.add_int_var(var.into_int_var())
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add `sum(coef * var) (relation) rhs`.
    pub fn add_linear(&mut self, terms: Vec<(VarId, i64)>, relation: Relation, rhs: i64) {
        self.constraints.push(Constraint::Linear {
            terms,
            relation,
            rhs,
        });
    }

    /// Convenience: add `sum(weights[i] * vars[i]) == target`.
    pub fn add_weighted_sum(&mut self, vars: &[VarId], weights: &[i64], target: VarId) {
        let mut terms: Vec<(VarId, i64)> = vars
            .iter()
            .copied()
            .zip(weights.iter().copied())
            .collect();
        terms.push((target, -1));
        self.add_linear(terms, Relation::Eq, 0);
    }

    /// Convenience: add a formula that must hold.
    pub fn add_formula(&mut self, formula: Formula) {
        self.constraints.push(Constraint::Formula(formula));
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Sets the order in which the search labels variables.
    ///
    /// Variables not listed are labelled afterwards, in creation order.
    pub fn set_branching(&mut self, order: Vec<VarId>) {
        self.branching = order;
    }

    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn var(&self, id: VarId) -> &IntVar {
        &self.vars[id.0]
    }

    pub fn vars(&self) -> &[IntVar] {
        &self.vars
    }

    /// Full labelling order: the branching list, then every other variable.
    pub fn search_order(&self) -> Vec<VarId> {
        let mut seen = vec![false; self.vars.len()];
        let mut order = Vec::with_capacity(self.vars.len());
        let rest = (0..self.vars.len()).map(VarId);
        for id in self.branching.iter().copied().chain(rest) {
            if id.0 < seen.len() && !seen[id.0] {
                seen[id.0] = true;
                order.push(id);
            }
        }
        order
    }

    /// Initial `(min, max)` bounds of every variable.
    pub fn initial_bounds(&self) -> Vec<(i64, i64)> {
        self.vars
            .iter()
            .map(|v| match v.fixed {
                Some(value) => (value, value),
                None => (v.min, v.max),
            })
            .collect()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every domain is non-empty and that all referenced
    /// variable handles exist.
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.vars {
            if var.min > var.max {
                return Err(format!(
                    "empty domain for {}: [{}, {}]",
                    var.name, var.min, var.max
                ));
            }
            if let Some(value) = var.fixed {
                if value < var.min || value > var.max {
                    return Err(format!("fixed value of {} outside its bounds", var.name));
                }
            }
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if let Constraint::Linear { terms, .. } = constraint {
                if terms.is_empty() {
                    return Err(format!("linear constraint #{i} has no terms"));
                }
            }
            if let Some(v) = constraint.vars().into_iter().find(|v| !self.has_var(*v)) {
                return Err(format!("constraint #{i} references undefined variable {v}"));
            }
        }
        if let Some(objective) = self.objective {
            if !self.has_var(objective.var()) {
                return Err(format!("objective references undefined variable {}", objective.var()));
            }
        }
        if let Some(v) = self.branching.iter().find(|v| !self.has_var(**v)) {
            return Err(format!("branching references undefined variable {v}"));
        }
        Ok(())
    }

    /// Whether a complete assignment satisfies every constraint.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        values.len() == self.vars.len()
            && self
                .initial_bounds()
                .iter()
                .zip(values)
                .all(|(&(lo, hi), &v)| lo <= v && v <= hi)
            && self.constraints.iter().all(|c| c.check(values))
    }

    fn has_var(&self, id: VarId) -> bool {
        id.0 < self.vars.len()
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
