//! Bounds propagation to a fixpoint.

use super::domain::{ceil_div, floor_div, Conflict, Domains};
use super::model::{Constraint, CpModel, Relation};
use super::variables::VarId;
use std::collections::VecDeque;

/// Constraint store with per-variable watch lists.
pub(crate) struct Propagator<'m> {
    constraints: &'m [Constraint],
    watches: Vec<Vec<usize>>,
}

impl<'m> Propagator<'m> {
    pub fn new(model: &'m CpModel) -> Self {
        let constraints = model.constraints();
        let mut watches = vec![Vec::new(); model.var_count()];
        for (ci, constraint) in constraints.iter().enumerate() {
            for var in constraint.vars() {
                watches[var.0].push(ci);
            }
        }
        Self {
            constraints,
            watches,
        }
    }

    /// Runs every constraint until nothing changes.
    pub fn propagate_all(&self, d: &mut Domains) -> Result<(), Conflict> {
        self.run(d, (0..self.constraints.len()).collect())
    }

    /// Runs the constraints watching `changed` until nothing changes.
    pub fn propagate_from(&self, d: &mut Domains, changed: &[VarId]) -> Result<(), Conflict> {
        let mut seeds = Vec::new();
        for var in changed {
            seeds.extend_from_slice(&self.watches[var.0]);
        }
        self.run(d, seeds)
    }

    fn run(&self, d: &mut Domains, seeds: Vec<usize>) -> Result<(), Conflict> {
        let mut queued = vec![false; self.constraints.len()];
        let mut queue = VecDeque::with_capacity(seeds.len());
        for ci in seeds {
            if !queued[ci] {
                queued[ci] = true;
                queue.push_back(ci);
            }
        }

        let mut touched = Vec::new();
        while let Some(ci) = queue.pop_front() {
            queued[ci] = false;
            touched.clear();
            enforce(&self.constraints[ci], d, &mut touched)?;
            for var in &touched {
                for &watcher in &self.watches[var.0] {
                    if !queued[watcher] {
                        queued[watcher] = true;
                        queue.push_back(watcher);
                    }
                }
            }
        }
        Ok(())
    }
}

fn enforce(
    constraint: &Constraint,
    d: &mut Domains,
    touched: &mut Vec<VarId>,
) -> Result<(), Conflict> {
    match constraint {
        Constraint::Linear {
            terms,
            relation,
            rhs,
        } => match relation {
            Relation::Le => linear_le(terms.iter().copied(), *rhs, d, touched),
            Relation::Ge => linear_le(terms.iter().map(|&(v, c)| (v, -c)), -*rhs, d, touched),
            Relation::Eq => {
                linear_le(terms.iter().copied(), *rhs, d, touched)?;
                linear_le(terms.iter().map(|&(v, c)| (v, -c)), -*rhs, d, touched)
            }
        },
        Constraint::Formula(f) => f.enforce(d, touched),
    }
}

/// Bounds consistency for `sum(coef * var) <= rhs`.
fn linear_le<I>(
    terms: I,
    rhs: i64,
    d: &mut Domains,
    touched: &mut Vec<VarId>,
) -> Result<(), Conflict>
where
    I: Iterator<Item = (VarId, i64)> + Clone,
{
    let min_sum: i64 = terms.clone().map(|(v, c)| term_min(d, v, c)).sum();
    if min_sum > rhs {
        return Err(Conflict);
    }

    for (var, coef) in terms {
        if coef == 0 {
            continue;
        }
        // coef * var <= slack once every other term sits at its minimum
        let slack = rhs - (min_sum - term_min(d, var, coef));
        let changed = if coef > 0 {
            d.set_max(var, floor_div(slack, coef))?
        } else {
            d.set_min(var, ceil_div(slack, coef))?
        };
        if changed {
            touched.push(var);
        }
    }
    Ok(())
}

#[inline]
fn term_min(d: &Domains, var: VarId, coef: i64) -> i64 {
    if coef >= 0 {
        coef * d.min(var)
    } else {
        coef * d.max(var)
    }
}
