//! Boolean combinators over comparison atoms.
//!
//! A [`Formula`] is kept in negation normal form: [`Formula::not`] pushes
//! the negation down to the atoms, so the tree only ever holds `And`, `Or`
//! and (possibly negated) atoms. This is what lets the propagator reason
//! about a formula with a single three-valued pass.

use super::domain::{Conflict, Domains, Truth};
use super::variables::VarId;

/// A comparison between a variable and a constant or another variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    /// `var > value`
    GreaterThan { var: VarId, value: i64 },
    /// `var <= value`
    LessEqual { var: VarId, value: i64 },
    /// `var == value`
    EqualConst { var: VarId, value: i64 },
    /// `var != value`
    NotEqualConst { var: VarId, value: i64 },
    /// `a == b`
    EqualVar { a: VarId, b: VarId },
    /// `a != b`
    NotEqualVar { a: VarId, b: VarId },
}

impl Atom {
    /// The logical complement.
    pub fn negate(self) -> Atom {
        match self {
            Atom::GreaterThan { var, value } => Atom::LessEqual { var, value },
            Atom::LessEqual { var, value } => Atom::GreaterThan { var, value },
            Atom::EqualConst { var, value } => Atom::NotEqualConst { var, value },
            Atom::NotEqualConst { var, value } => Atom::EqualConst { var, value },
            Atom::EqualVar { a, b } => Atom::NotEqualVar { a, b },
            Atom::NotEqualVar { a, b } => Atom::EqualVar { a, b },
        }
    }

    fn push_vars(&self, out: &mut Vec<VarId>) {
        match *self {
            Atom::GreaterThan { var, .. }
            | Atom::LessEqual { var, .. }
            | Atom::EqualConst { var, .. }
            | Atom::NotEqualConst { var, .. } => out.push(var),
            Atom::EqualVar { a, b } | Atom::NotEqualVar { a, b } => {
                out.push(a);
                out.push(b);
            }
        }
    }

    /// Entailment of the atom under bounds.
    pub(crate) fn truth(&self, d: &Domains) -> Truth {
        match *self {
            Atom::GreaterThan { var, value } => {
                if d.min(var) > value {
                    Truth::True
                } else if d.max(var) <= value {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            Atom::LessEqual { var, value } => {
                Atom::GreaterThan { var, value }.truth(d).complement()
            }
            Atom::EqualConst { var, value } => {
                if d.value(var) == Some(value) {
                    Truth::True
                } else if value < d.min(var) || value > d.max(var) {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
            Atom::NotEqualConst { var, value } => {
                Atom::EqualConst { var, value }.truth(d).complement()
            }
            Atom::EqualVar { a, b } => match (d.value(a), d.value(b)) {
                (Some(x), Some(y)) => {
                    if x == y {
                        Truth::True
                    } else {
                        Truth::False
                    }
                }
                _ if d.max(a) < d.min(b) || d.max(b) < d.min(a) => Truth::False,
                _ => Truth::Unknown,
            },
            Atom::NotEqualVar { a, b } => Atom::EqualVar { a, b }.truth(d).complement(),
        }
    }

    /// Narrows the domains so that the atom holds.
    pub(crate) fn enforce(
        &self,
        d: &mut Domains,
        touched: &mut Vec<VarId>,
    ) -> Result<(), Conflict> {
        match *self {
            Atom::GreaterThan { var, value } => {
                if d.set_min(var, value + 1)? {
                    touched.push(var);
                }
            }
            Atom::LessEqual { var, value } => {
                if d.set_max(var, value)? {
                    touched.push(var);
                }
            }
            Atom::EqualConst { var, value } => {
                if d.fix(var, value)? {
                    touched.push(var);
                }
            }
            Atom::NotEqualConst { var, value } => {
                if d.min(var) == value && d.set_min(var, value + 1)? {
                    touched.push(var);
                } else if d.max(var) == value && d.set_max(var, value - 1)? {
                    touched.push(var);
                }
            }
            Atom::EqualVar { a, b } => {
                let lo = d.min(a).max(d.min(b));
                let hi = d.max(a).min(d.max(b));
                for var in [a, b] {
                    let raised = d.set_min(var, lo)?;
                    let lowered = d.set_max(var, hi)?;
                    if raised || lowered {
                        touched.push(var);
                    }
                }
            }
            Atom::NotEqualVar { a, b } => {
                if let Some(value) = d.value(a) {
                    Atom::NotEqualConst { var: b, value }.enforce(d, touched)?;
                } else if let Some(value) = d.value(b) {
                    Atom::NotEqualConst { var: a, value }.enforce(d, touched)?;
                }
            }
        }
        Ok(())
    }

    /// Evaluates the atom on a complete assignment.
    pub fn check(&self, values: &[i64]) -> bool {
        match *self {
            Atom::GreaterThan { var, value } => values[var.0] > value,
            Atom::LessEqual { var, value } => values[var.0] <= value,
            Atom::EqualConst { var, value } => values[var.0] == value,
            Atom::NotEqualConst { var, value } => values[var.0] != value,
            Atom::EqualVar { a, b } => values[a.0] == values[b.0],
            Atom::NotEqualVar { a, b } => values[a.0] != values[b.0],
        }
    }
}

impl Truth {
    fn complement(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// A boolean formula in negation normal form.
///
/// # Examples
///
/// ```
/// use u_flowpath::cp::{Atom, BoolVar, CpModel, Formula, IntVar};
///
/// let mut model = CpModel::new("clamp");
/// let x = model.add_int_var(IntVar::new("x", 0, 3));
/// let u = model.add_bool_var(BoolVar::new("u"));
///
/// // (x > 1) -> (u == 1)
/// let rule = Formula::implies(
///     Formula::atom(Atom::GreaterThan { var: x, value: 1 }),
///     Formula::atom(Atom::EqualConst { var: u, value: 1 }),
/// );
/// model.add_formula(rule);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Atom(Atom),
    /// All children hold. An empty conjunction is true.
    And(Vec<Formula>),
    /// At least one child holds. An empty disjunction is false.
    Or(Vec<Formula>),
}

impl Formula {
    pub fn atom(atom: Atom) -> Formula {
        Formula::Atom(atom)
    }

    pub fn and(children: Vec<Formula>) -> Formula {
        Formula::And(children)
    }

    pub fn or(children: Vec<Formula>) -> Formula {
        Formula::Or(children)
    }

    /// Negation, pushed down to the atoms (De Morgan).
    #[allow(clippy::should_implement_trait)]
    pub fn not(formula: Formula) -> Formula {
        match formula {
            Formula::Atom(atom) => Formula::Atom(atom.negate()),
            Formula::And(children) => {
                Formula::Or(children.into_iter().map(Formula::not).collect())
            }
            Formula::Or(children) => {
                Formula::And(children.into_iter().map(Formula::not).collect())
            }
        }
    }

    /// `premise -> conclusion`, i.e. `not(premise) or conclusion`.
    pub fn implies(premise: Formula, conclusion: Formula) -> Formula {
        Formula::Or(vec![Formula::not(premise), conclusion])
    }

    /// Variables mentioned anywhere in the formula, deduplicated.
    pub fn vars(&self) -> Vec<VarId> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_vars(&self, out: &mut Vec<VarId>) {
        match self {
            Formula::Atom(atom) => atom.push_vars(out),
            Formula::And(children) | Formula::Or(children) => {
                for child in children {
                    child.collect_vars(out);
                }
            }
        }
    }

    /// Three-valued entailment under bounds.
    pub(crate) fn truth(&self, d: &Domains) -> Truth {
        match self {
            Formula::Atom(atom) => atom.truth(d),
            Formula::And(children) => {
                let mut result = Truth::True;
                for child in children {
                    match child.truth(d) {
                        Truth::False => return Truth::False,
                        Truth::Unknown => result = Truth::Unknown,
                        Truth::True => {}
                    }
                }
                result
            }
            Formula::Or(children) => {
                let mut result = Truth::False;
                for child in children {
                    match child.truth(d) {
                        Truth::True => return Truth::True,
                        Truth::Unknown => result = Truth::Unknown,
                        Truth::False => {}
                    }
                }
                result
            }
        }
    }

    /// Narrows the domains so that the formula can still hold.
    ///
    /// Conjunctions enforce every child. Disjunctions fail when every
    /// child is false and enforce the last remaining child otherwise.
    pub(crate) fn enforce(
        &self,
        d: &mut Domains,
        touched: &mut Vec<VarId>,
    ) -> Result<(), Conflict> {
        match self {
            Formula::Atom(atom) => atom.enforce(d, touched),
            Formula::And(children) => {
                for child in children {
                    child.enforce(d, touched)?;
                }
                Ok(())
            }
            Formula::Or(children) => {
                let mut open = None;
                for (i, child) in children.iter().enumerate() {
                    match child.truth(d) {
                        Truth::True => return Ok(()),
                        Truth::False => {}
                        Truth::Unknown => {
                            if open.is_some() {
                                return Ok(());
                            }
                            open = Some(i);
                        }
                    }
                }
                match open {
                    Some(i) => children[i].enforce(d, touched),
                    None => Err(Conflict),
                }
            }
        }
    }

    /// Evaluates the formula on a complete assignment.
    pub fn check(&self, values: &[i64]) -> bool {
        match self {
            Formula::Atom(atom) => atom.check(values),
            Formula::And(children) => children.iter().all(|c| c.check(values)),
            Formula::Or(children) => children.iter().any(|c| c.check(values)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gt(var: usize, value: i64) -> Formula {
        Formula::atom(Atom::GreaterThan { var: VarId(var), value })
    }

    fn eq_const(var: usize, value: i64) -> Formula {
        Formula::atom(Atom::EqualConst { var: VarId(var), value })
    }

    fn eq_var(a: usize, b: usize) -> Formula {
        Formula::atom(Atom::EqualVar { a: VarId(a), b: VarId(b) })
    }

    #[test]
    fn test_not_is_pushed_to_atoms() {
        let f = Formula::not(Formula::and(vec![gt(0, 1), eq_const(1, 0)]));
        assert_eq!(
            f,
            Formula::or(vec![
                Formula::atom(Atom::LessEqual { var: VarId(0), value: 1 }),
                Formula::atom(Atom::NotEqualConst { var: VarId(1), value: 0 }),
            ])
        );
        assert_eq!(Formula::not(Formula::not(gt(0, 3))), gt(0, 3));
    }

    #[test]
    fn test_truth_of_atoms() {
        let d = Domains::new(vec![(2, 4), (0, 1), (3, 3), (3, 3)]);
        assert_eq!(gt(0, 1).truth(&d), Truth::True);
        assert_eq!(gt(0, 4).truth(&d), Truth::False);
        assert_eq!(gt(0, 2).truth(&d), Truth::Unknown);
        assert_eq!(eq_const(1, 5).truth(&d), Truth::False);
        assert_eq!(eq_var(2, 3).truth(&d), Truth::True);
        assert_eq!(eq_var(1, 2).truth(&d), Truth::False);
        assert_eq!(eq_var(0, 2).truth(&d), Truth::Unknown);
    }

    #[test]
    fn test_or_unit_propagation() {
        // (x > 1) or (u == x), with x fixed to 1: u must become 1
        let f = Formula::or(vec![gt(0, 1), eq_var(1, 0)]);
        let mut d = Domains::new(vec![(1, 1), (0, 1)]);
        let mut touched = Vec::new();
        f.enforce(&mut d, &mut touched).unwrap();
        assert_eq!(d.value(VarId(1)), Some(1));
        assert_eq!(touched, vec![VarId(1)]);
    }

    #[test]
    fn test_or_all_false_conflicts() {
        let f = Formula::or(vec![gt(0, 1), eq_const(1, 1)]);
        let mut d = Domains::new(vec![(0, 1), (0, 0)]);
        let mut touched = Vec::new();
        assert_eq!(f.enforce(&mut d, &mut touched), Err(Conflict));
        assert_eq!(Formula::or(vec![]).enforce(&mut d, &mut touched), Err(Conflict));
    }

    #[test]
    fn test_or_with_two_open_children_waits() {
        let f = Formula::or(vec![gt(0, 1), eq_const(1, 1)]);
        let mut d = Domains::new(vec![(0, 3), (0, 1)]);
        let before = d.clone();
        let mut touched = Vec::new();
        f.enforce(&mut d, &mut touched).unwrap();
        assert_eq!(d, before);
        assert!(touched.is_empty());
    }

    #[test]
    fn test_not_equal_shaves_bounds() {
        let mut d = Domains::new(vec![(0, 3), (3, 3)]);
        let mut touched = Vec::new();
        Atom::NotEqualConst { var: VarId(0), value: 0 }
            .enforce(&mut d, &mut touched)
            .unwrap();
        assert_eq!(d.min(VarId(0)), 1);
        Atom::NotEqualVar { a: VarId(0), b: VarId(1) }
            .enforce(&mut d, &mut touched)
            .unwrap();
        assert_eq!(d.max(VarId(0)), 2);
    }

    #[test]
    fn test_check_and_vars() {
        let f = Formula::implies(gt(0, 1), eq_const(1, 1));
        assert!(f.check(&[2, 1]));
        assert!(!f.check(&[2, 0]));
        assert!(f.check(&[0, 0]));
        assert_eq!(f.vars(), vec![VarId(0), VarId(1)]);
    }
}
