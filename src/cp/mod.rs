//! Constraint Programming (CP) framework.
//!
//! A small finite-domain solver: integer and boolean variables, linear
//! constraints, boolean formulas over comparisons, and a depth-first
//! branch-and-bound search with bounds propagation.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`], [`BoolVar`], addressed through [`VarId`]
//! - **Constraints**: [`Constraint`] holding linear relations and [`Formula`]s
//! - **Model**: [`CpModel`] holds variables, constraints, objective and branching order
//! - **Solver**: [`CpSolver`] trait, implemented by [`BranchAndBoundSolver`]
//!
//! # Design
//!
//! Domains are plain `[min, max]` intervals. Propagation runs each
//! constraint through a watch-list queue until a fixpoint. The search
//! copies the domains at every branch instead of trailing changes.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod domain;
mod formula;
mod model;
mod propagate;
mod solver;
mod variables;

pub use formula::{Atom, Formula};
pub use model::{Constraint, CpModel, Objective, Relation};
pub use solver::{
    BranchAndBoundSolver, CpSolution, CpSolver, SearchStats, SolverConfig, SolverStatus,
};
pub use variables::{BoolVar, IntVar, VarId};
