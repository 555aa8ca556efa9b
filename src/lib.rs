//! Multi-destination minimum-cost routing.
//!
//! Finds the cheapest set of paths from one start node to several
//! destinations in an undirected weighted graph, paying for every used
//! edge once. This is the Steiner tree problem, solved here as a
//! min-cost-flow constraint model with a usage correction:
//!
//! - **CP (Constraint Programming)**: a small finite-domain solver with
//!   linear constraints, boolean formulas over comparisons and a
//!   branch-and-bound search.
//! - **Network**: the problem graph and its flow model (source, sink,
//!   two directed arcs per edge, conservation), the usage corrector and
//!   the corrected cost objective.
//! - **Route**: the search driver turning a graph into a route or an error,
//!   plus DOT rendering.
//! - **Instances**: bundled problems with known optima and a seeded
//!   random graph generator.
//! - **Text**: the `key = value;` problem file format.
//!
//! # Example
//!
//! ```
//! use u_flowpath::cp::SolverConfig;
//! use u_flowpath::instances::Example;
//! use u_flowpath::route::RouteRunner;
//!
//! let route = RouteRunner::run(&Example::Branching.graph(), &SolverConfig::default()).unwrap();
//! assert_eq!(route.cost, 8);
//! assert_eq!(route.visited_nodes(), vec![1, 2, 3, 5, 6, 7, 8]);
//! ```

pub mod cp;
pub mod instances;
pub mod network;
pub mod route;
pub mod text;
