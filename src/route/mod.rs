//! Multi-destination routing.
//!
//! [`RouteRunner`] builds the flow model of a [`Graph`](crate::network::Graph),
//! searches it with branch-and-bound and returns either a [`RouteResult`]
//! or a [`RouteError`].
//!
//! The result lists the directed arcs that carry flow. A route reaching
//! several destinations is a tree: an arc shared by `k` destinations
//! carries `k` units of flow but is paid for once.
//!
//! # Examples
//!
//! ```
//! use u_flowpath::cp::SolverConfig;
//! use u_flowpath::network::GraphSpec;
//! use u_flowpath::route::{RouteError, RouteRunner};
//!
//! let spec = GraphSpec {
//!     graph_size: 4,
//!     start: 1,
//!     dest: vec![3, 4],
//!     from: vec![1, 2, 2],
//!     to: vec![2, 3, 4],
//!     cost: vec![5, 1, 2],
//! };
//! let route = RouteRunner::run_spec(spec, &SolverConfig::default())?;
//! assert_eq!(route.cost, 8);
//! assert_eq!(route.to_string(), "(1->2) (2->3) (2->4)");
//! # Ok::<(), RouteError>(())
//! ```

mod error;
#[cfg(test)]
pub(crate) mod oracle;
pub mod render;
mod runner;
mod types;

pub use error::RouteError;
pub use runner::RouteRunner;
pub use types::{ArcAssignment, RouteResult, TraversedArc};
