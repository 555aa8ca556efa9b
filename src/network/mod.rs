//! Problem graph and its min-cost-flow model.
//!
//! A [`Graph`] is turned into a [`FlowNetwork`] by [`FlowNetworkBuilder`]:
//! a synthetic source feeds the start node, every undirected edge becomes
//! two directed arcs, and every destination drains one unit into a
//! synthetic sink. [`UsageCorrector`] then makes each used edge cost its
//! price once, and [`CostObjective`] minimizes that corrected cost.
//!
//! ```text
//! source -> start -> ... edge arcs ... -> dest_i -> sink
//! ```

mod builder;
mod corrector;
mod graph;
mod objective;

pub use builder::{ArcRole, DirectedArc, Direction, FlowNetwork, FlowNetworkBuilder, NetNode};
pub use corrector::UsageCorrector;
pub(crate) use graph::check_graph_size;
pub use graph::{Edge, Graph, GraphError, GraphSpec, NodeId, NodeRole, MAX_GRAPH_SIZE};
pub use objective::CostObjective;
