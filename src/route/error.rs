use crate::cp::SolverStatus;
use crate::network::GraphError;
use std::fmt;

/// Why no route was returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The input graph was rejected.
    InvalidGraph(GraphError),
    /// The solver configuration was rejected.
    InvalidConfig(String),
    /// The generated model failed validation.
    Model(String),
    /// No set of paths reaches every destination.
    Infeasible,
    /// The search stopped (limit or cancellation) before any route was found.
    SolverFailure(SolverStatus),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidGraph(e) => write!(f, "invalid graph: {e}"),
            RouteError::InvalidConfig(reason) => write!(f, "invalid solver config: {reason}"),
            RouteError::Model(reason) => write!(f, "invalid flow model: {reason}"),
            RouteError::Infeasible => write!(f, "no route reaches every destination"),
            RouteError::SolverFailure(status) => {
                write!(f, "search stopped without a route ({status})")
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidGraph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for RouteError {
    fn from(e: GraphError) -> Self {
        RouteError::InvalidGraph(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = RouteError::from(GraphError::NoDestinations);
        assert_eq!(err.to_string(), "invalid graph: no destinations given");
        assert!(err.source().is_some());

        let err = RouteError::SolverFailure(SolverStatus::Timeout);
        assert_eq!(err.to_string(), "search stopped without a route (timeout)");
        assert!(err.source().is_none());
    }
}
