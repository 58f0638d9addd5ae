//! Errors raised while extracting, evaluating or validating paths.

use std::fmt;

use thiserror::Error;

use crate::{Configuration, Interval};

/// Result type alias for path operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// One of the two ends of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Initial,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Initial => f.write_str("initial"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

/// The error raised when an extraction or validation cannot be satisfied.
#[derive(Debug, Clone, Error)]
pub enum ProjectionError {
    /// The requested interval does not fit inside the path's domain.
    #[error("interval {requested:?} lies outside of path domain {domain:?}")]
    OutsideDomain {
        /// The interval which was asked for.
        requested: Interval<f64>,
        /// The parameter range of the path.
        domain: Interval<f64>,
    },

    /// An endpoint of the path does not satisfy the path's constraints.
    #[error("{endpoint} configuration of path does not satisfy the constraints {constraints}: {configuration:?}")]
    EndpointInfeasible {
        /// The offending end of the path.
        endpoint: Endpoint,
        /// The name of the violated constraint set.
        constraints: String,
        /// The offending configuration.
        configuration: Configuration,
    },

    /// A configuration could not be projected onto the constraints.
    #[error("failed to project configuration at parameter {param}: {reason}")]
    Projection {
        /// The parameter at which the path was evaluated.
        param: f64,
        /// Why the projection failed.
        reason: String,
    },
}

impl ProjectionError {
    /// The endpoint that failed validation, if this error came from [check_path](crate::Path::check_path).
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ProjectionError::EndpointInfeasible { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }
}
