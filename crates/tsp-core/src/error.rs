use thiserror::Error;

/// Workspace-wide error type.
///
/// Every kind except [`Error::Cancelled`] is a precondition violation
/// detected before any heavy computation starts.
#[derive(Debug, Error)]
pub enum Error {
    /// A closed tour needs at least two waypoints.
    #[error("need at least 2 waypoints to build a tour, got {0}")]
    InsufficientWaypoints(usize),
    /// The cost table is unusable: wrong shape or out-of-range entries.
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),
    /// A weighting parameter or solver option is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The requested solver refuses inputs of this size.
    #[error("{waypoints} waypoints exceed the solver ceiling of {ceiling}")]
    CapacityExceeded { waypoints: usize, ceiling: usize },
    /// A path failed the closed-tour shape check.
    #[error("invalid tour: {0}")]
    InvalidTour(String),
    /// The cancellation token fired before the solve finished.
    #[error("solve cancelled before completion")]
    Cancelled,
    /// A malformed request reached one of the binaries.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
