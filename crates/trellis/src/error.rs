use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::{NodeId, geom, solver::SolverError};

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Error, Debug, Clone)]
pub enum Error {
    /// The solver rejected a constraint change.
    #[error("solver: {0}")]
    Solver(#[from] SolverError),
    /// No node with this id exists in the window.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    /// A parent-relative operation was applied to the root.
    #[error("node has no parent: {0:?}")]
    NoParent(NodeId),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("config: {0}")]
    /// Configuration could not be parsed.
    Config(String),
    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
