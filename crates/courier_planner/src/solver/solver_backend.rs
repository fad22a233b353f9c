use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::solver::{
    raw_assignment::{RawAssignment, SolveResponse},
    solve_params::SolveRequest,
};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Solver timed out: {0}")]
    Timeout(String),

    #[error("Invalid solver response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Global optimization service. Opaque: takes a model and parameters and
/// returns ranked solutions.
pub trait SolverBackend: Send + Sync {
    /// Intermediate solutions, if the backend produces any, are sent to
    /// `partials` as they arrive.
    fn solve(
        &self,
        request: SolveRequest,
        partials: UnboundedSender<RawAssignment>,
    ) -> impl Future<Output = Result<SolveResponse, SolverError>> + Send;
}
