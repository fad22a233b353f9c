use jiff::SignedDuration;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::solver::{
    raw_assignment::{RawAssignment, SolveResponse, SolveStatus},
    solve_params::SolveRequest,
    solver_backend::{SolverBackend, SolverError},
};

pub const SOLVE_API_PATH: &str = "/solve";

#[derive(Deserialize)]
struct RestSolveResponse {
    status: SolveStatus,
    #[serde(default)]
    solutions: Vec<RestSolution>,
}

#[derive(Deserialize)]
struct RestSolution {
    assignments: RawAssignment,
}

pub struct RestSolverClientParams {
    pub solver_url: String,
    pub timeout: Option<SignedDuration>,
}

/// Solver service reachable over HTTP, returning every solution at once.
pub struct RestSolverClient {
    params: RestSolverClientParams,
    client: reqwest::Client,
}

impl RestSolverClient {
    pub fn new(params: RestSolverClientParams) -> Result<Self, SolverError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            let timeout = std::time::Duration::try_from(timeout.abs())
                .unwrap_or(std::time::Duration::ZERO);
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            params,
            client: builder.build()?,
        })
    }

    fn solve_url(&self) -> String {
        format!(
            "{}{}",
            self.params.solver_url.trim_end_matches('/'),
            SOLVE_API_PATH
        )
    }

    fn map_request_error(error: reqwest::Error) -> SolverError {
        if error.is_timeout() {
            SolverError::Timeout(error.to_string())
        } else {
            SolverError::Request(error)
        }
    }
}

impl SolverBackend for RestSolverClient {
    async fn solve(
        &self,
        request: SolveRequest,
        partials: UnboundedSender<RawAssignment>,
    ) -> Result<SolveResponse, SolverError> {
        debug!("RestSolverClient: posting model to {}", self.solve_url());

        let response = self
            .client
            .post(self.solve_url())
            .json(&request)
            .send()
            .await
            .map_err(RestSolverClient::map_request_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SolverError::Api { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(RestSolverClient::map_request_error)?;
        let response: RestSolveResponse = serde_json::from_str(&body)?;

        info!(
            "RestSolverClient: status {:?}, {} solutions",
            response.status,
            response.solutions.len()
        );

        let solutions: Vec<RawAssignment> = response
            .solutions
            .into_iter()
            .map(|solution| solution.assignments)
            .collect();

        for solution in &solutions {
            // receiver may already be dropped
            let _ = partials.send(solution.clone());
        }

        Ok(SolveResponse {
            status: response.status,
            solutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_url() {
        let client = RestSolverClient::new(RestSolverClientParams {
            solver_url: "http://localhost:3000/v1.0/".to_string(),
            timeout: Some(SignedDuration::from_secs(30)),
        })
        .unwrap();

        assert_eq!(client.solve_url(), "http://localhost:3000/v1.0/solve");
    }

    #[test]
    fn test_deserialize_response() {
        let body = r#"{
            "status": "SATISFIED",
            "solutions": [
                { "assignments": { "objective": 20, "vehicleOf": [1, 1, 1], "arrivalTime": [5, 0, 20], "startOfService": [5, 0, 20] } },
                { "assignments": { "objective": 18, "vehicleOf": [1, 1, 1], "arrivalTime": [4, 0, 18], "startOfService": [4, 0, 18] } }
            ]
        }"#;

        let response: RestSolveResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.status, SolveStatus::Satisfied);
        assert_eq!(response.solutions.len(), 2);
        assert_eq!(response.solutions[1].assignments.objective, 18.0);
    }
}
