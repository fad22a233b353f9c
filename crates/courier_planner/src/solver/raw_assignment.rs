use serde::{Deserialize, Serialize};

/// One solution returned by the solver service.
///
/// Arrays have one entry per routing node: customers first, then a start and
/// an end depot node per truck. `vehicle_of` holds 1-based truck numbers.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    pub objective: f64,
    #[serde(default)]
    pub successor: Vec<usize>,
    pub vehicle_of: Vec<usize>,
    pub arrival_time: Vec<f64>,
    pub start_of_service: Vec<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    OptimalSolution,
    AllSolutions,
    Satisfied,
    #[serde(other)]
    Other,
}

impl SolveStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SolveStatus::OptimalSolution | SolveStatus::AllSolutions | SolveStatus::Satisfied
        )
    }
}

/// Ranked solutions, best last.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SolveResponse {
    pub status: SolveStatus,
    pub solutions: Vec<RawAssignment>,
}

impl SolveResponse {
    pub fn best(&self) -> Option<&RawAssignment> {
        self.solutions.last()
    }
}
