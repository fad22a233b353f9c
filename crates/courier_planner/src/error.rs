use thiserror::Error;

use crate::{
    problem::dispatch_problem::ProblemError,
    solution::parser::ParseError,
    solver::solver_backend::SolverError,
    tree::{node_state::NodeState, solution_node::NodeId},
};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Solution node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Cannot {action} a node in state {state}")]
    InvalidTransition {
        action: &'static str,
        state: NodeState,
    },

    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
