use std::fmt::Display;

use serde::Serialize;

/// Lifecycle of a solution node.
///
/// Only `Interactive` nodes are edited in place, any other node is forked
/// first. `TimedOut` can be solved again, `Unsatisfiable` cannot.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Interactive,
    Solving,
    Satisfied,
    TimedOut,
    Unsatisfiable,
}

impl NodeState {
    pub fn can_solve(&self) -> bool {
        matches!(self, NodeState::Interactive | NodeState::TimedOut)
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, NodeState::Interactive)
    }
}

impl Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NodeState::Interactive => "interactive",
            NodeState::Solving => "solving",
            NodeState::Satisfied => "satisfied",
            NodeState::TimedOut => "timeout",
            NodeState::Unsatisfiable => "unsatisfiable",
        };
        write!(f, "{label}")
    }
}
