use serde::Serialize;

use crate::problem::{travel_matrices::Distance, truck::Capacity};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReoptimizeOutcome {
    /// The route now holds the shortest feasible ordering found.
    /// `exhaustive` is false when a ceiling stopped the search early.
    Optimized {
        total_distance: Distance,
        permutations: usize,
        exhaustive: bool,
    },
    /// Every ordering was examined, none is feasible. Route unchanged.
    Infeasible { permutations: usize },
    /// Demand on the route is above the truck capacity. Route unchanged.
    CapacityExceeded { used: Capacity, capacity: Capacity },
    /// A ceiling was reached before any feasible ordering was found. Route unchanged.
    LimitReached { permutations: usize },
}

impl ReoptimizeOutcome {
    pub fn is_optimized(&self) -> bool {
        matches!(self, ReoptimizeOutcome::Optimized { .. })
    }
}
