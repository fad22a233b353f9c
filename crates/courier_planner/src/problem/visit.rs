use std::fmt::Display;

use serde::Serialize;

use crate::problem::customer::CustomerIdx;

/// What a route stop visits.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
    Depot,
    Customer(CustomerIdx),
}

impl Visit {
    pub fn is_depot(&self) -> bool {
        matches!(self, Visit::Depot)
    }

    pub fn customer(&self) -> Option<CustomerIdx> {
        match self {
            Visit::Depot => None,
            Visit::Customer(customer) => Some(*customer),
        }
    }
}

impl From<CustomerIdx> for Visit {
    fn from(customer: CustomerIdx) -> Self {
        Visit::Customer(customer)
    }
}

impl Display for Visit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visit::Depot => write!(f, "Depot"),
            Visit::Customer(customer) => write!(f, "Customer({})", customer),
        }
    }
}
