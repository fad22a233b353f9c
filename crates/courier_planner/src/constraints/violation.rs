use std::fmt::Display;

use serde::Serialize;

use crate::problem::truck::Capacity;

/// A broken physical or user imposed constraint, named for display.
///
/// Trucks and customers are referred to by name.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    CapacityExceeded {
        truck: String,
        used: Capacity,
        capacity: Capacity,
    },
    ServedBeforeStart {
        customer: String,
        truck: String,
    },
    ServedAfterEnd {
        customer: String,
        truck: String,
    },
    ImpossibleArrival {
        customer: String,
        previous: String,
    },
    NotServed {
        customer: String,
    },
    NotSameTruck {
        from: String,
        to: String,
    },
    OrderNotRespected {
        from: String,
        to: String,
    },
    WrongTruck {
        customer: String,
        truck: String,
    },
    TruckNotUsed {
        truck: String,
    },
    LockedOrderBroken {
        truck: String,
        customer: String,
    },
    MalformedRoute {
        truck: String,
        reason: String,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::CapacityExceeded {
                truck,
                used,
                capacity,
            } => write!(f, "{truck} used a capacity of {used}/{capacity}"),
            Violation::ServedBeforeStart { customer, truck } => write!(
                f,
                "Customer {customer} served by {truck} before his/her start time"
            ),
            Violation::ServedAfterEnd { customer, truck } => write!(
                f,
                "Customer {customer} served by {truck} after his/her end time"
            ),
            Violation::ImpossibleArrival { customer, previous } => write!(
                f,
                "Cannot arrive at {customer} before departing from the previous stop {previous}"
            ),
            Violation::NotServed { customer } => write!(f, "Customer {customer} not served"),
            Violation::NotSameTruck { from, to } => write!(
                f,
                "Customer {from} and {to} are not served by the same truck"
            ),
            Violation::OrderNotRespected { from, to } => {
                write!(f, "Customer {from} was not served before {to}")
            }
            Violation::WrongTruck { customer, truck } => {
                write!(f, "Customer {customer} not served by {truck}")
            }
            Violation::TruckNotUsed { truck } => write!(f, "{truck} not used"),
            Violation::LockedOrderBroken { truck, customer } => write!(
                f,
                "{truck} not serving customer {customer} in proper order"
            ),
            Violation::MalformedRoute { truck, reason } => {
                write!(f, "Route of {truck} is malformed: {reason}")
            }
        }
    }
}
