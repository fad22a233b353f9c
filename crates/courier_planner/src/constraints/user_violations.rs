use fxhash::FxHashMap;

use crate::{
    constraints::{
        constraint_set::{ConstraintSet, LockedTruck},
        violation::Violation,
    },
    problem::{customer::CustomerIdx, dispatch_problem::DispatchProblem, truck::TruckIdx},
    solution::{served_stop::ServedStop, solution::Solution, truck_route::TruckRoute},
};

struct ServedBy<'a> {
    truck: TruckIdx,
    stop: &'a ServedStop,
}

fn served_customers<'a>(route: &'a TruckRoute) -> impl Iterator<Item = (CustomerIdx, ServedBy<'a>)> {
    route.stops().iter().filter_map(move |stop| {
        stop.visit().customer().map(|customer| {
            (
                customer,
                ServedBy {
                    truck: route.truck(),
                    stop,
                },
            )
        })
    })
}

fn check_locked_truck(
    problem: &DispatchProblem,
    route: &TruckRoute,
    locked: &LockedTruck,
    violations: &mut Vec<Violation>,
) {
    for (position, &customer) in locked.customers.iter().enumerate() {
        // stop 0 is the depot
        let served = route
            .stops()
            .get(position + 1)
            .and_then(|stop| stop.visit().customer());

        if served != Some(customer) {
            violations.push(Violation::LockedOrderBroken {
                truck: problem.truck(locked.truck).name().to_string(),
                customer: problem.customer(customer).name().to_string(),
            });
        }
    }
}

/// Checks a whole solution against user constraints.
///
/// Returns early when `constraints` is empty, skipping the lookup table.
pub fn check_user_constraints(
    problem: &DispatchProblem,
    solution: &Solution,
    constraints: &ConstraintSet,
) -> Vec<Violation> {
    if constraints.is_empty() {
        return vec![];
    }

    let mut violations = Vec::new();
    let served: FxHashMap<CustomerIdx, ServedBy> = solution
        .routes()
        .iter()
        .flat_map(served_customers)
        .collect();
    let name = |customer: CustomerIdx| problem.customer(customer).name().to_string();

    for order in constraints.order_constraints() {
        let Some(from) = served.get(&order.from) else {
            violations.push(Violation::NotServed {
                customer: name(order.from),
            });
            continue;
        };
        let Some(to) = served.get(&order.to) else {
            violations.push(Violation::NotServed {
                customer: name(order.to),
            });
            continue;
        };

        if from.truck != to.truck {
            violations.push(Violation::NotSameTruck {
                from: name(order.from),
                to: name(order.to),
            });
        } else if from.stop.arrival_time() > to.stop.arrival_time() {
            violations.push(Violation::OrderNotRespected {
                from: name(order.from),
                to: name(order.to),
            });
        }
    }

    for locked in constraints.locked_customers() {
        match served.get(&locked.customer) {
            None => violations.push(Violation::NotServed {
                customer: name(locked.customer),
            }),
            Some(served_by) if served_by.truck != locked.truck => {
                violations.push(Violation::WrongTruck {
                    customer: name(locked.customer),
                    truck: problem.truck(locked.truck).name().to_string(),
                })
            }
            Some(_) => {}
        }
    }

    for locked in constraints.locked_trucks() {
        match solution.route(locked.truck) {
            Some(route) => check_locked_truck(problem, route, locked, &mut violations),
            None => violations.push(Violation::TruckNotUsed {
                truck: problem.truck(locked.truck).name().to_string(),
            }),
        }
    }

    violations
}

/// Same rules as [`check_user_constraints`], restricted to one route.
///
/// Order constraints with an end on another truck, and unserved customers,
/// are left to the whole solution check.
pub fn check_truck_constraints(
    problem: &DispatchProblem,
    route: &TruckRoute,
    constraints: &ConstraintSet,
) -> Vec<Violation> {
    if constraints.is_empty() {
        return vec![];
    }

    let mut violations = Vec::new();
    let served: FxHashMap<CustomerIdx, ServedBy> = served_customers(route).collect();
    let name = |customer: CustomerIdx| problem.customer(customer).name().to_string();

    for order in constraints.order_constraints() {
        let (Some(from), Some(to)) = (served.get(&order.from), served.get(&order.to)) else {
            continue;
        };

        if from.stop.arrival_time() > to.stop.arrival_time() {
            violations.push(Violation::OrderNotRespected {
                from: name(order.from),
                to: name(order.to),
            });
        }
    }

    for locked in constraints.locked_customers() {
        if served.contains_key(&locked.customer) && locked.truck != route.truck() {
            violations.push(Violation::WrongTruck {
                customer: name(locked.customer),
                truck: problem.truck(locked.truck).name().to_string(),
            });
        }
    }

    for locked in constraints.locked_trucks() {
        if locked.truck == route.truck() {
            check_locked_truck(problem, route, locked, &mut violations);
        }
    }

    violations
}
