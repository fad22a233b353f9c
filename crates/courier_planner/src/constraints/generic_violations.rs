use crate::{
    constraints::violation::Violation,
    problem::{dispatch_problem::DispatchProblem, visit::Visit},
    solution::{solution::Solution, truck_route::TruckRoute},
};

/// Slack when comparing derived times, which are sums of floats.
pub const TIME_EPSILON: f64 = 1e-6;

/// Capacity, time windows and arrival consistency of a single route.
pub fn check_generic_truck_violations(
    problem: &DispatchProblem,
    route: &TruckRoute,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let truck = problem.truck(route.truck());

    if route.used_capacity() > truck.capacity() {
        violations.push(Violation::CapacityExceeded {
            truck: truck.name().to_string(),
            used: route.used_capacity(),
            capacity: truck.capacity(),
        });
    }

    for (position, stop) in route.stops().iter().enumerate() {
        if let Visit::Customer(customer_id) = stop.visit() {
            let customer = problem.customer(customer_id);
            let time_window = customer.time_window();

            if time_window.is_early(stop.start_of_service()) {
                violations.push(Violation::ServedBeforeStart {
                    customer: customer.name().to_string(),
                    truck: truck.name().to_string(),
                });
            }

            if time_window.is_late(stop.start_of_service() + customer.service_time()) {
                violations.push(Violation::ServedAfterEnd {
                    customer: customer.name().to_string(),
                    truck: truck.name().to_string(),
                });
            }
        }

        if position == 0 {
            continue;
        }

        let previous = &route.stops()[position - 1];
        if previous.departure_time() + stop.time_to() > stop.arrival_time() + TIME_EPSILON {
            violations.push(Violation::ImpossibleArrival {
                customer: problem.visit_name(stop.visit()).to_string(),
                previous: problem.visit_name(previous.visit()).to_string(),
            });
        }
    }

    violations
}

pub fn check_generic_violations(problem: &DispatchProblem, solution: &Solution) -> Vec<Violation> {
    solution
        .routes()
        .iter()
        .flat_map(|route| check_generic_truck_violations(problem, route))
        .collect()
}
