use courier_geometry::geometry_provider::GeometryProvider;
use thiserror::Error;
use tracing::error;

use crate::{
    problem::{
        customer::CustomerIdx, dispatch_problem::DispatchProblem, truck::TruckIdx, visit::Visit,
    },
    solution::{
        geometry::resolve_solution_geometry, served_stop::ServedStop, solution::Solution,
        truck_route::TruckRoute,
    },
    solver::raw_assignment::RawAssignment,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Node {node} is assigned to unknown vehicle {vehicle}")]
    VehicleOutOfRange { node: usize, vehicle: usize },
}

fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<(), ParseError> {
    if expected != actual {
        return Err(ParseError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Converts a raw solver assignment into routes with timings and distances.
///
/// Timings come from the solver. A stop's departure is back-computed from the
/// next arrival, the last stop departs when it arrives. Routes not bounded by
/// the depot are kept and reported as
/// [`crate::constraints::violation::Violation::MalformedRoute`].
pub fn build_solution(
    problem: &DispatchProblem,
    raw: &RawAssignment,
) -> Result<Solution, ParseError> {
    let num_customers = problem.customers().len();
    let num_trucks = problem.trucks().len();
    let num_nodes = num_customers + 2 * num_trucks;

    check_length("vehicleOf", num_nodes, raw.vehicle_of.len())?;
    check_length("arrivalTime", num_nodes, raw.arrival_time.len())?;
    check_length("startOfService", num_nodes, raw.start_of_service.len())?;

    let mut routes: Vec<TruckRoute> = (0..num_trucks)
        .map(|truck| TruckRoute::new(TruckIdx::new(truck)))
        .collect();

    for (node, &vehicle) in raw.vehicle_of.iter().enumerate() {
        if vehicle == 0 || vehicle > num_trucks {
            return Err(ParseError::VehicleOutOfRange { node, vehicle });
        }

        let visit = if node < num_customers {
            Visit::Customer(CustomerIdx::new(node))
        } else {
            Visit::Depot
        };

        routes[vehicle - 1].stops.push(ServedStop::new(
            visit,
            raw.arrival_time[node],
            raw.start_of_service[node],
            problem.service_time(visit),
        ));
    }

    for route in routes.iter_mut() {
        let truck = route.truck;
        route
            .stops
            .sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));

        if let Some(reason) = route.malformed_reason() {
            error!(
                "Route of truck {} is malformed: {}",
                problem.truck(truck).name(),
                reason
            );
        }

        if let Some(last) = route.stops.last_mut() {
            last.departure_time = last.arrival_time;
        }

        route.refresh_legs(problem);
        for position in 1..route.stops.len() {
            let arrival = route.stops[position].arrival_time;
            let time_to = route.stops[position].time_to;
            route.stops[position - 1].departure_time = arrival - time_to;
        }
    }

    let mut solution = Solution {
        distance: raw.objective,
        finish_time: f64::NAN,
        routes,
        issues: Vec::new(),
    };
    let distance = solution.distance;
    solution.refresh_totals();
    solution.refresh_issues(problem);
    solution.distance = distance;

    Ok(solution)
}

/// [`build_solution`], then road geometry for every route with customers.
pub async fn parse_solution<G: GeometryProvider>(
    problem: &DispatchProblem,
    raw: &RawAssignment,
    geometry: &G,
) -> Result<Solution, ParseError> {
    let mut solution = build_solution(problem, raw)?;
    resolve_solution_geometry(problem, &mut solution, geometry).await;
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraints::violation::Violation,
        test_utils::{self, TestCustomer},
    };

    fn problem() -> DispatchProblem {
        test_utils::create_line_problem(
            vec![10, 10],
            vec![
                TestCustomer::new(2.0, 1, (0.0, 100.0), 5.0),
                TestCustomer::new(5.0, 2, (20.0, 100.0), 5.0),
                TestCustomer::new(1.0, 3, (0.0, 100.0), 5.0),
            ],
        )
    }

    fn raw() -> RawAssignment {
        // truck 1: depot -> C1 -> C2 -> depot, truck 2: depot -> C3 -> depot
        RawAssignment {
            objective: 12.0,
            successor: vec![],
            vehicle_of: vec![1, 1, 2, 1, 1, 2, 2],
            arrival_time: vec![2.0, 10.0, 1.0, 0.0, 30.0, 0.0, 7.0],
            start_of_service: vec![2.0, 20.0, 1.0, 0.0, 30.0, 0.0, 7.0],
        }
    }

    #[test]
    fn test_build_solution() {
        let problem = problem();
        let solution = build_solution(&problem, &raw()).unwrap();

        assert!(solution.issues().is_empty());
        assert_eq!(solution.distance(), 12.0);
        assert_eq!(solution.finish_time(), 30.0);

        let route = solution.route(TruckIdx::new(0)).unwrap();
        let visits: Vec<Visit> = route.stops().iter().map(|stop| stop.visit()).collect();
        assert_eq!(
            visits,
            vec![
                Visit::Depot,
                Visit::Customer(CustomerIdx::new(0)),
                Visit::Customer(CustomerIdx::new(1)),
                Visit::Depot,
            ]
        );
        assert_eq!(route.used_capacity(), 3);
        assert_eq!(route.total_distance(), 10.0);
        assert_eq!(route.start_time(), 0.0);
        assert_eq!(route.finish_time(), 30.0);

        // back-computed from the next arrival
        assert_eq!(route.stops()[0].departure_time(), 0.0);
        assert_eq!(route.stops()[1].departure_time(), 7.0);
        assert_eq!(route.stops()[2].departure_time(), 25.0);
        assert_eq!(route.stops()[2].end_of_service(), 25.0);
        assert_eq!(route.stops()[3].departure_time(), 30.0);
        assert_eq!(route.stops()[2].time_to(), 3.0);
    }

    #[test]
    fn test_depot_bounded_routes_and_capacity() {
        let problem = problem();
        let solution = build_solution(&problem, &raw()).unwrap();

        for route in solution.routes() {
            assert!(route.stops().first().unwrap().is_depot());
            assert!(route.stops().last().unwrap().is_depot());
            let demand: u32 = route
                .stops()
                .iter()
                .map(|stop| problem.demand(stop.visit()))
                .sum();
            assert_eq!(demand, route.used_capacity());
        }
    }

    #[test]
    fn test_malformed_route_is_reported() {
        let problem = problem();
        let mut raw = raw();
        // C3 before truck 2 leaves the depot
        raw.arrival_time[2] = -1.0;

        let solution = build_solution(&problem, &raw).unwrap();

        assert_eq!(
            solution.issues(),
            &[Violation::MalformedRoute {
                truck: "Truck 2".to_string(),
                reason: "does not start at the depot".to_string(),
            }]
        );
    }

    #[test]
    fn test_structural_errors() {
        let problem = problem();

        let mut short = raw();
        short.arrival_time.pop();
        assert!(matches!(
            build_solution(&problem, &short),
            Err(ParseError::LengthMismatch {
                field: "arrivalTime",
                expected: 7,
                actual: 6
            })
        ));

        let mut unknown = raw();
        unknown.vehicle_of[1] = 3;
        assert!(matches!(
            build_solution(&problem, &unknown),
            Err(ParseError::VehicleOutOfRange {
                node: 1,
                vehicle: 3
            })
        ));
    }
}
