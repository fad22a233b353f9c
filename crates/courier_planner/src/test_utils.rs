use courier_geometry::lat_lng::LatLng;

use crate::{
    constraints::constraint_set::ConstraintSet,
    problem::{
        customer::{CustomerBuilder, CustomerIdx, Depot},
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        time_window::TimeWindow,
        travel_matrices::TravelMatrices,
        truck::{Capacity, Truck, TruckIdx},
        visit::Visit,
    },
    solution::{parser::build_solution, solution::Solution},
    solver::raw_assignment::RawAssignment,
};

/// Customer on a line, `x` away from the depot.
pub struct TestCustomer {
    pub x: f64,
    pub demand: Capacity,
    pub time_window: (f64, f64),
    pub service_time: f64,
}

impl TestCustomer {
    pub fn new(x: f64, demand: Capacity, time_window: (f64, f64), service_time: f64) -> Self {
        TestCustomer {
            x,
            demand,
            time_window,
            service_time,
        }
    }
}

/// Depot at 0, customers named `C1..Cn`, trucks named `Truck 1..m`.
/// Distance and travel time between two locations are both `|x1 - x2|`.
pub fn create_line_problem(capacities: Vec<Capacity>, customers: Vec<TestCustomer>) -> DispatchProblem {
    create_line_problem_with_constraints(capacities, customers, ConstraintSet::default())
}

pub fn create_line_problem_with_constraints(
    capacities: Vec<Capacity>,
    customers: Vec<TestCustomer>,
    constraints: ConstraintSet,
) -> DispatchProblem {
    let xs: Vec<f64> = customers
        .iter()
        .map(|customer| customer.x)
        .chain(std::iter::once(0.0))
        .collect();
    let matrix: Vec<Vec<f64>> = xs
        .iter()
        .map(|from| xs.iter().map(|to| (from - to).abs()).collect())
        .collect();

    let trucks = capacities
        .into_iter()
        .enumerate()
        .map(|(index, capacity)| {
            Truck::new(
                TruckIdx::new(index),
                format!("Truck {}", index + 1),
                "#7fc97f".to_string(),
                capacity,
            )
        })
        .collect();

    let customers = customers
        .into_iter()
        .enumerate()
        .map(|(index, customer)| {
            let mut builder = CustomerBuilder::default();
            builder
                .set_name(format!("C{}", index + 1))
                .set_position(LatLng::new(0.0, customer.x * 0.01))
                .set_demand(customer.demand)
                .set_time_window(TimeWindow::new(customer.time_window.0, customer.time_window.1))
                .set_service_time(customer.service_time);
            builder.build(CustomerIdx::new(index))
        })
        .collect();

    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_trucks(trucks)
        .set_customers(customers)
        .set_depot(Depot::new("Depot".to_string(), LatLng::new(0.0, 0.0)))
        .set_matrices(TravelMatrices::new(matrix.clone(), matrix).unwrap())
        .set_constraints(constraints);
    builder.build().unwrap()
}

/// Raw solver output for `routes[truck] = customer indices`, with timings
/// simulated from time 0: wait for window starts, serve, drive on.
/// Trucks without an entry stay at the depot.
pub fn create_raw_assignment(problem: &DispatchProblem, routes: Vec<Vec<usize>>) -> RawAssignment {
    let num_customers = problem.customers().len();
    let num_nodes = num_customers + 2 * problem.trucks().len();
    let mut raw = RawAssignment {
        objective: 0.0,
        successor: vec![],
        vehicle_of: vec![0; num_nodes],
        arrival_time: vec![0.0; num_nodes],
        start_of_service: vec![0.0; num_nodes],
    };

    for truck in 0..problem.trucks().len() {
        let customers = routes.get(truck).map(Vec::as_slice).unwrap_or_default();
        let start_node = num_customers + 2 * truck;
        let end_node = start_node + 1;
        raw.vehicle_of[start_node] = truck + 1;
        raw.vehicle_of[end_node] = truck + 1;

        let mut time = 0.0;
        let mut previous = Visit::Depot;
        for &customer in customers {
            let visit = Visit::Customer(CustomerIdx::new(customer));
            let arrival = time + problem.travel_time(previous, visit);
            let start = f64::max(
                arrival,
                problem.customer(CustomerIdx::new(customer)).time_window().start(),
            );

            raw.vehicle_of[customer] = truck + 1;
            raw.arrival_time[customer] = arrival;
            raw.start_of_service[customer] = start;
            raw.objective += problem.travel_distance(previous, visit);

            time = start + problem.service_time(visit);
            previous = visit;
        }

        let back = time + problem.travel_time(previous, Visit::Depot);
        raw.objective += problem.travel_distance(previous, Visit::Depot);
        raw.arrival_time[end_node] = back;
        raw.start_of_service[end_node] = back;
    }

    raw
}

pub fn create_test_solution(problem: &DispatchProblem, routes: Vec<Vec<usize>>) -> Solution {
    let raw = create_raw_assignment(problem, routes);
    build_solution(problem, &raw).unwrap()
}
