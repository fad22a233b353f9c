#![allow(dead_code)]

use std::{collections::VecDeque, sync::Arc};

use courier_geometry::{lat_lng::LatLng, straight_line::StraightLineProvider};
use courier_planner::{
    problem::{
        customer::{CustomerBuilder, CustomerIdx, Depot},
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        time_window::TimeWindow,
        travel_matrices::TravelMatrices,
        truck::{Capacity, Truck, TruckIdx},
        visit::Visit,
    },
    session::{planner_config::PlannerConfig, planner_session::PlannerSession},
    solver::{
        raw_assignment::{RawAssignment, SolveResponse, SolveStatus},
        solve_params::SolveRequest,
        solver_backend::{SolverBackend, SolverError},
    },
};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

pub struct LineCustomer {
    pub x: f64,
    pub demand: Capacity,
    pub window: (f64, f64),
    pub service_time: f64,
}

pub fn line_customer(x: f64, demand: Capacity, window: (f64, f64), service_time: f64) -> LineCustomer {
    LineCustomer {
        x,
        demand,
        window,
        service_time,
    }
}

/// Depot at 0, distance and travel time are `|x1 - x2|`.
pub fn create_line_problem(capacities: &[Capacity], customers: &[LineCustomer]) -> DispatchProblem {
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
        .iter()
        .enumerate()
        .map(|(index, &capacity)| {
            Truck::new(
                TruckIdx::new(index),
                format!("Truck {}", index + 1),
                "#51a7f9".to_string(),
                capacity,
            )
        })
        .collect();

    let customers = customers
        .iter()
        .enumerate()
        .map(|(index, customer)| {
            let mut builder = CustomerBuilder::default();
            builder
                .set_name(format!("C{}", index + 1))
                .set_position(LatLng::new(0.0, customer.x * 0.01))
                .set_demand(customer.demand)
                .set_time_window(TimeWindow::new(customer.window.0, customer.window.1))
                .set_service_time(customer.service_time);
            builder.build(CustomerIdx::new(index))
        })
        .collect();

    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_trucks(trucks)
        .set_customers(customers)
        .set_depot(Depot::new("Depot".to_string(), LatLng::new(0.0, 0.0)))
        .set_matrices(TravelMatrices::new(matrix.clone(), matrix).unwrap());
    builder.build().unwrap()
}

/// What the solver would return for `routes`, timings simulated from 0.
pub fn create_raw_assignment(problem: &DispatchProblem, routes: &[Vec<usize>]) -> RawAssignment {
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
        let start_node = num_customers + 2 * truck;
        raw.vehicle_of[start_node] = truck + 1;
        raw.vehicle_of[start_node + 1] = truck + 1;

        let mut time = 0.0;
        let mut previous = Visit::Depot;
        for &customer in routes.get(truck).map(Vec::as_slice).unwrap_or_default() {
            let visit = Visit::Customer(CustomerIdx::new(customer));
            let arrival = time + problem.travel_time(previous, visit);
            let window_start = problem
                .customer(CustomerIdx::new(customer))
                .time_window()
                .start();
            let start = arrival.max(window_start);

            raw.vehicle_of[customer] = truck + 1;
            raw.arrival_time[customer] = arrival;
            raw.start_of_service[customer] = start;
            raw.objective += problem.travel_distance(previous, visit);

            time = start + problem.service_time(visit);
            previous = visit;
        }

        let back = time + problem.travel_time(previous, Visit::Depot);
        raw.objective += problem.travel_distance(previous, Visit::Depot);
        raw.arrival_time[start_node + 1] = back;
        raw.start_of_service[start_node + 1] = back;
    }

    raw
}

pub enum MockReply {
    Respond {
        status: SolveStatus,
        solutions: Vec<RawAssignment>,
    },
    Timeout,
    Fail,
}

/// Replies in order, streaming every solution before returning.
#[derive(Default)]
pub struct MockSolver {
    replies: Mutex<VecDeque<MockReply>>,
    pub requests: Mutex<Vec<SolveRequest>>,
}

impl MockSolver {
    pub fn new(replies: Vec<MockReply>) -> Self {
        MockSolver {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl SolverBackend for MockSolver {
    async fn solve(
        &self,
        request: SolveRequest,
        partials: UnboundedSender<RawAssignment>,
    ) -> Result<SolveResponse, SolverError> {
        self.requests.lock().push(request);
        let reply = self.replies.lock().pop_front();

        match reply {
            Some(MockReply::Respond { status, solutions }) => {
                for solution in &solutions {
                    partials.send(solution.clone()).unwrap();
                }
                Ok(SolveResponse { status, solutions })
            }
            Some(MockReply::Timeout) => Err(SolverError::Timeout("30s elapsed".to_string())),
            Some(MockReply::Fail) | None => Err(SolverError::Api {
                status: 500,
                message: "solver crashed".to_string(),
            }),
        }
    }
}

pub type TestSession = PlannerSession<MockSolver, StraightLineProvider>;

pub fn create_session(problem: DispatchProblem, replies: Vec<MockReply>) -> TestSession {
    PlannerSession::new(
        Arc::new(problem),
        MockSolver::new(replies),
        StraightLineProvider::default(),
        PlannerConfig::new("solve minimize objective;".to_string()),
    )
}

pub fn satisfied(solutions: Vec<RawAssignment>) -> MockReply {
    MockReply::Respond {
        status: SolveStatus::Satisfied,
        solutions,
    }
}
