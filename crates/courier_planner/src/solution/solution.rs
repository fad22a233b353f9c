use std::hash::{Hash, Hasher};

use fxhash::FxHasher64;
use serde::Serialize;

use crate::{
    constraints::violation::Violation,
    problem::{
        customer::CustomerIdx,
        dispatch_problem::DispatchProblem,
        travel_matrices::{Distance, Time},
        truck::TruckIdx,
    },
    solution::truck_route::TruckRoute,
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub(crate) distance: Distance,
    pub(crate) finish_time: Time,
    pub(crate) routes: Vec<TruckRoute>,
    /// Routes not bounded by the depot, kept in sync with `routes`.
    pub(crate) issues: Vec<Violation>,
}

impl Solution {
    /// No routes yet, totals are NaN.
    pub fn empty() -> Self {
        Solution {
            distance: f64::NAN,
            finish_time: f64::NAN,
            routes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn finish_time(&self) -> Time {
        self.finish_time
    }

    pub fn routes(&self) -> &[TruckRoute] {
        &self.routes
    }

    pub fn route(&self, truck: TruckIdx) -> Option<&TruckRoute> {
        self.routes.iter().find(|route| route.truck == truck)
    }

    pub(crate) fn route_mut(&mut self, truck: TruckIdx) -> Option<&mut TruckRoute> {
        self.routes.iter_mut().find(|route| route.truck == truck)
    }

    pub fn issues(&self) -> &[Violation] {
        &self.issues
    }

    pub(crate) fn refresh_issues(&mut self, problem: &DispatchProblem) {
        self.issues = self
            .routes
            .iter()
            .filter_map(|route| {
                route.malformed_reason().map(|reason| Violation::MalformedRoute {
                    truck: problem.truck(route.truck).name().to_string(),
                    reason: reason.to_string(),
                })
            })
            .collect();
    }

    /// Truck and stop position serving `customer`.
    pub fn serving(&self, customer: CustomerIdx) -> Option<(TruckIdx, usize)> {
        self.routes.iter().find_map(|route| {
            route
                .position_of(customer)
                .map(|position| (route.truck, position))
        })
    }

    /// Distance becomes the sum of route distances, finish time the latest route finish.
    pub(crate) fn refresh_totals(&mut self) {
        self.distance = self.routes.iter().map(|route| route.total_distance).sum();
        self.finish_time = self
            .routes
            .iter()
            .map(|route| route.finish_time())
            .filter(|finish| !finish.is_nan())
            .fold(0.0, f64::max);
    }

    /// Same value for two solutions visiting customers in the same order on
    /// the same trucks, whatever their timings.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher64::default();
        for route in &self.routes {
            route.truck.hash(&mut hasher);
            for stop in route.stops() {
                stop.visit().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Solution::empty()
    }
}
