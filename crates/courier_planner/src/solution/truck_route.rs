use courier_geometry::{lat_lng::LatLng, route_geometry::RouteGeometry};
use serde::Serialize;

use crate::{
    problem::{
        customer::CustomerIdx,
        dispatch_problem::DispatchProblem,
        travel_matrices::{Distance, Time},
        truck::{Capacity, TruckIdx},
    },
    solution::served_stop::ServedStop,
};

/// Ordered stops of one truck, depot first and last.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TruckRoute {
    pub(crate) truck: TruckIdx,
    pub(crate) stops: Vec<ServedStop>,
    pub(crate) used_capacity: Capacity,
    pub(crate) total_distance: Distance,
    pub(crate) start_time: Time,
}

impl TruckRoute {
    pub fn new(truck: TruckIdx) -> Self {
        TruckRoute {
            truck,
            stops: Vec::new(),
            used_capacity: 0,
            total_distance: 0.0,
            start_time: f64::NAN,
        }
    }

    pub fn truck(&self) -> TruckIdx {
        self.truck
    }

    pub fn stops(&self) -> &[ServedStop] {
        &self.stops
    }

    pub fn used_capacity(&self) -> Capacity {
        self.used_capacity
    }

    pub fn total_distance(&self) -> Distance {
        self.total_distance
    }

    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// Arrival at the last stop.
    pub fn finish_time(&self) -> Time {
        self.stops
            .last()
            .map_or(f64::NAN, |stop| stop.arrival_time)
    }

    pub fn customers(&self) -> Vec<CustomerIdx> {
        self.stops
            .iter()
            .filter_map(|stop| stop.visit.customer())
            .collect()
    }

    /// Why the route is not bounded by the depot, if it is not.
    pub fn malformed_reason(&self) -> Option<&'static str> {
        match (self.stops.first(), self.stops.last()) {
            (None, _) | (_, None) => Some("no stops"),
            (Some(first), _) if !first.is_depot() => Some("does not start at the depot"),
            (_, Some(last)) if !last.is_depot() => Some("does not end at the depot"),
            _ if self.stops.len() < 2 => Some("depot visited once"),
            _ => None,
        }
    }

    pub fn has_customers(&self) -> bool {
        self.stops.iter().any(|stop| !stop.is_depot())
    }

    pub fn position_of(&self, customer: CustomerIdx) -> Option<usize> {
        self.stops
            .iter()
            .position(|stop| stop.visit.customer() == Some(customer))
    }

    pub(crate) fn remove_customer(&mut self, customer: CustomerIdx) -> Option<ServedStop> {
        self.position_of(customer)
            .map(|position| self.stops.remove(position))
    }

    /// Inserts before the trailing depot, or appends when the route has no depot end.
    pub(crate) fn insert_before_last_depot(&mut self, stop: ServedStop) {
        match self.stops.last() {
            Some(last) if last.is_depot() && self.stops.len() > 1 => {
                let position = self.stops.len() - 1;
                self.stops.insert(position, stop);
            }
            _ => self.stops.push(stop),
        }
    }

    pub(crate) fn insert_at(&mut self, position: usize, stop: ServedStop) {
        self.stops.insert(position.min(self.stops.len()), stop);
    }

    /// Recomputes leg distances and times, total distance and used capacity
    /// from the current stop order. Stop timings are left untouched.
    pub(crate) fn refresh_legs(&mut self, problem: &DispatchProblem) {
        self.total_distance = 0.0;
        for position in 0..self.stops.len() {
            if position == 0 {
                self.stops[0].distance_to = 0.0;
                self.stops[0].time_to = 0.0;
                continue;
            }

            let from = self.stops[position - 1].visit;
            let to = &mut self.stops[position];
            to.distance_to = problem.travel_distance(from, to.visit);
            to.time_to = problem.travel_time(from, to.visit);
            self.total_distance += to.distance_to;
        }

        self.refresh_used_capacity(problem);
        self.start_time = self
            .stops
            .first()
            .map_or(f64::NAN, |stop| stop.arrival_time);
    }

    pub(crate) fn refresh_used_capacity(&mut self, problem: &DispatchProblem) {
        self.used_capacity = self
            .stops
            .iter()
            .map(|stop| problem.demand(stop.visit))
            .sum();
    }

    pub fn positions(&self, problem: &DispatchProblem) -> Vec<LatLng> {
        self.stops
            .iter()
            .map(|stop| problem.position(stop.visit))
            .collect()
    }

    /// `geometry.legs[i]` becomes the waypoints of stop `i + 1`.
    pub(crate) fn attach_geometry(&mut self, geometry: RouteGeometry) {
        for (stop, leg) in self.stops.iter_mut().skip(1).zip(geometry.legs) {
            stop.waypoints = leg.waypoints;
        }
    }
}
