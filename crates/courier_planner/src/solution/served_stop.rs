use courier_geometry::lat_lng::LatLng;
use serde::Serialize;

use crate::problem::{
    travel_matrices::{Distance, Time},
    visit::Visit,
};

/// One visit within a truck route.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServedStop {
    pub(crate) visit: Visit,
    pub(crate) arrival_time: Time,
    pub(crate) start_of_service: Time,
    pub(crate) end_of_service: Time,
    pub(crate) departure_time: Time,
    /// From the previous stop, zero for the first one.
    pub(crate) distance_to: Distance,
    pub(crate) time_to: Time,
    /// Road path from the previous stop, empty until geometry is resolved.
    pub(crate) waypoints: Vec<LatLng>,
}

impl ServedStop {
    pub fn new(visit: Visit, arrival_time: Time, start_of_service: Time, service_time: Time) -> Self {
        let end_of_service = start_of_service + service_time;
        ServedStop {
            visit,
            arrival_time,
            start_of_service,
            end_of_service,
            departure_time: end_of_service,
            distance_to: 0.0,
            time_to: 0.0,
            waypoints: Vec::new(),
        }
    }

    pub fn visit(&self) -> Visit {
        self.visit
    }

    pub fn is_depot(&self) -> bool {
        self.visit.is_depot()
    }

    pub fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn start_of_service(&self) -> Time {
        self.start_of_service
    }

    pub fn end_of_service(&self) -> Time {
        self.end_of_service
    }

    pub fn departure_time(&self) -> Time {
        self.departure_time
    }

    pub fn distance_to(&self) -> Distance {
        self.distance_to
    }

    pub fn time_to(&self) -> Time {
        self.time_to
    }

    pub fn waypoints(&self) -> &[LatLng] {
        &self.waypoints
    }

    pub fn waiting_time(&self) -> Time {
        (self.start_of_service - self.arrival_time).max(0.0)
    }
}
