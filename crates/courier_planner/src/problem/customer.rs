use courier_geometry::lat_lng::LatLng;
use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::{time_window::TimeWindow, travel_matrices::Time, truck::Capacity},
};

define_index_newtype!(CustomerIdx, Customer);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerIdx,
    name: String,
    position: LatLng,
    demand: Capacity,
    time_window: TimeWindow,
    service_time: Time,
}

impl Customer {
    pub fn id(&self) -> CustomerIdx {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn demand(&self) -> Capacity {
        self.demand
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn service_time(&self) -> Time {
        self.service_time
    }
}

/// Start and end of every route. No demand, no service, no time window.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Depot {
    name: String,
    position: LatLng,
}

impl Depot {
    pub fn new(name: String, position: LatLng) -> Self {
        Depot { name, position }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> LatLng {
        self.position
    }
}

#[derive(Default)]
pub struct CustomerBuilder {
    name: Option<String>,
    position: Option<LatLng>,
    demand: Option<Capacity>,
    time_window: Option<TimeWindow>,
    service_time: Option<Time>,
}

impl CustomerBuilder {
    pub fn set_name(&mut self, name: String) -> &mut CustomerBuilder {
        self.name = Some(name);
        self
    }

    pub fn set_position(&mut self, position: LatLng) -> &mut CustomerBuilder {
        self.position = Some(position);
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut CustomerBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut CustomerBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_service_time(&mut self, service_time: Time) -> &mut CustomerBuilder {
        self.service_time = Some(service_time);
        self
    }

    /// The id is the customer's position in the problem.
    pub fn build(self, id: CustomerIdx) -> Customer {
        Customer {
            id,
            name: self.name.unwrap_or_else(|| format!("Customer {}", id.get() + 1)),
            position: self.position.unwrap_or(LatLng::new(0.0, 0.0)),
            demand: self.demand.unwrap_or(0),
            time_window: self.time_window.unwrap_or(TimeWindow::UNBOUNDED),
            service_time: self.service_time.unwrap_or(0.0),
        }
    }
}
