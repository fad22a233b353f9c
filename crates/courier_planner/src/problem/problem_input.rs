use courier_geometry::lat_lng::LatLng;
use serde::Deserialize;

use crate::{
    constraints::constraint_set::{ConstraintSet, LockedCustomer, LockedTruck, OrderConstraint},
    problem::{
        customer::{CustomerBuilder, CustomerIdx, Depot},
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder, ProblemError},
        time_window::TimeWindow,
        travel_matrices::TravelMatrices,
        truck::{Capacity, Truck, TruckIdx},
    },
    utils::enumerate_idx::EnumerateIdx,
};

const DEFAULT_TRUCK_COLORS: [&str; 3] = ["#7fc97f", "#51a7f9", "#ff69b4"];

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TruckInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub capacity: Capacity,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub demand: Capacity,
    pub start_time: f64,
    pub end_time: f64,
    pub service_time: f64,
}

#[derive(Deserialize, Debug)]
pub struct DepotInput {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Constraints referencing customers and trucks by their zero-based position.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsInput {
    #[serde(default)]
    pub partial_order: Vec<[usize; 2]>,
    #[serde(default)]
    pub locked_customers: Vec<LockedCustomerInput>,
    #[serde(default)]
    pub locked_trucks: Vec<LockedTruckInput>,
}

#[derive(Deserialize, Debug)]
pub struct LockedCustomerInput {
    pub customer: usize,
    pub truck: usize,
}

#[derive(Deserialize, Debug)]
pub struct LockedTruckInput {
    pub truck: usize,
    pub customers: Vec<usize>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProblemInput {
    pub trucks: Vec<TruckInput>,
    pub customers: Vec<CustomerInput>,
    pub depot: DepotInput,
    /// Depot last. Built from haversine distances when missing.
    pub distances: Option<Vec<Vec<f64>>>,
    pub travel_times: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub constraints: ConstraintsInput,
}

impl ConstraintsInput {
    fn into_constraint_set(self) -> ConstraintSet {
        let mut constraints = ConstraintSet::default();

        for [from, to] in self.partial_order {
            constraints.add_order(OrderConstraint {
                from: CustomerIdx::new(from),
                to: CustomerIdx::new(to),
            });
        }

        for locked in self.locked_customers {
            constraints.lock_customer(LockedCustomer {
                customer: CustomerIdx::new(locked.customer),
                truck: TruckIdx::new(locked.truck),
            });
        }

        for locked in self.locked_trucks {
            constraints.lock_truck(LockedTruck {
                truck: TruckIdx::new(locked.truck),
                customers: locked.customers.into_iter().map(CustomerIdx::new).collect(),
            });
        }

        constraints
    }
}

impl ProblemInput {
    pub fn build_problem(self) -> Result<DispatchProblem, ProblemError> {
        let trucks = self
            .trucks
            .into_iter()
            .enumerate_idx::<TruckIdx>()
            .map(|(id, truck): (TruckIdx, TruckInput)| {
                Truck::new(
                    id,
                    truck
                        .name
                        .unwrap_or_else(|| format!("Truck {}", id.get() + 1)),
                    truck.color.unwrap_or_else(|| {
                        DEFAULT_TRUCK_COLORS[id.get() % DEFAULT_TRUCK_COLORS.len()].to_string()
                    }),
                    truck.capacity,
                )
            })
            .collect();

        let customers = self
            .customers
            .into_iter()
            .enumerate_idx::<CustomerIdx>()
            .map(|(id, customer): (CustomerIdx, CustomerInput)| {
                let mut builder = CustomerBuilder::default();
                builder
                    .set_name(customer.name)
                    .set_position(LatLng::new(customer.lat, customer.lng))
                    .set_demand(customer.demand)
                    .set_time_window(TimeWindow::new(customer.start_time, customer.end_time))
                    .set_service_time(customer.service_time);
                builder.build(id)
            })
            .collect();

        let mut builder = DispatchProblemBuilder::default();
        builder
            .set_trucks(trucks)
            .set_customers(customers)
            .set_depot(Depot::new(
                self.depot.name,
                LatLng::new(self.depot.lat, self.depot.lng),
            ))
            .set_constraints(self.constraints.into_constraint_set());

        if let (Some(distances), Some(travel_times)) = (self.distances, self.travel_times) {
            builder.set_matrices(TravelMatrices::new(distances, travel_times)?);
        }

        builder.build()
    }
}
