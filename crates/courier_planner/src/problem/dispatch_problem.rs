use courier_geometry::lat_lng::LatLng;
use thiserror::Error;

use crate::{
    constraints::constraint_set::ConstraintSet,
    problem::{
        customer::{Customer, CustomerIdx, Depot},
        travel_matrices::{Distance, Time, TravelMatrices},
        truck::{Capacity, Truck, TruckIdx},
        visit::Visit,
    },
};

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("Matrix {name} should be {expected}x{expected}, found a dimension of {actual}")]
    MatrixShape {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Matrix {name} has a non-zero diagonal at {index}")]
    NonZeroDiagonal { name: &'static str, index: usize },

    #[error("Unknown customer index {0}")]
    UnknownCustomer(usize),

    #[error("Unknown truck index {0}")]
    UnknownTruck(usize),

    #[error("Depot is missing")]
    MissingDepot,
}

/// Static description of a dispatch day. Immutable once built.
#[derive(Debug)]
pub struct DispatchProblem {
    trucks: Vec<Truck>,
    customers: Vec<Customer>,
    depot: Depot,
    matrices: TravelMatrices,
    constraints: ConstraintSet,
}

impl DispatchProblem {
    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn truck(&self, truck_id: TruckIdx) -> &Truck {
        &self.trucks[truck_id]
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, customer_id: CustomerIdx) -> &Customer {
        &self.customers[customer_id]
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    /// Constraints every solution of this problem must honor.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn has_truck(&self, truck_id: TruckIdx) -> bool {
        truck_id.get() < self.trucks.len()
    }

    pub fn has_customer(&self, customer_id: CustomerIdx) -> bool {
        customer_id.get() < self.customers.len()
    }

    #[inline]
    pub fn location_index(&self, visit: Visit) -> usize {
        match visit {
            Visit::Depot => self.customers.len(),
            Visit::Customer(customer_id) => customer_id.get(),
        }
    }

    #[inline]
    pub fn travel_distance(&self, from: Visit, to: Visit) -> Distance {
        self.matrices
            .travel_distance(self.location_index(from), self.location_index(to))
    }

    #[inline]
    pub fn travel_time(&self, from: Visit, to: Visit) -> Time {
        self.matrices
            .travel_time(self.location_index(from), self.location_index(to))
    }

    pub fn demand(&self, visit: Visit) -> Capacity {
        match visit {
            Visit::Depot => 0,
            Visit::Customer(customer_id) => self.customer(customer_id).demand(),
        }
    }

    pub fn service_time(&self, visit: Visit) -> Time {
        match visit {
            Visit::Depot => 0.0,
            Visit::Customer(customer_id) => self.customer(customer_id).service_time(),
        }
    }

    pub fn visit_name(&self, visit: Visit) -> &str {
        match visit {
            Visit::Depot => self.depot.name(),
            Visit::Customer(customer_id) => self.customer(customer_id).name(),
        }
    }

    pub fn position(&self, visit: Visit) -> LatLng {
        match visit {
            Visit::Depot => self.depot.position(),
            Visit::Customer(customer_id) => self.customer(customer_id).position(),
        }
    }

    /// Customer positions followed by the depot, in matrix order.
    pub fn locations(&self) -> Vec<LatLng> {
        self.customers
            .iter()
            .map(|customer| customer.position())
            .chain(std::iter::once(self.depot.position()))
            .collect()
    }
}

#[derive(Default)]
pub struct DispatchProblemBuilder {
    trucks: Option<Vec<Truck>>,
    customers: Option<Vec<Customer>>,
    depot: Option<Depot>,
    matrices: Option<TravelMatrices>,
    constraints: Option<ConstraintSet>,
}

impl DispatchProblemBuilder {
    pub fn set_trucks(&mut self, trucks: Vec<Truck>) -> &mut DispatchProblemBuilder {
        self.trucks = Some(trucks);
        self
    }

    pub fn set_customers(&mut self, customers: Vec<Customer>) -> &mut DispatchProblemBuilder {
        self.customers = Some(customers);
        self
    }

    pub fn set_depot(&mut self, depot: Depot) -> &mut DispatchProblemBuilder {
        self.depot = Some(depot);
        self
    }

    pub fn set_matrices(&mut self, matrices: TravelMatrices) -> &mut DispatchProblemBuilder {
        self.matrices = Some(matrices);
        self
    }

    pub fn set_constraints(&mut self, constraints: ConstraintSet) -> &mut DispatchProblemBuilder {
        self.constraints = Some(constraints);
        self
    }

    pub fn build(self) -> Result<DispatchProblem, ProblemError> {
        let trucks = self.trucks.unwrap_or_default();
        let customers = self.customers.unwrap_or_default();
        let depot = self.depot.ok_or(ProblemError::MissingDepot)?;
        let num_locations = customers.len() + 1;

        let matrices = match self.matrices {
            Some(matrices) => matrices,
            None => {
                let locations: Vec<LatLng> = customers
                    .iter()
                    .map(|customer| customer.position())
                    .chain(std::iter::once(depot.position()))
                    .collect();
                TravelMatrices::from_haversine(
                    &locations,
                    courier_geometry::straight_line::DEFAULT_SPEED_KMH,
                )
            }
        };

        if matrices.num_locations() != num_locations {
            return Err(ProblemError::MatrixShape {
                name: "distances",
                expected: num_locations,
                actual: matrices.num_locations(),
            });
        }

        let constraints = self.constraints.unwrap_or_default();
        constraints.validate(customers.len(), trucks.len())?;

        Ok(DispatchProblem {
            trucks,
            customers,
            depot,
            matrices,
            constraints,
        })
    }
}
