use serde::Serialize;

use crate::problem::{
    customer::CustomerIdx, dispatch_problem::ProblemError, truck::TruckIdx,
};

/// `from` must be served before `to`, on the same truck.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderConstraint {
    pub from: CustomerIdx,
    pub to: CustomerIdx,
}

/// `customer` must be served by `truck`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockedCustomer {
    pub customer: CustomerIdx,
    pub truck: TruckIdx,
}

/// `truck` must serve exactly `customers`, in this order, depot excluded.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockedTruck {
    pub truck: TruckIdx,
    pub customers: Vec<CustomerIdx>,
}

/// User imposed constraints. Adding a duplicate or removing a missing
/// constraint is a no-op.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    order: Vec<OrderConstraint>,
    locked_customers: Vec<LockedCustomer>,
    locked_trucks: Vec<LockedTruck>,
}

impl ConstraintSet {
    pub fn order_constraints(&self) -> &[OrderConstraint] {
        &self.order
    }

    pub fn locked_customers(&self) -> &[LockedCustomer] {
        &self.locked_customers
    }

    pub fn locked_trucks(&self) -> &[LockedTruck] {
        &self.locked_trucks
    }

    pub fn len(&self) -> usize {
        self.order.len() + self.locked_customers.len() + self.locked_trucks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `false` if the constraint already exists.
    pub fn add_order(&mut self, constraint: OrderConstraint) -> bool {
        if self.order.contains(&constraint) {
            return false;
        }
        self.order.push(constraint);
        true
    }

    /// Returns `false` if the constraint did not exist.
    pub fn remove_order(&mut self, constraint: &OrderConstraint) -> bool {
        match self.order.iter().position(|existing| existing == constraint) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_customer_locked(&self, constraint: &LockedCustomer) -> bool {
        self.locked_customers.contains(constraint)
    }

    pub fn lock_customer(&mut self, constraint: LockedCustomer) -> bool {
        if self.is_customer_locked(&constraint) {
            return false;
        }
        self.locked_customers.push(constraint);
        true
    }

    /// Adds the lock if absent, removes it otherwise. Returns whether the lock is now present.
    pub fn toggle_locked_customer(&mut self, constraint: LockedCustomer) -> bool {
        match self
            .locked_customers
            .iter()
            .position(|existing| *existing == constraint)
        {
            Some(index) => {
                self.locked_customers.remove(index);
                false
            }
            None => {
                self.locked_customers.push(constraint);
                true
            }
        }
    }

    /// Replaces any lock on `customer` by a lock to `truck`.
    pub fn pin_customer(&mut self, customer: CustomerIdx, truck: TruckIdx) {
        self.locked_customers
            .retain(|existing| existing.customer != customer);
        self.locked_customers
            .push(LockedCustomer { customer, truck });
    }

    pub fn locked_truck(&self, truck: TruckIdx) -> Option<&LockedTruck> {
        self.locked_trucks.iter().find(|locked| locked.truck == truck)
    }

    pub fn lock_truck(&mut self, constraint: LockedTruck) -> bool {
        if self.locked_truck(constraint.truck).is_some() {
            return false;
        }
        self.locked_trucks.push(constraint);
        true
    }

    /// Locks `truck` to `customers` if it is not locked yet, unlocks it otherwise.
    /// Returns whether the truck is now locked.
    pub fn toggle_locked_truck(&mut self, truck: TruckIdx, customers: Vec<CustomerIdx>) -> bool {
        match self
            .locked_trucks
            .iter()
            .position(|locked| locked.truck == truck)
        {
            Some(index) => {
                self.locked_trucks.remove(index);
                false
            }
            None => {
                self.locked_trucks.push(LockedTruck { truck, customers });
                true
            }
        }
    }

    pub(crate) fn validate(&self, customers: usize, trucks: usize) -> Result<(), ProblemError> {
        let check_customer = |customer: CustomerIdx| {
            if customer.get() >= customers {
                Err(ProblemError::UnknownCustomer(customer.get()))
            } else {
                Ok(())
            }
        };
        let check_truck = |truck: TruckIdx| {
            if truck.get() >= trucks {
                Err(ProblemError::UnknownTruck(truck.get()))
            } else {
                Ok(())
            }
        };

        for order in &self.order {
            check_customer(order.from)?;
            check_customer(order.to)?;
        }

        for locked in &self.locked_customers {
            check_customer(locked.customer)?;
            check_truck(locked.truck)?;
        }

        for locked in &self.locked_trucks {
            check_truck(locked.truck)?;
            for &customer in &locked.customers {
                check_customer(customer)?;
            }
        }

        Ok(())
    }
}
