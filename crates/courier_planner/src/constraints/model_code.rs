use crate::constraints::constraint_set::ConstraintSet;

/// Renders user constraints as named model constraints, one per line.
///
/// Customers and trucks are numbered from 1 in the model.
pub fn constraints_to_model(constraints: &ConstraintSet) -> String {
    let mut lines = Vec::with_capacity(constraints.len());

    for order in constraints.order_constraints() {
        let from = order.from.get() + 1;
        let to = order.to.get() + 1;
        lines.push(format!(
            "constraint :: \"{from} served before {to}\" vehicleOf[{from}] == vehicleOf[{to}] /\\ startOfService[{from}] + serviceTime[{from}] <= arrivalTime[{to}];"
        ));
    }

    for locked in constraints.locked_customers() {
        let customer = locked.customer.get() + 1;
        let truck = locked.truck.get() + 1;
        lines.push(format!(
            "constraint :: \"{customer} served by {truck}\" vehicleOf[{customer}] == {truck};"
        ));
    }

    for locked in constraints.locked_trucks() {
        if locked.customers.is_empty() {
            continue;
        }

        let truck = locked.truck.get() + 1;
        let sequence = locked
            .customers
            .iter()
            .map(|customer| (customer.get() + 1).to_string())
            .collect::<Vec<_>>()
            .join("->");
        let conjunction = locked
            .customers
            .iter()
            .map(|customer| format!("vehicleOf[{}] == {truck}", customer.get() + 1))
            .collect::<Vec<_>>()
            .join(" /\\ ");
        lines.push(format!(
            "constraint :: \"{truck} serves {sequence}\" {conjunction};"
        ));
    }

    lines.join("\n")
}

/// Base model followed by the problem's constraints and the node's own.
pub fn full_model(base: &str, problem: &ConstraintSet, node: &ConstraintSet) -> String {
    format!(
        "{base}\n\n{}\n\n{}",
        constraints_to_model(problem),
        constraints_to_model(node)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraints::constraint_set::{LockedCustomer, OrderConstraint},
        problem::{customer::CustomerIdx, truck::TruckIdx},
    };

    #[test]
    fn test_constraints_to_model() {
        let mut constraints = ConstraintSet::default();
        constraints.add_order(OrderConstraint {
            from: CustomerIdx::new(0),
            to: CustomerIdx::new(2),
        });
        constraints.lock_customer(LockedCustomer {
            customer: CustomerIdx::new(1),
            truck: TruckIdx::new(1),
        });
        constraints.toggle_locked_truck(
            TruckIdx::new(0),
            vec![CustomerIdx::new(3), CustomerIdx::new(4)],
        );

        let model = constraints_to_model(&constraints);
        let lines: Vec<&str> = model.lines().collect();

        assert_eq!(
            lines,
            vec![
                "constraint :: \"1 served before 3\" vehicleOf[1] == vehicleOf[3] /\\ startOfService[1] + serviceTime[1] <= arrivalTime[3];",
                "constraint :: \"2 served by 2\" vehicleOf[2] == 2;",
                "constraint :: \"1 serves 4->5\" vehicleOf[4] == 1 /\\ vehicleOf[5] == 1;",
            ]
        );
    }

    #[test]
    fn test_empty_constraints_render_nothing() {
        assert_eq!(constraints_to_model(&ConstraintSet::default()), "");
        assert_eq!(
            full_model("solve minimize objective;", &ConstraintSet::default(), &ConstraintSet::default()),
            "solve minimize objective;\n\n\n\n"
        );
    }
}
