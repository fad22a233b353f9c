use comfy_table::Table;
use courier_planner::{
    problem::{dispatch_problem::DispatchProblem, truck::TruckIdx},
    reoptimize::reoptimize_outcome::ReoptimizeOutcome,
    tree::solution_node::SolutionNode,
};

fn routes_table(node: &SolutionNode) -> Table {
    let problem = node.problem();
    let mut table = Table::new();
    table.set_header(vec!["Truck", "Stops", "Load", "Distance", "Finish"]);

    for route in node.solution().routes() {
        let truck = problem.truck(route.truck());
        let stops = route
            .stops()
            .iter()
            .map(|stop| problem.visit_name(stop.visit()))
            .collect::<Vec<_>>()
            .join(" > ");

        table.add_row(vec![
            truck.name().to_string(),
            stops,
            format!("{}/{}", route.used_capacity(), truck.capacity()),
            format!("{:.1}", route.total_distance()),
            format!("{:.1}", route.finish_time()),
        ]);
    }

    table
}

fn describe_outcome(outcome: &ReoptimizeOutcome) -> String {
    match outcome {
        ReoptimizeOutcome::Optimized {
            total_distance,
            permutations,
            exhaustive,
        } => format!(
            "optimized to {:.1} after {} orderings{}",
            total_distance,
            permutations,
            if *exhaustive { "" } else { " (stopped early)" }
        ),
        ReoptimizeOutcome::Infeasible { permutations } => {
            format!("no feasible ordering among {}", permutations)
        }
        ReoptimizeOutcome::CapacityExceeded { used, capacity } => {
            format!("capacity exceeded ({}/{})", used, capacity)
        }
        ReoptimizeOutcome::LimitReached { permutations } => {
            format!("limit reached after {} orderings", permutations)
        }
    }
}

pub fn print_outcomes(problem: &DispatchProblem, outcomes: &[(TruckIdx, ReoptimizeOutcome)]) {
    let mut table = Table::new();
    table.set_header(vec!["Truck", "Re-optimization"]);
    for (truck, outcome) in outcomes {
        table.add_row(vec![
            problem.truck(*truck).name().to_string(),
            describe_outcome(outcome),
        ]);
    }
    println!("{table}");
}

pub fn print_node(node: &SolutionNode) {
    println!(
        "{} [{}] distance {:.1}, finish {:.1}, {} custom constraint(s)",
        node.name(),
        node.state(),
        node.distance(),
        node.finish_time(),
        node.count_custom_constraints()
    );
    println!("{}", routes_table(node));

    if node.is_valid() {
        println!("No violations");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Violation"]);
    for violation in node.violations() {
        table.add_row(vec![violation.to_string()]);
    }
    println!("{table}");
}
