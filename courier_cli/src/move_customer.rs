use std::path::PathBuf;

use clap::Args;
use courier_planner::{
    problem::{customer::CustomerIdx, truck::TruckIdx, visit::Visit},
    solver::raw_assignment::RawAssignment,
};
use tracing::info;

use crate::{backends, file_utils, parsers, report};

#[derive(Args)]
pub struct MoveArgs {
    /// Problem description (JSON)
    #[arg(short, long)]
    problem: PathBuf,

    /// Solver assignment to edit (JSON)
    #[arg(short, long)]
    solution: PathBuf,

    /// Customer to move, numbered from 1
    #[arg(short, long, value_parser = parsers::parse_number)]
    customer: usize,

    /// Truck receiving the customer at the end of its route, numbered from 1
    #[arg(short, long, value_parser = parsers::parse_number, conflicts_with = "before")]
    truck: Option<usize>,

    /// Customer to insert in front of, numbered from 1
    #[arg(short, long, value_parser = parsers::parse_number)]
    before: Option<usize>,

    /// Write the edited solution to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: MoveArgs) -> anyhow::Result<()> {
    let problem = file_utils::read_problem(&args.problem)?;
    let raw: RawAssignment = file_utils::read_json(&args.solution)?;

    let customer = CustomerIdx::new(args.customer);
    if !problem.has_customer(customer) {
        anyhow::bail!("Unknown customer {}", args.customer + 1);
    }
    let visit = Visit::Customer(customer);

    let session = backends::create_session(problem, String::new(), None)?;
    let root = session.import_solution(&raw).await?;

    let plan = match (args.truck, args.before) {
        (Some(truck), _) => {
            let truck = TruckIdx::new(truck);
            if !session.problem().has_truck(truck) {
                anyhow::bail!("Unknown truck {}", truck.get() + 1);
            }
            session.move_customer(root, truck, visit)?
        }
        (None, Some(before)) => {
            let before = CustomerIdx::new(before);
            if !session.problem().has_customer(before) {
                anyhow::bail!("Unknown customer {}", before.get() + 1);
            }
            session.move_customer_before(root, visit, Visit::Customer(before))?
        }
        (None, None) => anyhow::bail!("Either --truck or --before is required"),
    };

    let Some(plan) = plan else {
        info!("Nothing to move");
        return Ok(());
    };

    let report = session.settle_move(plan).await?;
    report::print_outcomes(session.problem(), &report.outcomes);

    session.snapshot(report.node, |node| {
        report::print_node(node);
        match &args.output {
            Some(path) => file_utils::write_json(path, node.solution()),
            None => Ok(()),
        }
    })??;

    Ok(())
}
