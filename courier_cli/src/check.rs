use std::path::PathBuf;

use clap::Args;
use courier_planner::solver::raw_assignment::RawAssignment;
use tracing::info;

use crate::{backends, file_utils, report};

#[derive(Args)]
pub struct CheckArgs {
    /// Problem description (JSON)
    #[arg(short, long)]
    problem: PathBuf,

    /// Solver assignment to check (JSON)
    #[arg(short, long)]
    solution: PathBuf,

    /// Fail when the solution has violations
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let problem = file_utils::read_problem(&args.problem)?;
    let raw: RawAssignment = file_utils::read_json(&args.solution)?;
    info!(
        "Checking {:?} against {} customers and {} trucks",
        args.solution,
        problem.customers().len(),
        problem.trucks().len()
    );

    let session = backends::create_session(problem, String::new(), None)?;
    let root = session.import_solution(&raw).await?;

    let violations = session.snapshot(root, |node| {
        report::print_node(node);
        node.violations().len()
    })?;

    if args.strict && violations > 0 {
        anyhow::bail!("{} violation(s) found", violations);
    }

    Ok(())
}
