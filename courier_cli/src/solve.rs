use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Args;
use courier_planner::tree::node_state::NodeState;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{backends, file_utils, parsers, report};

#[derive(Args)]
pub struct SolveArgs {
    /// Problem description (JSON)
    #[arg(short, long)]
    problem: PathBuf,

    /// Optimization model sent to the solver
    #[arg(short, long)]
    model: PathBuf,

    /// Solver timeout (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Write the solution to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SolveArgs) -> anyhow::Result<()> {
    let problem = file_utils::read_problem(&args.problem)?;
    let model = fs::read_to_string(&args.model)
        .with_context(|| format!("Cannot read {}", args.model.display()))?;

    let session = backends::create_session(problem, model, args.timeout)?;
    let root = session.create_root();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    spinner.set_message("Solving");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let state = session.solve(root).await;
    spinner.finish_and_clear();
    let state = state?;

    info!("Solver finished: {}", state);
    session.snapshot(root, report::print_node)?;

    if let Some(path) = &args.output {
        if state != NodeState::Satisfied {
            anyhow::bail!("No solution to write, solver ended {}", state);
        }
        session.snapshot(root, |node| file_utils::write_json(path, node.solution()))??;
    }

    Ok(())
}
