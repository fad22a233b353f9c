use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use courier_planner::{problem::dispatch_problem::DispatchProblem, problem::problem_input::ProblemInput};
use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("Cannot parse {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

pub fn read_problem(path: &Path) -> anyhow::Result<DispatchProblem> {
    let input: ProblemInput = read_json(path)?;
    Ok(input.build_problem()?)
}
