pub mod constraints;
pub mod error;
pub mod problem;
pub mod reoptimize;
pub mod session;
pub mod solution;
pub mod solver;
pub mod tree;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
