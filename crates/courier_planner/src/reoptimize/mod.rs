pub mod local_reoptimizer;
pub mod reoptimize_outcome;
pub mod reoptimize_params;
