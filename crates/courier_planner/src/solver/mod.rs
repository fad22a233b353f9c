pub mod raw_assignment;
pub mod rest_solver_client;
pub mod solve_params;
pub mod solver_backend;
