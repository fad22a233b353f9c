pub mod customer;
pub mod dispatch_problem;
pub mod problem_input;
pub mod time_window;
pub mod travel_matrices;
pub mod truck;
pub mod visit;
