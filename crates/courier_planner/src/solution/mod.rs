pub mod geometry;
pub mod parser;
pub mod served_stop;
pub mod solution;
pub mod truck_route;
