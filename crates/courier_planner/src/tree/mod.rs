pub mod node_state;
pub mod solution_node;
pub mod solution_tree;
pub mod workspace;
