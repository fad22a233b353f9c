pub mod planner_config;
pub mod planner_session;
