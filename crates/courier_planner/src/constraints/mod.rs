pub mod constraint_set;
pub mod generic_violations;
pub mod model_code;
pub mod user_violations;
pub mod violation;
