pub mod bunch;
pub mod cook;
pub mod learner;
pub mod plan;
pub mod recipe;
