//! Value entities describing what is being cooked.

mod bunch;
mod recipe;
mod step;

pub use bunch::Bunch;
pub use recipe::Recipe;
pub use step::{Step, StepIdentity};
