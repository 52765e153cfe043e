//! Non-interleaved duration baselines for a bunch.
//!
//! `original_time` is the "do everything sequentially at the author's
//! estimates" total; the interleaved schedule is meant to be compared
//! against it when reporting.

use std::time::Duration;

use crate::error::Result;
use crate::learner::{TimeLearner, WeightStore};
use crate::model::Bunch;

/// Sum of every step's nominal duration, ignoring `simultaneous`.
///
/// An empty bunch sums to zero.
pub fn original_time(bunch: &Bunch) -> Duration {
    bunch
        .recipes()
        .iter()
        .flat_map(|recipe| recipe.steps())
        .map(|step| step.nominal())
        .sum()
}

/// Sequential total with each step sized by the learner's current
/// estimate (nominal when unlearned).
pub fn learned_time<S: WeightStore>(bunch: &Bunch, learner: &TimeLearner<S>) -> Result<Duration> {
    let mut total = Duration::ZERO;
    for recipe in bunch.recipes() {
        for step in recipe.steps() {
            total += learner.get_estimated_time(step)?;
        }
    }
    Ok(total)
}
