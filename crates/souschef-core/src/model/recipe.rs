//! Recipe value type.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Step;

/// An ordered, non-empty list of steps under a title.
///
/// Immutable after construction. Step positions are re-assigned to match
/// the list order handed in, so a step's `position()` is always its index
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    title: String,
    #[serde(default)]
    author: String,
    steps: Vec<Step>,
}

impl Recipe {
    /// Create a new recipe.
    ///
    /// # Errors
    /// Returns an error if `title` is empty or `steps` is empty.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle { entity: "recipe" });
        }
        if steps.is_empty() {
            return Err(ValidationError::EmptySteps { title });
        }
        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.at_position(i))
            .collect();
        Ok(Self {
            title,
            author: author.into(),
            steps,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
