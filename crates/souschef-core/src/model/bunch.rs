//! Bunch: a named, ordered collection of recipes cooked in one session.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Recipe;

/// Mutable container of recipes.
///
/// Recipe order is significant: it is the tie-break order the scheduler
/// uses for every interleaving decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bunch {
    title: String,
    recipes: Vec<Recipe>,
}

impl Bunch {
    /// Create an empty bunch.
    ///
    /// # Errors
    /// Returns an error if `title` is empty.
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle { entity: "bunch" });
        }
        Ok(Self {
            title,
            recipes: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the bunch.
    ///
    /// # Errors
    /// Returns an error if the new title is empty; the old title stays.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle { entity: "bunch" });
        }
        self.title = title;
        Ok(())
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Append a recipe at the end of the tie-break order.
    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Remove and return the recipe at `index`.
    ///
    /// # Errors
    /// Returns an error if `index` is out of bounds.
    pub fn remove_recipe(&mut self, index: usize) -> Result<Recipe, ValidationError> {
        if index >= self.recipes.len() {
            return Err(ValidationError::OutOfBounds {
                bunch: self.title.clone(),
                index,
                len: self.recipes.len(),
            });
        }
        Ok(self.recipes.remove(index))
    }

    /// Total number of steps across all recipes.
    pub fn total_step_count(&self) -> usize {
        self.recipes.iter().map(|r| r.step_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use std::time::Duration;

    fn recipe(title: &str, step_count: usize) -> Recipe {
        let steps = (0..step_count)
            .map(|i| {
                Step::new(format!("{title} step {i}"), vec![], Duration::from_secs(60), false)
                    .unwrap()
            })
            .collect();
        Recipe::new(title, "", steps).unwrap()
    }

    #[test]
    fn empty_title_rejected() {
        assert!(Bunch::new("   ").is_err());
    }

    #[test]
    fn rename_to_empty_rejected() {
        let mut bunch = Bunch::new("Sunday dinner").unwrap();
        assert!(bunch.set_title("").is_err());
        assert_eq!(bunch.title(), "Sunday dinner");
    }

    #[test]
    fn add_and_remove_preserve_order() {
        let mut bunch = Bunch::new("Sunday dinner").unwrap();
        bunch.add_recipe(recipe("Soup", 2));
        bunch.add_recipe(recipe("Bread", 3));
        bunch.add_recipe(recipe("Pie", 1));
        assert_eq!(bunch.total_step_count(), 6);

        let removed = bunch.remove_recipe(1).unwrap();
        assert_eq!(removed.title(), "Bread");
        let titles: Vec<&str> = bunch.recipes().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Soup", "Pie"]);
    }

    #[test]
    fn remove_out_of_bounds() {
        let mut bunch = Bunch::new("Sunday dinner").unwrap();
        assert!(matches!(
            bunch.remove_recipe(0).unwrap_err(),
            ValidationError::OutOfBounds { .. }
        ));
    }
}
