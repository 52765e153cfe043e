//! Step-interleaving scheduler.
//!
//! Merges the recipes of a bunch into one ordered, navigable sequence of
//! steps. Steps marked `simultaneous` (unattended: baking, boiling) are
//! front-loaded so they run while the cook works on attended steps;
//! attended steps keep their original per-recipe ordering. Bunch order is
//! the tie-break for every decision.
//!
//! ## Merge rule
//!
//! Alternate two phases over one read cursor per recipe until all cursors
//! are exhausted:
//!
//! 1. **Priming**: scan cursors in bunch order and extract each recipe's
//!    entire leading run of simultaneous steps; repeat full passes until
//!    one extracts nothing.
//! 2. **Drain**: the first recipe in bunch order with pending steps
//!    contributes exactly one (attended) step, then priming runs again --
//!    draining may have exposed a new unattended step behind it.

use serde::{Deserialize, Serialize};

use crate::model::{Bunch, Recipe, Step};

/// One slot in the merged order: a step plus its recipe attribution.
///
/// Derived data -- never persisted, rebuilt on every [`CookingSchedule::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    step: Step,
    /// Index of the owning recipe within the bunch snapshot.
    recipe_index: usize,
    /// Index of the step within its owning recipe.
    recipe_local_index: usize,
}

impl ScheduleEntry {
    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn recipe_index(&self) -> usize {
        self.recipe_index
    }

    pub fn recipe_local_index(&self) -> usize {
        self.recipe_local_index
    }
}

/// The merged, ordered step sequence for one cooking session.
///
/// Built once from a snapshot of the bunch; the entry sequence is
/// immutable for the lifetime of the schedule and does not observe later
/// changes to the bunch. The cursor is a pure bidirectional position,
/// not a destructive pop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingSchedule {
    recipes: Vec<Recipe>,
    entries: Vec<ScheduleEntry>,
    cursor: usize,
}

impl CookingSchedule {
    /// Merge the bunch's recipes into one ordered sequence.
    pub fn build(bunch: &Bunch) -> Self {
        let recipes: Vec<Recipe> = bunch.recipes().to_vec();
        let mut cursors = vec![0usize; recipes.len()];
        let mut entries = Vec::with_capacity(bunch.total_step_count());

        loop {
            // Priming: extract every currently-available leading run of
            // simultaneous steps, recipe by recipe, until a full pass
            // comes up empty.
            loop {
                let mut extracted = false;
                for (recipe_index, recipe) in recipes.iter().enumerate() {
                    let steps = recipe.steps();
                    while cursors[recipe_index] < steps.len()
                        && steps[cursors[recipe_index]].simultaneous()
                    {
                        entries.push(ScheduleEntry {
                            step: steps[cursors[recipe_index]].clone(),
                            recipe_index,
                            recipe_local_index: cursors[recipe_index],
                        });
                        cursors[recipe_index] += 1;
                        extracted = true;
                    }
                }
                if !extracted {
                    break;
                }
            }

            // Drain: one attended step from the first pending recipe.
            let pending = recipes
                .iter()
                .enumerate()
                .find(|(i, recipe)| cursors[*i] < recipe.step_count());
            match pending {
                Some((recipe_index, recipe)) => {
                    entries.push(ScheduleEntry {
                        step: recipe.steps()[cursors[recipe_index]].clone(),
                        recipe_index,
                        recipe_local_index: cursors[recipe_index],
                    });
                    cursors[recipe_index] += 1;
                }
                None => break,
            }
        }

        Self {
            recipes,
            entries,
            cursor: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Total number of entries, fixed after construction.
    pub fn step_count(&self) -> usize {
        self.entries.len()
    }

    /// The full merged order, for rendering.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Current cursor position (entries already returned by
    /// [`next_step`](Self::next_step)).
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Owning recipe of the first entry whose step structurally equals
    /// `step`.
    ///
    /// When the same step kind appears in more than one recipe the
    /// first-occurrence owner is returned; repeated queries agree for the
    /// lifetime of the schedule.
    pub fn recipe_for_step(&self, step: &Step) -> Option<&Recipe> {
        self.entries
            .iter()
            .find(|entry| entry.step == *step)
            .map(|entry| &self.recipes[entry.recipe_index])
    }

    /// Position of the first occurrence of `step` in the merged order.
    pub fn step_index(&self, step: &Step) -> Option<usize> {
        self.entries.iter().position(|entry| entry.step == *step)
    }

    // ── Traversal ────────────────────────────────────────────────────

    /// Return the entry at the cursor and advance.
    ///
    /// Keeps returning `None` once the cursor has passed the last entry.
    pub fn next_step(&mut self) -> Option<&Step> {
        if self.cursor >= self.entries.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        Some(&self.entries[index].step)
    }

    /// Move the cursor back one position and return that entry.
    ///
    /// Returns `None` at the start. A `next_step` after a rewind
    /// re-returns the same entry.
    pub fn previous_step(&mut self) -> Option<&Step> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor].step)
    }

    /// Rewind the cursor to the start for a fresh pass.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recipe;
    use std::time::Duration;

    fn step(description: &str, minutes: u64, simultaneous: bool) -> Step {
        Step::new(
            description,
            vec![],
            Duration::from_secs(minutes * 60),
            simultaneous,
        )
        .unwrap()
    }

    fn bunch_of(recipes: Vec<Recipe>) -> Bunch {
        let mut bunch = Bunch::new("Test session").unwrap();
        for recipe in recipes {
            bunch.add_recipe(recipe);
        }
        bunch
    }

    fn descriptions(schedule: &CookingSchedule) -> Vec<&str> {
        schedule
            .entries()
            .iter()
            .map(|e| e.step().description())
            .collect()
    }

    #[test]
    fn empty_bunch_yields_empty_schedule() {
        let bunch = Bunch::new("Nothing").unwrap();
        let mut schedule = CookingSchedule::build(&bunch);
        assert_eq!(schedule.step_count(), 0);
        assert!(schedule.next_step().is_none());
        assert!(schedule.previous_step().is_none());
    }

    #[test]
    fn count_matches_total_steps() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("a1", 5, false), step("a2", 7, true)]).unwrap(),
            Recipe::new("B", "", vec![step("b1", 10, true)]).unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        assert_eq!(schedule.step_count(), bunch.total_step_count());
    }

    #[test]
    fn no_simultaneous_steps_concatenates_in_bunch_order() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("five", 5, false), step("seven", 7, false)]).unwrap(),
            Recipe::new("B", "", vec![step("ten", 10, false), step("ten again", 10, false)])
                .unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        assert_eq!(
            descriptions(&schedule),
            vec!["five", "seven", "ten", "ten again"]
        );
    }

    #[test]
    fn leading_simultaneous_steps_are_front_loaded() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("nonsim-p", 5, false), step("nonsim-q", 5, false)])
                .unwrap(),
            Recipe::new("B", "", vec![step("sim-x", 30, true), step("sim-y", 20, true)]).unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        assert_eq!(
            descriptions(&schedule),
            vec!["sim-x", "sim-y", "nonsim-p", "nonsim-q"]
        );
    }

    #[test]
    fn draining_exposes_new_simultaneous_steps() {
        // After "prep" is drained, "bake" becomes that recipe's leading
        // step and is extracted before the other recipe continues.
        let bunch = bunch_of(vec![
            Recipe::new(
                "Cake",
                "",
                vec![step("prep", 10, false), step("bake", 45, true), step("ice", 10, false)],
            )
            .unwrap(),
            Recipe::new("Salad", "", vec![step("chop", 10, false), step("toss", 2, false)])
                .unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        assert_eq!(
            descriptions(&schedule),
            vec!["prep", "bake", "ice", "chop", "toss"]
        );
    }

    #[test]
    fn tie_break_follows_bunch_order_for_ready_simultaneous_runs() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("a-sim", 10, true), step("a-work", 5, false)]).unwrap(),
            Recipe::new("B", "", vec![step("b-sim-1", 20, true), step("b-sim-2", 15, true)])
                .unwrap(),
            Recipe::new("C", "", vec![step("c-work", 5, false)]).unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        assert_eq!(
            descriptions(&schedule),
            vec!["a-sim", "b-sim-1", "b-sim-2", "a-work", "c-work"]
        );
    }

    #[test]
    fn cursor_is_bidirectional_and_non_destructive() {
        let bunch = bunch_of(vec![Recipe::new(
            "A",
            "",
            vec![step("one", 1, false), step("two", 2, false), step("three", 3, false)],
        )
        .unwrap()]);
        let mut schedule = CookingSchedule::build(&bunch);

        schedule.next_step().unwrap();
        let second = schedule.next_step().unwrap().clone();
        let rewound = schedule.previous_step().unwrap().clone();
        assert_eq!(second, rewound);
        let replayed = schedule.next_step().unwrap().clone();
        assert_eq!(second, replayed);
    }

    #[test]
    fn previous_at_start_returns_none() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("only", 1, false)]).unwrap(),
        ]);
        let mut schedule = CookingSchedule::build(&bunch);
        assert!(schedule.previous_step().is_none());
        schedule.next_step().unwrap();
        schedule.previous_step().unwrap();
        assert!(schedule.previous_step().is_none());
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("one", 1, false), step("two", 2, false)]).unwrap(),
        ]);
        let mut schedule = CookingSchedule::build(&bunch);
        for _ in 0..schedule.step_count() {
            assert!(schedule.next_step().is_some());
        }
        for _ in 0..5 {
            assert!(schedule.next_step().is_none());
        }
    }

    #[test]
    fn reset_rewinds_for_a_fresh_pass() {
        let bunch = bunch_of(vec![Recipe::new(
            "A",
            "",
            vec![step("one", 1, false), step("two", 2, true), step("three", 3, false)],
        )
        .unwrap()]);
        let mut schedule = CookingSchedule::build(&bunch);

        let first: Vec<String> = std::iter::from_fn(|| {
            schedule.next_step().map(|s| s.description().to_string())
        })
        .collect();
        assert!(schedule.next_step().is_none());

        schedule.reset();
        assert_eq!(schedule.position(), 0);
        let second: Vec<String> = std::iter::from_fn(|| {
            schedule.next_step().map(|s| s.description().to_string())
        })
        .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn recipe_attribution_is_consistent() {
        let shared = step("boil water", 5, false);
        let bunch = bunch_of(vec![
            Recipe::new("Tea", "", vec![shared.clone(), step("steep", 3, false)]).unwrap(),
            Recipe::new("Pasta", "", vec![shared.clone(), step("cook pasta", 9, false)]).unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);

        let first = schedule.recipe_for_step(&shared).unwrap().title().to_string();
        for _ in 0..3 {
            assert_eq!(schedule.recipe_for_step(&shared).unwrap().title(), first);
        }
        assert_eq!(schedule.step_index(&shared), Some(0));
        assert_eq!(schedule.step_index(&step("missing", 1, false)), None);
    }

    #[test]
    fn schedule_does_not_observe_later_bunch_edits() {
        let mut bunch = bunch_of(vec![
            Recipe::new("A", "", vec![step("a1", 1, false)]).unwrap(),
        ]);
        let schedule = CookingSchedule::build(&bunch);
        bunch.add_recipe(Recipe::new("B", "", vec![step("b1", 1, false)]).unwrap());
        assert_eq!(schedule.step_count(), 1);
    }
}
