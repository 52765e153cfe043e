//! Property tests for the step-interleaving scheduler.

use std::time::Duration;

use proptest::prelude::*;
use souschef_core::{Bunch, CookingSchedule, Recipe, Step};

fn build_bunch(shape: &[Vec<(bool, u16)>]) -> Bunch {
    let mut bunch = Bunch::new("prop bunch").unwrap();
    for (ri, steps) in shape.iter().enumerate() {
        let steps = steps
            .iter()
            .enumerate()
            .map(|(si, (simultaneous, minutes))| {
                Step::new(
                    format!("r{ri} s{si}"),
                    vec![],
                    Duration::from_secs(u64::from(*minutes) * 60),
                    *simultaneous,
                )
                .unwrap()
            })
            .collect();
        bunch.add_recipe(Recipe::new(format!("recipe {ri}"), "", steps).unwrap());
    }
    bunch
}

fn bunch_shape() -> impl Strategy<Value = Vec<Vec<(bool, u16)>>> {
    prop::collection::vec(
        prop::collection::vec((any::<bool>(), 1u16..120), 1..6),
        0..5,
    )
}

proptest! {
    #[test]
    fn schedule_length_equals_total_step_count(shape in bunch_shape()) {
        let bunch = build_bunch(&shape);
        let schedule = CookingSchedule::build(&bunch);
        prop_assert_eq!(schedule.step_count(), bunch.total_step_count());
    }

    #[test]
    fn per_recipe_order_is_preserved(shape in bunch_shape()) {
        let bunch = build_bunch(&shape);
        let schedule = CookingSchedule::build(&bunch);
        for recipe_index in 0..shape.len() {
            let local: Vec<usize> = schedule
                .entries()
                .iter()
                .filter(|e| e.recipe_index() == recipe_index)
                .map(|e| e.recipe_local_index())
                .collect();
            let expected: Vec<usize> = (0..shape[recipe_index].len()).collect();
            prop_assert_eq!(local, expected);
        }
    }

    #[test]
    fn walking_forward_then_back_visits_every_entry_once(shape in bunch_shape()) {
        let bunch = build_bunch(&shape);
        let mut schedule = CookingSchedule::build(&bunch);

        let forward: Vec<String> = std::iter::from_fn(|| {
            schedule.next_step().map(|s| s.description().to_string())
        })
        .collect();
        prop_assert_eq!(forward.len(), schedule.step_count());
        prop_assert!(schedule.next_step().is_none());

        let mut backward: Vec<String> = std::iter::from_fn(|| {
            schedule.previous_step().map(|s| s.description().to_string())
        })
        .collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
        prop_assert!(schedule.previous_step().is_none());
    }

    #[test]
    fn all_simultaneous_ready_steps_precede_the_first_drained_step(shape in bunch_shape()) {
        // A leading simultaneous step of any recipe must appear before
        // any attended step in the merged order.
        let bunch = build_bunch(&shape);
        let schedule = CookingSchedule::build(&bunch);
        let first_attended = schedule
            .entries()
            .iter()
            .position(|e| !e.step().simultaneous());
        if let Some(first_attended) = first_attended {
            for (recipe_index, steps) in shape.iter().enumerate() {
                if steps[0].0 {
                    let lead = schedule
                        .entries()
                        .iter()
                        .position(|e| {
                            e.recipe_index() == recipe_index && e.recipe_local_index() == 0
                        })
                        .unwrap();
                    prop_assert!(lead < first_attended);
                }
            }
        }
    }
}
