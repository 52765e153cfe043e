//! Adaptive per-cook duration learning.
//!
//! Maps a step's structural identity to a learned duration, updated from
//! observed completion times. The learner is an explicitly constructed
//! component handed to whoever needs it -- there is no global accessor.
//!
//! ## Update rule
//!
//! First observation of a step kind creates its row with
//! `weighted = observed` and `learn_rate = 1.0`. Every later observation
//! blends `new = rate * observed + (1 - rate) * old`. Under the default
//! harmonic decay the rate after `n` incorporated observations is
//! `1 / (n + 1)`, which makes the learned value the running mean of all
//! observations while giving later ones progressively more inertia.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::{CoreError, Result, StorageError};
use crate::model::{Step, StepIdentity};

/// How the blending factor changes as observations accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecayLaw {
    /// `learn_rate = 1 / (samples + 1)`: learned value is the running
    /// mean of all observations.
    #[default]
    Harmonic,
    /// Keep the initial rate forever.
    Constant,
}

/// One learned-duration row, keyed by step identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningWeight {
    pub identity: StepIdentity,
    /// Current learned duration estimate.
    pub weighted: Duration,
    /// Blending factor applied to the next observation.
    pub learn_rate: f64,
    /// Observations incorporated so far.
    pub samples: u64,
    /// When the last observation was incorporated.
    pub updated_at: DateTime<Utc>,
}

impl LearningWeight {
    /// Row for the first observed completion of a step kind.
    fn first(identity: StepIdentity, observed: Duration, initial_rate: f64) -> Self {
        Self {
            identity,
            weighted: observed,
            learn_rate: initial_rate,
            samples: 0,
            updated_at: Utc::now(),
        }
    }

    /// Blend one observation into the row and decay the rate.
    fn incorporate(&mut self, observed: Duration, decay: DecayLaw) {
        let rate = self.learn_rate.clamp(0.0, 1.0);
        let blended =
            rate * observed.as_secs_f64() + (1.0 - rate) * self.weighted.as_secs_f64();
        self.weighted = Duration::from_secs_f64(blended.max(0.0));
        self.samples += 1;
        self.updated_at = Utc::now();
        if decay == DecayLaw::Harmonic {
            self.learn_rate = 1.0 / (self.samples as f64 + 1.0);
        }
    }
}

/// Storage collaborator seam for learned weights.
///
/// Implemented by the SQLite [`Database`] and by [`MemoryWeightStore`].
/// Failures are surfaced as [`StorageError`] and propagated unchanged.
///
/// [`Database`]: crate::storage::Database
pub trait WeightStore {
    fn load(&self, identity: &StepIdentity) -> Result<Option<LearningWeight>, StorageError>;
    fn save(&mut self, weight: &LearningWeight) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory weight store.
#[derive(Debug, Default)]
pub struct MemoryWeightStore {
    rows: HashMap<StepIdentity, LearningWeight>,
}

impl MemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeightStore for MemoryWeightStore {
    fn load(&self, identity: &StepIdentity) -> Result<Option<LearningWeight>, StorageError> {
        Ok(self.rows.get(identity).cloned())
    }

    fn save(&mut self, weight: &LearningWeight) -> Result<(), StorageError> {
        self.rows.insert(weight.identity.clone(), weight.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.rows.clear();
        Ok(())
    }
}

/// Adaptive time learner over a weight store.
///
/// The mutex serializes read-modify-write of a step's row per storage
/// handle, so a background timer and the UI thread reporting the same
/// completion cannot race and drop an update. Clones share the store.
#[derive(Debug)]
pub struct TimeLearner<S: WeightStore> {
    store: Arc<Mutex<S>>,
    decay: DecayLaw,
    initial_rate: f64,
}

impl<S: WeightStore> Clone for TimeLearner<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            decay: self.decay,
            initial_rate: self.initial_rate,
        }
    }
}

impl<S: WeightStore> TimeLearner<S> {
    /// Create a learner with harmonic decay and full trust in the first
    /// observation.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, DecayLaw::Harmonic, 1.0)
    }

    /// Create a learner with an explicit decay law and initial rate.
    pub fn with_settings(store: S, decay: DecayLaw, initial_rate: f64) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            decay,
            initial_rate: initial_rate.clamp(0.0, 1.0),
        }
    }

    /// Best current duration estimate for `step`.
    ///
    /// Returns the learned weighted duration when a row exists, otherwise
    /// the step's nominal duration unchanged.
    pub fn get_estimated_time(&self, step: &Step) -> Result<Duration> {
        let store = self.lock();
        match store.load(&step.identity())? {
            Some(weight) => Ok(weight.weighted),
            None => Ok(step.nominal()),
        }
    }

    /// Current row for `step`, if any observation has been recorded.
    pub fn weight_for(&self, step: &Step) -> Result<Option<LearningWeight>> {
        Ok(self.lock().load(&step.identity())?)
    }

    /// Record an observed completion time for `step`.
    ///
    /// Atomic per step identity: the store lock is held across the
    /// read-modify-write. A failed save propagates the storage error and
    /// leaves the previously learned value queryable.
    pub fn learn_step(&self, step: &Step, observed: Duration) -> Result<LearningWeight> {
        let mut store = self.lock();
        let identity = step.identity();
        let mut weight = match store.load(&identity)? {
            Some(existing) => existing,
            None => LearningWeight::first(identity, observed, self.initial_rate),
        };
        weight.incorporate(observed, self.decay);
        store.save(&weight)?;
        Ok(weight)
    }

    /// Delete all learned rows, reverting every step to its nominal
    /// duration.
    pub fn clear_learner(&self) -> Result<()> {
        Ok(self.lock().clear()?)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, S> {
        // A panic while holding the lock leaves the store itself intact
        // (every update either saved or didn't), so recover the guard.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: WeightStore + Send + 'static> TimeLearner<S> {
    /// Fire-and-forget completion report.
    ///
    /// Submits the blend to the blocking pool and returns immediately;
    /// the receiver resolves with the saved row or the storage error.
    /// Dropping the receiver is allowed -- the update still runs.
    pub fn learn_step_detached(
        &self,
        step: Step,
        observed: Duration,
    ) -> oneshot::Receiver<Result<LearningWeight, CoreError>> {
        let (tx, rx) = oneshot::channel();
        let learner = self.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(learner.learn_step(&step, observed));
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(description: &str, nominal_secs: u64) -> Step {
        Step::new(description, vec![], Duration::from_secs(nominal_secs), false).unwrap()
    }

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn unlearned_step_returns_nominal() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let s = step("Knead dough", 600);
        assert_eq!(learner.get_estimated_time(&s).unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn first_observation_is_adopted_fully() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let s = step("Knead dough", 600);
        learner.learn_step(&s, minutes(14)).unwrap();
        assert_eq!(learner.get_estimated_time(&s).unwrap(), minutes(14));
    }

    #[test]
    fn harmonic_decay_tracks_running_mean() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let s = step("Knead dough", 600);
        learner.learn_step(&s, minutes(10)).unwrap();
        learner.learn_step(&s, minutes(20)).unwrap();
        let after_two = learner.get_estimated_time(&s).unwrap();
        assert_eq!(after_two, minutes(15));

        learner.learn_step(&s, minutes(30)).unwrap();
        let after_three = learner.get_estimated_time(&s).unwrap();
        assert!((after_three.as_secs_f64() - minutes(20).as_secs_f64()).abs() < 1e-6);
    }

    #[test]
    fn constant_decay_keeps_initial_rate() {
        let learner =
            TimeLearner::with_settings(MemoryWeightStore::new(), DecayLaw::Constant, 0.5);
        let s = step("Knead dough", 600);
        // First observation always seeds the row at the observed value.
        learner.learn_step(&s, minutes(10)).unwrap();
        learner.learn_step(&s, minutes(20)).unwrap();
        assert_eq!(learner.get_estimated_time(&s).unwrap(), minutes(15));
        learner.learn_step(&s, minutes(25)).unwrap();
        assert_eq!(learner.get_estimated_time(&s).unwrap(), minutes(20));
    }

    #[test]
    fn clear_reverts_to_nominal() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let s = step("Knead dough", 600);
        learner.learn_step(&s, minutes(25)).unwrap();
        learner.clear_learner().unwrap();
        assert_eq!(learner.get_estimated_time(&s).unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn same_kind_across_recipes_shares_a_row() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let a = step("Boil water", 300);
        let b = step("Boil water", 300);
        learner.learn_step(&a, minutes(4)).unwrap();
        assert_eq!(learner.get_estimated_time(&b).unwrap(), minutes(4));
    }

    /// Store whose saves fail after a configurable number of successes.
    struct FlakyStore {
        inner: MemoryWeightStore,
        saves_left: usize,
    }

    impl WeightStore for FlakyStore {
        fn load(&self, identity: &StepIdentity) -> Result<Option<LearningWeight>, StorageError> {
            self.inner.load(identity)
        }

        fn save(&mut self, weight: &LearningWeight) -> Result<(), StorageError> {
            if self.saves_left == 0 {
                return Err(StorageError::QueryFailed("disk full".into()));
            }
            self.saves_left -= 1;
            self.inner.save(weight)
        }

        fn clear(&mut self) -> Result<(), StorageError> {
            self.inner.clear()
        }
    }

    #[test]
    fn failed_save_preserves_previous_estimate() {
        let store = FlakyStore {
            inner: MemoryWeightStore::new(),
            saves_left: 1,
        };
        let learner = TimeLearner::new(store);
        let s = step("Roast", 1800);
        learner.learn_step(&s, minutes(40)).unwrap();

        let err = learner.learn_step(&s, minutes(90)).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        // The rejected observation must not leak into the estimate.
        assert_eq!(learner.get_estimated_time(&s).unwrap(), minutes(40));
    }

    #[tokio::test]
    async fn detached_learning_resolves() {
        let learner = TimeLearner::new(MemoryWeightStore::new());
        let s = step("Simmer", 1200);
        let rx = learner.learn_step_detached(s.clone(), minutes(18));
        let weight = rx.await.unwrap().unwrap();
        assert_eq!(weight.weighted, minutes(18));
        assert_eq!(learner.get_estimated_time(&s).unwrap(), minutes(18));
    }
}
