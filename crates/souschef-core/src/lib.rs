//! # Souschef Core Library
//!
//! Core business logic for Souschef, a cooking assistant that interleaves
//! the steps of several recipes into one session plan and learns, over
//! repeated use, how long each kind of step actually takes the cook.
//! All operations are available through a standalone CLI binary; any GUI
//! is expected to be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Model**: immutable `Step`/`Recipe` values and the mutable `Bunch`
//!   container of recipes cooked together
//! - **Scheduler**: merges a bunch into one ordered step sequence with a
//!   bidirectional cursor, front-loading unattended steps
//! - **Time Learner**: per-step-kind duration estimates blended from
//!   observed completion times, persisted through a storage seam
//! - **Estimator**: sequential duration baselines for comparison
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`CookingSchedule`]: the merged, navigable step sequence
//! - [`TimeLearner`]: adaptive duration estimates
//! - [`Database`]: learned weights, recipes, and bunches
//! - [`Config`]: application configuration

pub mod error;
pub mod estimator;
pub mod learner;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use learner::{DecayLaw, LearningWeight, MemoryWeightStore, TimeLearner, WeightStore};
pub use model::{Bunch, Recipe, Step, StepIdentity};
pub use scheduler::{CookingSchedule, ScheduleEntry};
pub use storage::{Config, Database};
