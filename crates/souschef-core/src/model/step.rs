//! Cooking step value type and its structural identity.
//!
//! A step's identity for learning purposes is derived from content, not
//! from a stored ID: two structurally equal steps are the same "kind" of
//! step even when they appear in different recipes. The hash over the
//! identity fields is explicit and versioned so the contract survives
//! compiler and std-library changes.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Format version of the identity encoding.
///
/// Bump this whenever the set of identity fields or their byte encoding
/// changes; old learned weights then no longer match and fall back to
/// nominal durations instead of silently pairing with the wrong step kind.
const IDENTITY_VERSION: u8 = 1;

/// A single cooking step.
///
/// Immutable after construction. `position` records where the step sits
/// inside its owning recipe and is assigned by [`Recipe::new`]; it is
/// placement metadata and takes no part in equality or identity.
///
/// [`Recipe::new`]: crate::model::Recipe::new
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    description: String,
    ingredients: Vec<String>,
    /// Author's nominal duration estimate.
    nominal: Duration,
    /// True when the step runs unattended (baking, boiling) and can
    /// overlap with the cook's attention on other steps.
    simultaneous: bool,
    #[serde(default)]
    position: usize,
}

impl Step {
    /// Create a new step at position 0.
    ///
    /// The owning recipe re-assigns the position at recipe construction.
    ///
    /// # Errors
    /// Returns an error if `description` is empty.
    pub fn new(
        description: impl Into<String>,
        ingredients: Vec<String>,
        nominal: Duration,
        simultaneous: bool,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self {
            description,
            ingredients,
            nominal,
            simultaneous,
            position: 0,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn nominal(&self) -> Duration {
        self.nominal
    }

    pub fn simultaneous(&self) -> bool {
        self.simultaneous
    }

    /// Index of this step within its owning recipe.
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Compute the versioned structural identity of this step.
    pub fn identity(&self) -> StepIdentity {
        let mut hasher = Sha256::new();
        hasher.update([IDENTITY_VERSION]);
        update_str(&mut hasher, &self.description);
        hasher.update((self.ingredients.len() as u64).to_le_bytes());
        for ingredient in &self.ingredients {
            update_str(&mut hasher, ingredient);
        }
        hasher.update(self.nominal.as_secs().to_le_bytes());
        hasher.update(self.nominal.subsec_nanos().to_le_bytes());
        hasher.update([self.simultaneous as u8]);
        StepIdentity(hex::encode(hasher.finalize()))
    }
}

/// Length-prefixed string encoding, so ["ab", "c"] and ["a", "bc"]
/// never hash alike.
fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

// Equality covers the identity fields only; position is placement
// metadata within one recipe.
impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.ingredients == other.ingredients
            && self.nominal == other.nominal
            && self.simultaneous == other.simultaneous
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
        self.ingredients.hash(state);
        self.nominal.hash(state);
        self.simultaneous.hash(state);
    }
}

/// Hex-encoded structural hash identifying a step kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepIdentity(String);

impl StepIdentity {
    /// Reconstruct an identity from its stored hex form.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
