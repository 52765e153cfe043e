//! SQLite-based storage for learned weights, recipes, and bunches.
//!
//! The learned-weight table is the learner's persistence collaborator
//! (the [`WeightStore`] impl). Recipe and bunch load-store exists to hand
//! bunches to the scheduler and CLI; validation beyond the model
//! constructors is out of scope.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::error::{CoreError, Result, StorageError};
use crate::learner::{LearningWeight, WeightStore};
use crate::model::{Bunch, Recipe, Step, StepIdentity};

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `data_dir()/souschef.db`, creating the file
    /// and schema as needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("souschef.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(StorageError::from(e)))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), CoreError> {
        // bunch_members cascades off bunches; SQLite keeps enforcement
        // off unless asked.
        self.conn
            .pragma_update(None, "foreign_keys", "ON")
            .map_err(StorageError::from)?;
        migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ── Learning weights ─────────────────────────────────────────────

    /// All learned rows, ordered by identity (inspection surface).
    pub fn list_weights(&self) -> Result<Vec<LearningWeight>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT identity, weighted_secs, learn_rate, samples, updated_at
             FROM learning_weights ORDER BY identity",
        )?;
        let rows = stmt.query_map([], row_to_weight)?;
        let mut weights = Vec::new();
        for row in rows {
            weights.push(row?);
        }
        Ok(weights)
    }

    // ── Recipes ──────────────────────────────────────────────────────

    /// Insert or replace a recipe by title.
    pub fn save_recipe(&self, recipe: &Recipe) -> Result<(), StorageError> {
        let steps_json = serde_json::to_string(recipe.steps())
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM recipes WHERE title = ?1",
                params![recipe.title()],
                |row| row.get(0),
            )
            .optional()?;
        let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.conn.execute(
            "INSERT OR REPLACE INTO recipes (id, title, author, steps_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, recipe.title(), recipe.author(), steps_json],
        )?;
        Ok(())
    }

    /// Load a recipe by title.
    pub fn load_recipe(&self, title: &str) -> Result<Option<Recipe>, StorageError> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT title, author, steps_json FROM recipes WHERE title = ?1",
                params![title],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        row.map(|(title, author, steps_json)| decode_recipe(&title, &author, &steps_json))
            .transpose()
    }

    /// All stored recipes, ordered by title.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, author, steps_json FROM recipes ORDER BY title")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut recipes = Vec::new();
        for row in rows {
            let (title, author, steps_json) = row?;
            recipes.push(decode_recipe(&title, &author, &steps_json)?);
        }
        Ok(recipes)
    }

    /// Delete a recipe by title. Returns true if a row was removed.
    pub fn delete_recipe(&self, title: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM recipes WHERE title = ?1", params![title])?;
        Ok(deleted > 0)
    }

    // ── Bunches ──────────────────────────────────────────────────────

    /// Insert or replace a bunch and its member list.
    ///
    /// Member recipes are upserted first so the bunch always references
    /// stored rows.
    pub fn save_bunch(&self, bunch: &Bunch) -> Result<(), StorageError> {
        for recipe in bunch.recipes() {
            self.save_recipe(recipe)?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM bunches WHERE title = ?1",
                params![bunch.title()],
                |row| row.get(0),
            )
            .optional()?;
        let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
        tx.execute(
            "INSERT OR REPLACE INTO bunches (id, title) VALUES (?1, ?2)",
            params![id, bunch.title()],
        )?;
        tx.execute(
            "DELETE FROM bunch_members WHERE bunch_id = ?1",
            params![id],
        )?;
        for (position, recipe) in bunch.recipes().iter().enumerate() {
            tx.execute(
                "INSERT INTO bunch_members (bunch_id, position, recipe_id)
                 SELECT ?1, ?2, id FROM recipes WHERE title = ?3",
                params![id, position as i64, recipe.title()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load a bunch and its recipes, in stored member order.
    pub fn load_bunch(&self, title: &str) -> Result<Option<Bunch>, StorageError> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM bunches WHERE title = ?1",
                params![title],
                |row| row.get(0),
            )
            .optional()?;
        let Some(id) = id else {
            return Ok(None);
        };

        let mut bunch = Bunch::new(title).map_err(|e| StorageError::CorruptRow {
            table: "bunches".into(),
            message: e.to_string(),
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT r.title, r.author, r.steps_json
             FROM bunch_members m JOIN recipes r ON r.id = m.recipe_id
             WHERE m.bunch_id = ?1
             ORDER BY m.position",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (title, author, steps_json) = row?;
            bunch.add_recipe(decode_recipe(&title, &author, &steps_json)?);
        }
        Ok(Some(bunch))
    }

    /// Titles of all stored bunches.
    pub fn list_bunches(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT title FROM bunches ORDER BY title")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut titles = Vec::new();
        for row in rows {
            titles.push(row?);
        }
        Ok(titles)
    }

    /// Delete a bunch (members cascade). Returns true if a row was
    /// removed.
    pub fn delete_bunch(&self, title: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM bunches WHERE title = ?1", params![title])?;
        Ok(deleted > 0)
    }
}

impl WeightStore for Database {
    fn load(&self, identity: &StepIdentity) -> Result<Option<LearningWeight>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT identity, weighted_secs, learn_rate, samples, updated_at
                 FROM learning_weights WHERE identity = ?1",
                params![identity.as_str()],
                row_to_weight,
            )
            .optional()?;
        Ok(row)
    }

    fn save(&mut self, weight: &LearningWeight) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO learning_weights
                 (identity, weighted_secs, learn_rate, samples, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                weight.identity.as_str(),
                weight.weighted.as_secs_f64(),
                weight.learn_rate,
                weight.samples as i64,
                weight.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM learning_weights", [])?;
        Ok(())
    }
}

fn row_to_weight(row: &rusqlite::Row) -> Result<LearningWeight, rusqlite::Error> {
    let identity: String = row.get(0)?;
    let weighted_secs: f64 = row.get(1)?;
    let learn_rate: f64 = row.get(2)?;
    let samples: i64 = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(LearningWeight {
        identity: StepIdentity::from_hex(identity),
        weighted: Duration::from_secs_f64(weighted_secs.max(0.0)),
        learn_rate,
        samples: samples.max(0) as u64,
        updated_at: parse_datetime_fallback(&updated_at),
    })
}

/// Parse an RFC3339 timestamp, falling back to now on a corrupt cell.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn decode_recipe(title: &str, author: &str, steps_json: &str) -> Result<Recipe, StorageError> {
    let steps: Vec<Step> =
        serde_json::from_str(steps_json).map_err(|e| StorageError::CorruptRow {
            table: "recipes".into(),
            message: e.to_string(),
        })?;
    Recipe::new(title, author, steps).map_err(|e| StorageError::CorruptRow {
        table: "recipes".into(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(description: &str, minutes: u64, simultaneous: bool) -> Step {
        Step::new(
            description,
            vec!["water".into()],
            Duration::from_secs(minutes * 60),
            simultaneous,
        )
        .unwrap()
    }

    #[test]
    fn weight_round_trip() {
        let mut db = Database::open_memory().unwrap();
        let s = step("Boil water", 5, false);
        let weight = LearningWeight {
            identity: s.identity(),
            weighted: Duration::from_secs(270),
            learn_rate: 0.5,
            samples: 1,
            updated_at: Utc::now(),
        };
        db.save(&weight).unwrap();
        let loaded = db.load(&s.identity()).unwrap().unwrap();
        assert_eq!(loaded, weight);

        db.clear().unwrap();
        assert!(db.load(&s.identity()).unwrap().is_none());
    }

    #[test]
    fn missing_weight_is_none() {
        let db = Database::open_memory().unwrap();
        let s = step("Boil water", 5, false);
        assert!(db.load(&s.identity()).unwrap().is_none());
    }

    #[test]
    fn recipe_round_trip() {
        let db = Database::open_memory().unwrap();
        let recipe = Recipe::new(
            "Tea",
            "mum",
            vec![step("Boil water", 5, true), step("Steep", 3, false)],
        )
        .unwrap();
        db.save_recipe(&recipe).unwrap();
        let loaded = db.load_recipe("Tea").unwrap().unwrap();
        assert_eq!(loaded, recipe);
        assert!(db.load_recipe("Coffee").unwrap().is_none());

        assert!(db.delete_recipe("Tea").unwrap());
        assert!(!db.delete_recipe("Tea").unwrap());
    }

    #[test]
    fn bunch_round_trip_preserves_member_order() {
        let db = Database::open_memory().unwrap();
        let mut bunch = Bunch::new("Sunday dinner").unwrap();
        bunch.add_recipe(Recipe::new("Pie", "", vec![step("Bake", 40, true)]).unwrap());
        bunch.add_recipe(Recipe::new("Soup", "", vec![step("Simmer", 20, true)]).unwrap());
        db.save_bunch(&bunch).unwrap();

        let loaded = db.load_bunch("Sunday dinner").unwrap().unwrap();
        let titles: Vec<&str> = loaded.recipes().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Pie", "Soup"]);
        assert_eq!(db.list_bunches().unwrap(), vec!["Sunday dinner"]);

        assert!(db.delete_bunch("Sunday dinner").unwrap());
        assert!(db.load_bunch("Sunday dinner").unwrap().is_none());
    }

    #[test]
    fn resave_replaces_members() {
        let db = Database::open_memory().unwrap();
        let mut bunch = Bunch::new("Weeknight").unwrap();
        bunch.add_recipe(Recipe::new("Pasta", "", vec![step("Boil", 9, true)]).unwrap());
        db.save_bunch(&bunch).unwrap();

        bunch.remove_recipe(0).unwrap();
        bunch.add_recipe(Recipe::new("Salad", "", vec![step("Chop", 8, false)]).unwrap());
        db.save_bunch(&bunch).unwrap();

        let loaded = db.load_bunch("Weeknight").unwrap().unwrap();
        let titles: Vec<&str> = loaded.recipes().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Salad"]);
    }
}
