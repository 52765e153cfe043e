//! Database schema migrations for souschef.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: initial schema.
///
/// - `learning_weights`: one row per step identity; weighted duration and
///   blend rate as REAL, observation count as INTEGER.
/// - `recipes`: immutable recipe snapshots, steps serialized as JSON.
/// - `bunches` / `bunch_members`: named recipe collections; member
///   position is the scheduler tie-break order.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS learning_weights (
            identity      TEXT PRIMARY KEY,
            weighted_secs REAL NOT NULL,
            learn_rate    REAL NOT NULL,
            samples       INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recipes (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL UNIQUE,
            author     TEXT NOT NULL DEFAULT '',
            steps_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bunches (
            id    TEXT PRIMARY KEY,
            title TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS bunch_members (
            bunch_id  TEXT NOT NULL REFERENCES bunches(id) ON DELETE CASCADE,
            position  INTEGER NOT NULL,
            recipe_id TEXT NOT NULL REFERENCES recipes(id),
            PRIMARY KEY (bunch_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_bunch_members_bunch ON bunch_members(bunch_id);",
    )?;
    set_schema_version(conn, 1)?;
    Ok(())
}
