//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEALS
        -- Catalog of meals with per-serving nutrients
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            image_url TEXT,                      -- nullable, catalog photo

            -- Nutrient amounts (per serving)
            energy REAL NOT NULL DEFAULT 0,      -- kcal
            protein REAL NOT NULL DEFAULT 0,     -- grams
            trans_fat REAL NOT NULL DEFAULT 0,   -- grams
            saturated_fat REAL NOT NULL DEFAULT 0, -- grams
            carbohydrate REAL NOT NULL DEFAULT 0, -- grams
            added_sugar REAL NOT NULL DEFAULT 0, -- grams
            salt REAL NOT NULL DEFAULT 0,        -- grams
            dietary_fiber REAL NOT NULL DEFAULT 0, -- grams

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_title ON meals(title);

        -- ============================================
        -- DAY SELECTIONS
        -- Which meals were consumed on which day
        -- ============================================
        CREATE TABLE day_selections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day TEXT NOT NULL,                   -- ISO date: "2025-01-09"
            meal_id INTEGER NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
            selected_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(day, meal_id)                 -- a meal counts once per day
        );

        CREATE INDEX idx_day_selections_day ON day_selections(day);
        CREATE INDEX idx_day_selections_meal ON day_selections(meal_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
