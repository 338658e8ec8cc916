//! Day selection model
//!
//! Records which catalog meals were consumed on which day. Selections are
//! day-scoped; anything outside the kept day is swept by the cleanup job.

use chrono::Local;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Meal;
use crate::db::DbResult;

/// Today's date as the day key (local time, ISO date)
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// A meal selected as consumed on a given day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySelection {
    pub id: i64,
    pub day: String,
    pub meal_id: i64,
    pub selected_at: String,
}

impl DaySelection {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            day: row.get("day")?,
            meal_id: row.get("meal_id")?,
            selected_at: row.get("selected_at")?,
        })
    }

    /// Look up the selection row for a day/meal pair
    pub fn find(conn: &Connection, day: &str, meal_id: i64) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM day_selections WHERE day = ?1 AND meal_id = ?2")?;

        match stmt.query_row(params![day, meal_id], Self::from_row) {
            Ok(selection) => Ok(Some(selection)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a meal consumed on a day. Idempotent: selecting the same meal
    /// twice keeps the original row.
    pub fn select(conn: &Connection, day: &str, meal_id: i64) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO day_selections (day, meal_id) VALUES (?1, ?2)",
            params![day, meal_id],
        )?;

        let mut stmt =
            conn.prepare("SELECT * FROM day_selections WHERE day = ?1 AND meal_id = ?2")?;
        let selection = stmt.query_row(params![day, meal_id], Self::from_row)?;
        Ok(selection)
    }

    /// Remove a meal from a day's selections
    pub fn unselect(conn: &Connection, day: &str, meal_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM day_selections WHERE day = ?1 AND meal_id = ?2",
            params![day, meal_id],
        )?;
        Ok(rows > 0)
    }

    /// All selection rows for a day, in selection order
    pub fn get_for_day(conn: &Connection, day: &str) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM day_selections WHERE day = ?1 ORDER BY id")?;

        let selections = stmt
            .query_map([day], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(selections)
    }

    /// The selected meals for a day, joined with the catalog
    pub fn meals_for_day(conn: &Connection, day: &str) -> DbResult<Vec<Meal>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT m.* FROM meals m
            JOIN day_selections s ON s.meal_id = m.id
            WHERE s.day = ?1
            ORDER BY s.id
            "#,
        )?;

        let meals = stmt
            .query_map([day], Meal::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Remove every selection for a day, returning the count removed
    pub fn clear_day(conn: &Connection, day: &str) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM day_selections WHERE day = ?1", [day])?;
        Ok(rows)
    }

    /// Delete selections from every day except the kept one.
    ///
    /// This is the daily sweep: selections are only meaningful for the
    /// current day, so stale days are dropped wholesale.
    pub fn cleanup_expired(conn: &Connection, keep_day: &str) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM day_selections WHERE day != ?1", [keep_day])?;
        Ok(rows)
    }

    /// Distinct days that still have selections
    pub fn days_with_selections(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt =
            conn.prepare("SELECT DISTINCT day FROM day_selections ORDER BY day")?;

        let days = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::{MealCreate, Nutrients};

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        db
    }

    fn seed_meal(conn: &Connection, title: &str, energy: f64) -> i64 {
        Meal::create(
            conn,
            &MealCreate {
                title: title.to_string(),
                image_url: None,
                nutrients: Nutrients { energy, ..Nutrients::zero() },
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_select_is_idempotent() {
        let db = test_db();
        db.with_conn(|conn| {
            let meal_id = seed_meal(conn, "早餐粥", 200.0);

            let first = DaySelection::select(conn, "2025-03-01", meal_id)?;
            let second = DaySelection::select(conn, "2025-03-01", meal_id)?;
            assert_eq!(first.id, second.id);
            assert_eq!(DaySelection::get_for_day(conn, "2025-03-01")?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_meals_for_day_join() {
        let db = test_db();
        db.with_conn(|conn| {
            let a = seed_meal(conn, "牛肉面", 550.0);
            let b = seed_meal(conn, "沙拉", 150.0);
            DaySelection::select(conn, "2025-03-02", a)?;
            DaySelection::select(conn, "2025-03-02", b)?;
            DaySelection::select(conn, "2025-03-03", a)?;

            let meals = DaySelection::meals_for_day(conn, "2025-03-02")?;
            assert_eq!(meals.len(), 2);
            assert_eq!(meals[0].title, "牛肉面");
            assert_eq!(meals[1].nutrients.energy, 150.0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_cleanup_keeps_only_given_day() {
        let db = test_db();
        db.with_conn(|conn| {
            let meal_id = seed_meal(conn, "蛋炒饭", 480.0);
            DaySelection::select(conn, "2025-03-01", meal_id)?;
            DaySelection::select(conn, "2025-03-02", meal_id)?;
            DaySelection::select(conn, "2025-03-03", meal_id)?;

            let removed = DaySelection::cleanup_expired(conn, "2025-03-03")?;
            assert_eq!(removed, 2);
            assert_eq!(
                DaySelection::days_with_selections(conn)?,
                vec!["2025-03-03".to_string()]
            );
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_meal_delete_cascades() {
        let db = test_db();
        db.with_conn(|conn| {
            let meal_id = seed_meal(conn, "烤鸭", 700.0);
            DaySelection::select(conn, "2025-03-04", meal_id)?;

            Meal::delete(conn, meal_id)?;
            assert!(DaySelection::get_for_day(conn, "2025-03-04")?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
