//! Meal catalog model
//!
//! A catalog meal with its per-serving nutrient amounts, plus the lenient
//! parsing applied to nutrient values arriving over the tool boundary.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{IntakeData, NutrientKey};

/// Nutrient amounts carried on a meal record (per serving)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub energy: f64,        // kcal
    pub protein: f64,       // grams
    pub trans_fat: f64,     // grams
    pub saturated_fat: f64, // grams
    pub carbohydrate: f64,  // grams
    pub added_sugar: f64,   // grams
    pub salt: f64,          // grams
    pub dietary_fiber: f64, // grams
}

impl Nutrients {
    /// All zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add another set of nutrients to this one
    pub fn add(&self, other: &Nutrients) -> Self {
        Self {
            energy: self.energy + other.energy,
            protein: self.protein + other.protein,
            trans_fat: self.trans_fat + other.trans_fat,
            saturated_fat: self.saturated_fat + other.saturated_fat,
            carbohydrate: self.carbohydrate + other.carbohydrate,
            added_sugar: self.added_sugar + other.added_sugar,
            salt: self.salt + other.salt,
            dietary_fiber: self.dietary_fiber + other.dietary_fiber,
        }
    }

    /// Amount for a tracked nutrient, None for keys not carried on meals
    pub fn get(&self, key: NutrientKey) -> Option<f64> {
        match key {
            NutrientKey::Energy => Some(self.energy),
            NutrientKey::Protein => Some(self.protein),
            NutrientKey::TransFat => Some(self.trans_fat),
            NutrientKey::SaturatedFat => Some(self.saturated_fat),
            NutrientKey::Carbohydrate => Some(self.carbohydrate),
            NutrientKey::AddedSugar => Some(self.added_sugar),
            NutrientKey::Salt => Some(self.salt),
            NutrientKey::DietaryFiber => Some(self.dietary_fiber),
            _ => None,
        }
    }

    /// Intake mapping with one entry per tracked nutrient
    pub fn to_intake_data(&self) -> IntakeData {
        NutrientKey::TRACKED
            .into_iter()
            .filter_map(|key| self.get(key).map(|amount| (key, amount)))
            .collect()
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients::add(&self, &other)
    }
}

impl std::iter::Sum for Nutrients {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrients::zero(), |acc, n| acc + n)
    }
}

/// Parse the leading numeric prefix of a string, 0 when there is none.
///
/// Accepts an optional sign, digits, one decimal point, and an exponent,
/// so "12.5", "100 kcal" and "1e3mg" all parse while "abc" yields 0.
pub fn parse_loose_number(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    while end < bytes.len() {
        let b = bytes[end];
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
            }
            b'+' | b'-' => {
                // Sign is only valid at the start or right after an exponent
                let after_exp =
                    end > 0 && (bytes[end - 1] == b'e' || bytes[end - 1] == b'E');
                if end != 0 && !after_exp {
                    break;
                }
            }
            b'.' => {
                if seen_dot || seen_exp {
                    break;
                }
                seen_dot = true;
            }
            b'e' | b'E' => {
                if seen_exp || !seen_digit {
                    break;
                }
                seen_exp = true;
            }
            _ => break,
        }
        end += 1;
    }

    // Trailing exponent/sign/dot without digits after it still parses via
    // shrinking until the slice is a valid float
    let mut slice = &trimmed[..end];
    while !slice.is_empty() {
        if let Ok(value) = slice.parse::<f64>() {
            return if value.is_finite() { value } else { 0.0 };
        }
        slice = &slice[..slice.len() - 1];
    }
    0.0
}

/// Coerce a numeric-or-string JSON value to f64, 0 for anything else
pub fn nutrient_value_to_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_loose_number(s),
        _ => 0.0,
    }
}

/// A catalog meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub nutrients: Nutrients,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub title: String,
    pub image_url: Option<String>,
    pub nutrients: Nutrients,
}

/// Data for updating a meal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub energy: Option<f64>,
    pub protein: Option<f64>,
    pub trans_fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub carbohydrate: Option<f64>,
    pub added_sugar: Option<f64>,
    pub salt: Option<f64>,
    pub dietary_fiber: Option<f64>,
}

impl Meal {
    /// Create from a database row
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            image_url: row.get("image_url")?,
            nutrients: Nutrients {
                energy: row.get("energy")?,
                protein: row.get("protein")?,
                trans_fat: row.get("trans_fat")?,
                saturated_fat: row.get("saturated_fat")?,
                carbohydrate: row.get("carbohydrate")?,
                added_sugar: row.get("added_sugar")?,
                salt: row.get("salt")?,
                dietary_fiber: row.get("dietary_fiber")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new meal
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meals (
                title, image_url, energy, protein, trans_fat, saturated_fat,
                carbohydrate, added_sugar, salt, dietary_fiber
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.title,
                data.image_url,
                data.nutrients.energy,
                data.nutrients.protein,
                data.nutrients.trans_fat,
                data.nutrients.saturated_fat,
                data.nutrients.carbohydrate,
                data.nutrients.added_sugar,
                data.nutrients.salt,
                data.nutrients.dietary_fiber,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List meals, newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meals ORDER BY id DESC LIMIT ?1 OFFSET ?2")?;

        let meals = stmt
            .query_map([limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Search meals by title substring
    pub fn search_by_title(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE title LIKE ?1 ORDER BY title, id LIMIT ?2",
        )?;

        let meals = stmt
            .query_map(params![pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Update a meal
    pub fn update(conn: &Connection, id: i64, data: &MealUpdate) -> DbResult<Option<Self>> {
        let existing = Self::get_by_id(conn, id)?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = data.title {
            updates.push(format!("title = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(title.clone()));
        }
        if let Some(ref image_url) = data.image_url {
            updates.push(format!("image_url = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(image_url.clone()));
        }
        if let Some(energy) = data.energy {
            updates.push(format!("energy = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(energy));
        }
        if let Some(protein) = data.protein {
            updates.push(format!("protein = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(protein));
        }
        if let Some(trans_fat) = data.trans_fat {
            updates.push(format!("trans_fat = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(trans_fat));
        }
        if let Some(saturated_fat) = data.saturated_fat {
            updates.push(format!("saturated_fat = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(saturated_fat));
        }
        if let Some(carbohydrate) = data.carbohydrate {
            updates.push(format!("carbohydrate = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(carbohydrate));
        }
        if let Some(added_sugar) = data.added_sugar {
            updates.push(format!("added_sugar = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(added_sugar));
        }
        if let Some(salt) = data.salt {
            updates.push(format!("salt = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(salt));
        }
        if let Some(dietary_fiber) = data.dietary_fiber {
            updates.push(format!("dietary_fiber = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(dietary_fiber));
        }

        if updates.is_empty() {
            return Ok(existing);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE meals SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a meal
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Count all meals
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_parse_loose_number() {
        assert_eq!(parse_loose_number("12.5"), 12.5);
        assert_eq!(parse_loose_number("  42"), 42.0);
        assert_eq!(parse_loose_number("100 kcal"), 100.0);
        assert_eq!(parse_loose_number("-3.5g"), -3.5);
        assert_eq!(parse_loose_number("1e3mg"), 1000.0);
        assert_eq!(parse_loose_number("abc"), 0.0);
        assert_eq!(parse_loose_number(""), 0.0);
        assert_eq!(parse_loose_number("."), 0.0);
        assert_eq!(parse_loose_number("12.5.7"), 12.5);
    }

    #[test]
    fn test_nutrient_value_coercion() {
        use serde_json::json;
        assert_eq!(nutrient_value_to_f64(&json!(25.0)), 25.0);
        assert_eq!(nutrient_value_to_f64(&json!("17.2")), 17.2);
        assert_eq!(nutrient_value_to_f64(&json!("garbage")), 0.0);
        assert_eq!(nutrient_value_to_f64(&json!(null)), 0.0);
        assert_eq!(nutrient_value_to_f64(&json!(true)), 0.0);
        assert_eq!(nutrient_value_to_f64(&json!(["x"])), 0.0);
    }

    #[test]
    fn test_nutrients_sum() {
        let a = Nutrients { protein: 10.0, ..Nutrients::zero() };
        let b = Nutrients { protein: 15.0, ..Nutrients::zero() };
        let total: Nutrients = [a, b].into_iter().sum();
        assert_eq!(total.protein, 25.0);
        assert_eq!(total.energy, 0.0);
    }

    #[test]
    fn test_to_intake_data_covers_tracked_keys() {
        let nutrients = Nutrients { energy: 500.0, salt: 2.0, ..Nutrients::zero() };
        let intake = nutrients.to_intake_data();
        assert_eq!(intake.len(), NutrientKey::TRACKED.len());
        assert_eq!(intake[&NutrientKey::Energy], 500.0);
        assert_eq!(intake[&NutrientKey::Salt], 2.0);
        assert_eq!(intake[&NutrientKey::Protein], 0.0);
    }

    #[test]
    fn test_meal_crud() {
        let db = test_db();
        db.with_conn(|conn| {
            let created = Meal::create(
                conn,
                &MealCreate {
                    title: "宫保鸡丁".to_string(),
                    image_url: None,
                    nutrients: Nutrients { energy: 650.0, protein: 32.0, ..Nutrients::zero() },
                },
            )?;
            assert_eq!(created.title, "宫保鸡丁");
            assert_eq!(created.nutrients.energy, 650.0);

            let fetched = Meal::get_by_id(conn, created.id)?.unwrap();
            assert_eq!(fetched.nutrients.protein, 32.0);

            let updated = Meal::update(
                conn,
                created.id,
                &MealUpdate { protein: Some(35.0), ..MealUpdate::default() },
            )?
            .unwrap();
            assert_eq!(updated.nutrients.protein, 35.0);
            assert_eq!(updated.nutrients.energy, 650.0);

            assert!(Meal::delete(conn, created.id)?);
            assert!(Meal::get_by_id(conn, created.id)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_meal_search() {
        let db = test_db();
        db.with_conn(|conn| {
            for title in ["番茄炒蛋", "番茄牛腩", "清蒸鲈鱼"] {
                Meal::create(
                    conn,
                    &MealCreate {
                        title: title.to_string(),
                        image_url: None,
                        nutrients: Nutrients::zero(),
                    },
                )?;
            }

            let hits = Meal::search_by_title(conn, "番茄", 10)?;
            assert_eq!(hits.len(), 2);
            let misses = Meal::search_by_title(conn, "火锅", 10)?;
            assert!(misses.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
