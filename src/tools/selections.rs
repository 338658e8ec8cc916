//! Day Selection MCP Tools
//!
//! Tools for marking catalog meals as consumed on a given day.

use serde::Serialize;

use crate::db::Database;
use crate::models::{DaySelection, Meal, Nutrients};

/// Response for select_meal
#[derive(Debug, Serialize)]
pub struct SelectMealResponse {
    pub id: i64,
    pub day: String,
    pub meal_id: i64,
    pub meal_title: String,
    pub selected_at: String,
    /// true when the meal was already selected for this day
    pub already_selected: bool,
}

/// Response for unselect_meal
#[derive(Debug, Serialize)]
pub struct UnselectMealResponse {
    pub success: bool,
    pub day: String,
    pub meal_id: i64,
}

/// One selected meal with its selection metadata
#[derive(Debug, Serialize)]
pub struct SelectedMeal {
    pub selection_id: i64,
    pub selected_at: String,
    pub meal: Meal,
}

/// Response for get_day_selections
#[derive(Debug, Serialize)]
pub struct DaySelectionsResponse {
    pub day: String,
    pub meals: Vec<SelectedMeal>,
    pub meal_count: usize,
    /// Summed nutrients across the day's selections
    pub totals: Nutrients,
}

/// Response for clear_day_selections
#[derive(Debug, Serialize)]
pub struct ClearDayResponse {
    pub day: String,
    pub removed: usize,
}

/// Response for cleanup_old_selections
#[derive(Debug, Serialize)]
pub struct CleanupSelectionsResponse {
    pub keep_day: String,
    pub removed: usize,
}

/// Response for list_selection_days
#[derive(Debug, Serialize)]
pub struct SelectionDaysResponse {
    pub days: Vec<String>,
    pub total: usize,
}

/// Mark a meal as consumed on a day. Selecting an already selected meal
/// is a no-op and echoes the existing row.
pub fn select_meal(db: &Database, day: &str, meal_id: i64) -> Result<SelectMealResponse, String> {
    if day.trim().is_empty() {
        return Err("Day cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = Meal::get_by_id(&conn, meal_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Meal not found with id: {}", meal_id))?;

    let existing = DaySelection::find(&conn, day, meal_id)
        .map_err(|e| format!("Failed to check selection: {}", e))?;

    match existing {
        Some(selection) => Ok(SelectMealResponse {
            id: selection.id,
            day: selection.day,
            meal_id: selection.meal_id,
            meal_title: meal.title,
            selected_at: selection.selected_at,
            already_selected: true,
        }),
        None => {
            let selection = DaySelection::select(&conn, day, meal_id)
                .map_err(|e| format!("Failed to select meal: {}", e))?;
            Ok(SelectMealResponse {
                id: selection.id,
                day: selection.day,
                meal_id: selection.meal_id,
                meal_title: meal.title,
                selected_at: selection.selected_at,
                already_selected: false,
            })
        }
    }
}

/// Remove a meal from a day's selections
pub fn unselect_meal(db: &Database, day: &str, meal_id: i64) -> Result<UnselectMealResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = DaySelection::unselect(&conn, day, meal_id)
        .map_err(|e| format!("Failed to unselect meal: {}", e))?;

    Ok(UnselectMealResponse {
        success: removed,
        day: day.to_string(),
        meal_id,
    })
}

/// Get the selected meals for a day with summed nutrient totals
pub fn get_day_selections(db: &Database, day: &str) -> Result<DaySelectionsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let selections = DaySelection::get_for_day(&conn, day)
        .map_err(|e| format!("Failed to get selections: {}", e))?;
    let meals = DaySelection::meals_for_day(&conn, day)
        .map_err(|e| format!("Failed to get selected meals: {}", e))?;

    let totals: Nutrients = meals.iter().map(|meal| meal.nutrients).sum();
    let meal_count = meals.len();

    // both queries order by selection id, so rows pair up
    let selected = selections
        .into_iter()
        .zip(meals)
        .map(|(selection, meal)| SelectedMeal {
            selection_id: selection.id,
            selected_at: selection.selected_at,
            meal,
        })
        .collect();

    Ok(DaySelectionsResponse {
        day: day.to_string(),
        meals: selected,
        meal_count,
        totals,
    })
}

/// Remove every selection for a day
pub fn clear_day_selections(db: &Database, day: &str) -> Result<ClearDayResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = DaySelection::clear_day(&conn, day)
        .map_err(|e| format!("Failed to clear selections: {}", e))?;

    Ok(ClearDayResponse {
        day: day.to_string(),
        removed,
    })
}

/// Drop selections from every day except the one to keep
pub fn cleanup_old_selections(db: &Database, keep_day: &str) -> Result<CleanupSelectionsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = DaySelection::cleanup_expired(&conn, keep_day)
        .map_err(|e| format!("Failed to clean up selections: {}", e))?;

    Ok(CleanupSelectionsResponse {
        keep_day: keep_day.to_string(),
        removed,
    })
}

/// List the days that currently have selections
pub fn list_selection_days(db: &Database) -> Result<SelectionDaysResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let days = DaySelection::days_with_selections(&conn)
        .map_err(|e| format!("Failed to list days: {}", e))?;
    let total = days.len();

    Ok(SelectionDaysResponse { days, total })
}
