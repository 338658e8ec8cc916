//! Meal Catalog MCP Tools
//!
//! Tools for managing meals in the catalog.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Meal, MealCreate, MealUpdate};

/// Response for create_meal
#[derive(Debug, Serialize)]
pub struct CreateMealResponse {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

/// Summary of a meal for list/search results
#[derive(Debug, Serialize)]
pub struct MealSummary {
    pub id: i64,
    pub title: String,
    pub energy: f64,
    pub protein: f64,
    pub carbohydrate: f64,
}

impl From<&Meal> for MealSummary {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id,
            title: meal.title.clone(),
            energy: meal.nutrients.energy,
            protein: meal.nutrients.protein,
            carbohydrate: meal.nutrients.carbohydrate,
        }
    }
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub meals: Vec<MealSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for search_meals
#[derive(Debug, Serialize)]
pub struct SearchMealsResponse {
    pub meals: Vec<MealSummary>,
    pub total: usize,
}

/// Response for update_meal
#[derive(Debug, Serialize)]
pub struct UpdateMealResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteMealResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Create a new meal in the catalog
pub fn create_meal(db: &Database, data: MealCreate) -> Result<CreateMealResponse, String> {
    if data.title.trim().is_empty() {
        return Err("Meal title cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = Meal::create(&conn, &data)
        .map_err(|e| format!("Failed to create meal: {}", e))?;

    Ok(CreateMealResponse {
        id: meal.id,
        title: meal.title,
        created_at: meal.created_at,
    })
}

/// Get a meal by ID with full nutrient detail
pub fn get_meal(db: &Database, id: i64) -> Result<Option<Meal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Meal::get_by_id(&conn, id).map_err(|e| format!("Failed to get meal: {}", e))
}

/// List meals with pagination, newest first
pub fn list_meals(db: &Database, limit: i64, offset: i64) -> Result<ListMealsResponse, String> {
    let limit = limit.min(200).max(1);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list(&conn, limit, offset)
        .map_err(|e| format!("Failed to list meals: {}", e))?;

    let total = Meal::count(&conn)
        .map_err(|e| format!("Failed to count meals: {}", e))?;

    let summaries: Vec<MealSummary> = meals.iter().map(MealSummary::from).collect();

    Ok(ListMealsResponse {
        meals: summaries,
        total,
        limit,
        offset,
    })
}

/// Search meals by title
pub fn search_meals(db: &Database, query: &str, limit: i64) -> Result<SearchMealsResponse, String> {
    let limit = limit.min(100).max(1);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::search_by_title(&conn, query, limit)
        .map_err(|e| format!("Search failed: {}", e))?;

    let summaries: Vec<MealSummary> = meals.iter().map(MealSummary::from).collect();
    let total = summaries.len();

    Ok(SearchMealsResponse {
        meals: summaries,
        total,
    })
}

/// Update a meal's title, image, or nutrient values
pub fn update_meal(db: &Database, id: i64, data: MealUpdate) -> Result<UpdateMealResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Meal::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update meal: {}", e))?;

    match updated {
        Some(meal) => Ok(UpdateMealResponse {
            success: true,
            updated_at: meal.updated_at,
        }),
        None => Err(format!("Meal not found with id: {}", id)),
    }
}

/// Delete a meal. Day selections referencing it are removed by cascade.
pub fn delete_meal(db: &Database, id: i64) -> Result<DeleteMealResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = Meal::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?;
    if meal.is_none() {
        return Err(format!("Meal not found with id: {}", id));
    }

    Meal::delete(&conn, id)
        .map_err(|e| format!("Failed to delete meal: {}", e))?;

    Ok(DeleteMealResponse {
        success: true,
        deleted_id: id,
    })
}
