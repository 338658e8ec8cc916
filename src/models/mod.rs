//! Data models
//!
//! Rust structs representing database entities.

mod meal;
mod selection;

pub use meal::{
    nutrient_value_to_f64, parse_loose_number, Meal, MealCreate, MealUpdate, Nutrients,
};
pub use selection::{today, DaySelection};
