//! MealTrack Tools module
//!
//! MCP tool implementations for the MealTrack service.

pub mod assessment;
pub mod meals;
pub mod reports;
pub mod selections;
pub mod status;
