//! MealTrack Library
//!
//! Core functionality for meal tracking and nutrition assessment.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
