//! MCP server module
//!
//! Exposes the MealTrack tools over the Model Context Protocol.

pub mod server;

pub use server::MealTrackService;
