//! MealTrack MCP Server Implementation
//!
//! Implements the MCP server with all MealTrack tools.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{nutrient_value_to_f64, today, MealCreate, MealUpdate, Nutrients};
use crate::nutrition::{IntakeData, NutrientKey, NutritionAssessor, ReportOptions};
use crate::tools::assessment;
use crate::tools::meals;
use crate::tools::reports;
use crate::tools::selections;
use crate::tools::status::StatusTracker;

/// MealTrack MCP Service
#[derive(Clone)]
pub struct MealTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    assessor: Arc<NutritionAssessor>,
    tool_router: ToolRouter<MealTrackService>,
}

impl MealTrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            assessor: Arc::new(NutritionAssessor::with_daily_reference()),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Shared Defaults
// ============================================================================

fn default_true() -> bool { true }
fn default_search_limit() -> i64 { 20 }
fn default_list_limit() -> i64 { 50 }
fn default_day() -> String { today() }
fn default_time_range() -> String { "daily".to_string() }

// ============================================================================
// Meal Catalog Parameter Structs
// ============================================================================

/// Per-serving nutrient values. Every field accepts a plain number, a numeric
/// string, or a string with a trailing unit ("320 kcal", "12,5 g"); anything
/// unparseable counts as 0.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct NutrientValuesParams {
    /// Energy in kcal
    pub energy: Option<serde_json::Value>,
    /// Protein in grams
    pub protein: Option<serde_json::Value>,
    /// Trans fat in grams
    pub trans_fat: Option<serde_json::Value>,
    /// Saturated fat in grams
    pub saturated_fat: Option<serde_json::Value>,
    /// Carbohydrate in grams
    pub carbohydrate: Option<serde_json::Value>,
    /// Added sugar in grams
    pub added_sugar: Option<serde_json::Value>,
    /// Salt in grams
    pub salt: Option<serde_json::Value>,
    /// Dietary fiber in grams
    pub dietary_fiber: Option<serde_json::Value>,
}

impl NutrientValuesParams {
    fn to_nutrients(&self) -> Nutrients {
        let field = |value: &Option<serde_json::Value>| {
            value.as_ref().map(nutrient_value_to_f64).unwrap_or(0.0)
        };
        Nutrients {
            energy: field(&self.energy),
            protein: field(&self.protein),
            trans_fat: field(&self.trans_fat),
            saturated_fat: field(&self.saturated_fat),
            carbohydrate: field(&self.carbohydrate),
            added_sugar: field(&self.added_sugar),
            salt: field(&self.salt),
            dietary_fiber: field(&self.dietary_fiber),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateMealParams {
    /// Meal title (required, non-empty)
    pub title: String,
    /// Optional image URL
    pub image_url: Option<String>,
    /// Nutrient values per serving
    #[serde(flatten)]
    pub nutrients: NutrientValuesParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealParams {
    /// Meal ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    /// Maximum number of meals to return (default 50)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Number of meals to skip
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchMealsParams {
    /// Title substring to search for
    pub query: String,
    /// Maximum results (default 20)
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMealParams {
    /// Meal ID
    pub id: i64,
    /// New title
    pub title: Option<String>,
    /// New image URL
    pub image_url: Option<String>,
    /// Nutrient values to change; omitted nutrients keep their stored value
    #[serde(flatten)]
    pub nutrients: NutrientValuesParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealParams {
    /// Meal ID
    pub id: i64,
}

// ============================================================================
// Day Selection Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectMealParams {
    /// Catalog meal ID to select
    pub meal_id: i64,
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnselectMealParams {
    /// Catalog meal ID to unselect
    pub meal_id: i64,
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DayParams {
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CleanupSelectionsParams {
    /// The one day whose selections survive the sweep (defaults to today)
    #[serde(default = "default_day")]
    pub keep_day: String,
}

// ============================================================================
// Assessment Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AssessDayParams {
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
    /// Include the recommendations section (default true)
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
    /// Include per-nutrient detail rows (default true)
    #[serde(default = "default_true")]
    pub include_details: bool,
    /// Include the statistics section (default true)
    #[serde(default = "default_true")]
    pub include_statistics: bool,
    /// Label for the period covered, e.g. "daily" or "weekly"
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AssessIntakeParams {
    /// Nutrient intake map. Keys are standard nutrient identifiers (energy,
    /// protein, vitaminC, calcium, ...); unknown keys are ignored. Values
    /// accept the same lenient number/string forms as meal nutrients.
    pub intake: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareDaysParams {
    /// Day being evaluated (defaults to today)
    #[serde(default = "default_day")]
    pub current_day: String,
    /// Baseline day to compare against, YYYY-MM-DD
    pub previous_day: String,
}

// ============================================================================
// Report Export Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportTextParams {
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
    /// Include the recommendations section (default true)
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
    /// Include the statistics section and health score (default true)
    #[serde(default = "default_true")]
    pub include_statistics: bool,
    /// Label for the period covered, e.g. "daily" or "weekly"
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportPdfParams {
    /// Day in YYYY-MM-DD format (defaults to today)
    #[serde(default = "default_day")]
    pub day: String,
    /// Path for the generated PDF file (parent directories are created)
    pub output_path: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MealTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the MealTrack service including build info, database status, and process information")]
    async fn mealtrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for tracking meals and assessing nutrition. Call this when starting a new session or when unsure how to use the MealTrack tools.")]
    fn mealtrack_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::MEALTRACK_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(MEALTRACK_INSTRUCTIONS)]))
    }

    // --- Meal Catalog ---

    #[tool(description = "Create a catalog meal with per-serving nutrient values. Nutrient fields accept numbers or lenient strings like '320 kcal'.")]
    fn create_meal(&self, Parameters(p): Parameters<CreateMealParams>) -> Result<CallToolResult, McpError> {
        let data = MealCreate {
            title: p.title,
            image_url: p.image_url,
            nutrients: p.nutrients.to_nutrients(),
        };
        let result = meals::create_meal(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get full details for a catalog meal including all nutrient values")]
    fn get_meal(&self, Parameters(p): Parameters<GetMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meal(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(meal) => serde_json::to_string_pretty(&meal),
            None => Ok(format!(r#"{{"error": "Meal not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List catalog meals with pagination, newest first")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, p.limit, p.offset).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Search catalog meals by title substring")]
    fn search_meals(&self, Parameters(p): Parameters<SearchMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::search_meals(&self.database, &p.query, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a catalog meal. Only provided fields change; nutrient fields accept the same lenient values as create_meal.")]
    fn update_meal(&self, Parameters(p): Parameters<UpdateMealParams>) -> Result<CallToolResult, McpError> {
        let n = &p.nutrients;
        let data = MealUpdate {
            title: p.title,
            image_url: p.image_url,
            energy: n.energy.as_ref().map(nutrient_value_to_f64),
            protein: n.protein.as_ref().map(nutrient_value_to_f64),
            trans_fat: n.trans_fat.as_ref().map(nutrient_value_to_f64),
            saturated_fat: n.saturated_fat.as_ref().map(nutrient_value_to_f64),
            carbohydrate: n.carbohydrate.as_ref().map(nutrient_value_to_f64),
            added_sugar: n.added_sugar.as_ref().map(nutrient_value_to_f64),
            salt: n.salt.as_ref().map(nutrient_value_to_f64),
            dietary_fiber: n.dietary_fiber.as_ref().map(nutrient_value_to_f64),
        };
        let result = meals::update_meal(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a catalog meal and any day selections pointing at it")]
    fn delete_meal(&self, Parameters(p): Parameters<DeleteMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Day Selections ---

    #[tool(description = "Select a catalog meal as eaten on a day. Selecting the same meal twice on one day is a no-op.")]
    fn select_meal(&self, Parameters(p): Parameters<SelectMealParams>) -> Result<CallToolResult, McpError> {
        let result = selections::select_meal(&self.database, &p.day, p.meal_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a meal from a day's selections")]
    fn unselect_meal(&self, Parameters(p): Parameters<UnselectMealParams>) -> Result<CallToolResult, McpError> {
        let result = selections::unselect_meal(&self.database, &p.day, p.meal_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a day's selected meals with full nutrient values and day totals")]
    fn get_day_selections(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = selections::get_day_selections(&self.database, &p.day).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove all of a day's meal selections")]
    fn clear_day_selections(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = selections::clear_day_selections(&self.database, &p.day).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete selections from every day except keep_day. The server runs this sweep for today at startup.")]
    fn cleanup_old_selections(&self, Parameters(p): Parameters<CleanupSelectionsParams>) -> Result<CallToolResult, McpError> {
        let result = selections::cleanup_old_selections(&self.database, &p.keep_day).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List all days that currently have meal selections")]
    fn list_selection_days(&self) -> Result<CallToolResult, McpError> {
        let result = selections::list_selection_days(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Nutrition Assessment ---

    #[tool(description = "Assess a day's selected meals against daily reference standards. Returns a report with summary, statistics, per-nutrient details, and recommendations; each section can be toggled off.")]
    fn assess_day(&self, Parameters(p): Parameters<AssessDayParams>) -> Result<CallToolResult, McpError> {
        let options = ReportOptions {
            include_recommendations: p.include_recommendations,
            include_details: p.include_details,
            include_statistics: p.include_statistics,
            time_range: p.time_range,
        };
        let result = assessment::assess_day(&self.database, &self.assessor, &p.day, &options)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Classify an explicit nutrient intake map against the daily standards without touching the database. Accepts any standard nutrient key, vitamins and minerals included.")]
    fn assess_intake(&self, Parameters(p): Parameters<AssessIntakeParams>) -> Result<CallToolResult, McpError> {
        let mut intake = IntakeData::new();
        for (key, value) in &p.intake {
            if let Some(nutrient) = NutrientKey::from_str(key) {
                intake.insert(nutrient, nutrient_value_to_f64(value));
            }
        }
        let result = assessment::assess_intake(&self.assessor, &intake);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Assess a day's nutrients grouped into macronutrients, vitamins, and minerals with per-group adequacy counts")]
    fn assess_day_by_category(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = assessment::assess_day_by_category(&self.database, &self.assessor, &p.day)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Score each of a day's tracked nutrients on a 0-100 scale (adequate scores high, deficient and excessive score 0)")]
    fn score_day(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = assessment::score_day(&self.database, &self.assessor, &p.day)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Compare two days' nutrient scores and bucket each nutrient into improved, worsened, or unchanged")]
    fn compare_days(&self, Parameters(p): Parameters<CompareDaysParams>) -> Result<CallToolResult, McpError> {
        let result = assessment::compare_days(&self.database, &self.assessor, &p.current_day, &p.previous_day)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the daily reference standards used for assessment")]
    fn get_nutrition_standards(&self) -> Result<CallToolResult, McpError> {
        let result = assessment::get_nutrition_standards(&self.assessor);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Report Export ---

    #[tool(description = "Render a day's assessment as a fixed plain-text report")]
    fn export_report_text(&self, Parameters(p): Parameters<ExportTextParams>) -> Result<CallToolResult, McpError> {
        let options = ReportOptions {
            include_recommendations: p.include_recommendations,
            include_details: false,
            include_statistics: p.include_statistics,
            time_range: p.time_range,
        };
        let text = reports::export_day_report_text(&self.database, &self.assessor, &p.day, &options)
            .map_err(|e| McpError::internal_error(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Generate a two-page PDF assessment report (summary table plus percentage bar chart) for a day's selected meals")]
    fn export_report_pdf(&self, Parameters(p): Parameters<ExportPdfParams>) -> Result<CallToolResult, McpError> {
        let result = reports::generate_assessment_pdf(&self.database, &self.assessor, &p.day, &p.output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MealTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mealtrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MealTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MealTrack - Meal catalog, day selections, and nutrition assessment. \
                 IMPORTANT: Call mealtrack_instructions when starting a session or unsure how the tools fit together. \
                 Catalog: create/get/list/search/update/delete_meal. \
                 Selections: select_meal/unselect_meal/get_day_selections/clear_day_selections/\
                 cleanup_old_selections/list_selection_days. \
                 Assessment: assess_day (full report), assess_intake (explicit nutrient map), \
                 assess_day_by_category, get_nutrition_standards. \
                 Scores: score_day and compare_days for day-over-day progress. \
                 Export: export_report_text, export_report_pdf."
                    .into(),
            ),
        }
    }
}
