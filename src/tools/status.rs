//! MealTrack Status Tool
//!
//! Provides runtime status information about the MealTrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Meal tracking and assessment instructions for AI assistants
pub const MEALTRACK_INSTRUCTIONS: &str = r#"
# MealTrack Usage Instructions

This guide explains how to track meals and assess nutrition using the MealTrack tools.

## Overview

MealTrack works in two layers:
1. **Meal Catalog** - Reusable meals with per-serving nutrient values
2. **Day Selections** - Which catalog meals were eaten on a given day

Assessment tools aggregate a day's selections, compare the totals against
daily reference standards, and classify each nutrient into a status band.

---

## Meal Catalog

**Tool:** `create_meal`
- `title` is required; everything else is optional
- Nutrient fields: `energy` (kcal), `protein`, `trans_fat`, `saturated_fat`,
  `carbohydrate`, `added_sugar`, `salt`, `dietary_fiber` (all grams)
- Values are per serving. Omitted nutrients default to 0.

**Lenient nutrient values:** every nutrient field accepts a number, a numeric
string, or a string with a trailing unit. All of these parse to the same value:

```json
{"energy": 320}
{"energy": "320"}
{"energy": "320 kcal"}
{"protein": "12,5"}
```

Unparseable values fall back to 0 rather than failing the call.

**Other catalog tools:**
- `get_meal` - fetch one meal by id
- `list_meals` - paginated listing (newest first)
- `search_meals` - title substring search
- `update_meal` - partial update; only provided fields change
- `delete_meal` - removes the meal and any day selections pointing at it

---

## Day Selections

Days are ISO dates (YYYY-MM-DD). All selection tools default `day` to today.

**Typical flow:**
1. `search_meals` to find the catalog entry (or `create_meal` if new)
2. `select_meal` with the meal id - selecting the same meal twice on one day
   is a no-op and reports `already_selected: true`
3. `get_day_selections` to review the day including nutrient totals
4. `unselect_meal` / `clear_day_selections` to correct mistakes

`cleanup_old_selections` deletes selections from every day except `keep_day`.
The server also runs this sweep for today's date at startup.

---

## Nutrition Assessment

**Tool:** `assess_day` - the main entry point. Aggregates the day's selected
meals and returns a report with summary, statistics, per-nutrient details,
and recommendations (each section can be toggled off).

Each nutrient's intake percentage is `intake / daily_value * 100`, rounded
to one decimal, then classified:

| Percentage | Status |
|-----------|--------------|
| < 60%     | deficient    |
| 60-79%    | insufficient |
| 80-120%   | adequate     |
| > 120%    | excessive    |

The report's `overallStatus` takes the worst band present: deficient wins
over excessive, which wins over insufficient. `healthScore` is the share of
nutrients in the adequate band (0-100).

**Other assessment tools:**
- `assess_intake` - classify an explicit nutrient map without touching the
  database; accepts lenient values and any standard nutrient key (vitamins
  and minerals included)
- `assess_day_by_category` - the day's nutrients grouped into
  macronutrients / vitamins / minerals with per-group counts
- `get_nutrition_standards` - the daily reference table in use

---

## Scores and Comparison

**Tool:** `score_day` - maps each nutrient's status to a 0-100 score:
adequate 85-100 (100 near the 90-110% sweet spot), insufficient 20-60
depending on how close it is, deficient and excessive score 0.

**Tool:** `compare_days` - scores two days and buckets each nutrient into
improved / worsened / unchanged, plus nutrients only present in one day.
Use it to answer "is today better than yesterday?".

---

## Report Export

- `export_report_text` - fixed plain-text rendering of `assess_day` output,
  suitable for pasting into chat
- `export_report_pdf` - two-page PDF (summary table + percentage bar chart)
  written to `output_path` on the server's filesystem

---

## Notes

- A day with no selections still assesses: all-zero intake, every nutrient
  deficient. Check `mealCount` in the statistics section.
- Catalog meals store the 8 tracked nutrients; `assess_intake` is the way
  to evaluate vitamin/mineral data from elsewhere.
- All timestamps are ISO-8601; report timestamps are UTC.
"#;

/// Runtime status of the MealTrack service
#[derive(Debug, Clone, Serialize)]
pub struct MealTrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MealTrackStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MealTrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
