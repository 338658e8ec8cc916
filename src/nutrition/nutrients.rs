//! Nutrient key enumeration and category grouping
//!
//! Every nutrient the engine knows about is a variant here; wire names match
//! the meal-record field names, so unknown keys cannot reach the assessment
//! path at runtime.

use serde::{Deserialize, Serialize};

/// Identifier for a tracked or categorized nutrient
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NutrientKey {
    #[serde(rename = "energy")]
    Energy,
    #[serde(rename = "protein")]
    Protein,
    #[serde(rename = "fat")]
    Fat,
    #[serde(rename = "trans_fat")]
    TransFat,
    #[serde(rename = "saturated_fat")]
    SaturatedFat,
    #[serde(rename = "carbohydrate")]
    Carbohydrate,
    #[serde(rename = "added_sugar")]
    AddedSugar,
    #[serde(rename = "salt")]
    Salt,
    #[serde(rename = "dietary_fiber")]
    DietaryFiber,
    #[serde(rename = "vitaminA")]
    VitaminA,
    #[serde(rename = "vitaminC")]
    VitaminC,
    #[serde(rename = "vitaminD")]
    VitaminD,
    #[serde(rename = "vitaminE")]
    VitaminE,
    #[serde(rename = "vitaminK")]
    VitaminK,
    #[serde(rename = "vitaminB1")]
    VitaminB1,
    #[serde(rename = "vitaminB2")]
    VitaminB2,
    #[serde(rename = "vitaminB6")]
    VitaminB6,
    #[serde(rename = "vitaminB12")]
    VitaminB12,
    #[serde(rename = "niacin")]
    Niacin,
    #[serde(rename = "folate")]
    Folate,
    #[serde(rename = "calcium")]
    Calcium,
    #[serde(rename = "iron")]
    Iron,
    #[serde(rename = "zinc")]
    Zinc,
    #[serde(rename = "magnesium")]
    Magnesium,
    #[serde(rename = "potassium")]
    Potassium,
    #[serde(rename = "sodium")]
    Sodium,
    #[serde(rename = "phosphorus")]
    Phosphorus,
    #[serde(rename = "iodine")]
    Iodine,
    #[serde(rename = "selenium")]
    Selenium,
}

impl NutrientKey {
    /// The nutrients carried on every meal record, in column order
    pub const TRACKED: [NutrientKey; 8] = [
        NutrientKey::Energy,
        NutrientKey::Protein,
        NutrientKey::TransFat,
        NutrientKey::SaturatedFat,
        NutrientKey::Carbohydrate,
        NutrientKey::AddedSugar,
        NutrientKey::Salt,
        NutrientKey::DietaryFiber,
    ];

    /// Every known nutrient key
    pub const ALL: [NutrientKey; 29] = [
        NutrientKey::Energy,
        NutrientKey::Protein,
        NutrientKey::Fat,
        NutrientKey::TransFat,
        NutrientKey::SaturatedFat,
        NutrientKey::Carbohydrate,
        NutrientKey::AddedSugar,
        NutrientKey::Salt,
        NutrientKey::DietaryFiber,
        NutrientKey::VitaminA,
        NutrientKey::VitaminC,
        NutrientKey::VitaminD,
        NutrientKey::VitaminE,
        NutrientKey::VitaminK,
        NutrientKey::VitaminB1,
        NutrientKey::VitaminB2,
        NutrientKey::VitaminB6,
        NutrientKey::VitaminB12,
        NutrientKey::Niacin,
        NutrientKey::Folate,
        NutrientKey::Calcium,
        NutrientKey::Iron,
        NutrientKey::Zinc,
        NutrientKey::Magnesium,
        NutrientKey::Potassium,
        NutrientKey::Sodium,
        NutrientKey::Phosphorus,
        NutrientKey::Iodine,
        NutrientKey::Selenium,
    ];

    /// Wire name, matching the meal-record field names
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Energy => "energy",
            NutrientKey::Protein => "protein",
            NutrientKey::Fat => "fat",
            NutrientKey::TransFat => "trans_fat",
            NutrientKey::SaturatedFat => "saturated_fat",
            NutrientKey::Carbohydrate => "carbohydrate",
            NutrientKey::AddedSugar => "added_sugar",
            NutrientKey::Salt => "salt",
            NutrientKey::DietaryFiber => "dietary_fiber",
            NutrientKey::VitaminA => "vitaminA",
            NutrientKey::VitaminC => "vitaminC",
            NutrientKey::VitaminD => "vitaminD",
            NutrientKey::VitaminE => "vitaminE",
            NutrientKey::VitaminK => "vitaminK",
            NutrientKey::VitaminB1 => "vitaminB1",
            NutrientKey::VitaminB2 => "vitaminB2",
            NutrientKey::VitaminB6 => "vitaminB6",
            NutrientKey::VitaminB12 => "vitaminB12",
            NutrientKey::Niacin => "niacin",
            NutrientKey::Folate => "folate",
            NutrientKey::Calcium => "calcium",
            NutrientKey::Iron => "iron",
            NutrientKey::Zinc => "zinc",
            NutrientKey::Magnesium => "magnesium",
            NutrientKey::Potassium => "potassium",
            NutrientKey::Sodium => "sodium",
            NutrientKey::Phosphorus => "phosphorus",
            NutrientKey::Iodine => "iodine",
            NutrientKey::Selenium => "selenium",
        }
    }

    /// Parse from a wire name
    pub fn from_str(s: &str) -> Option<Self> {
        NutrientKey::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

impl std::fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category a nutrient belongs to for grouped assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientCategory {
    Macronutrients,
    Vitamins,
    Minerals,
}

impl NutrientCategory {
    /// All categories in display order
    pub const ALL: [NutrientCategory; 3] = [
        NutrientCategory::Macronutrients,
        NutrientCategory::Vitamins,
        NutrientCategory::Minerals,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientCategory::Macronutrients => "macronutrients",
            NutrientCategory::Vitamins => "vitamins",
            NutrientCategory::Minerals => "minerals",
        }
    }

    /// The nutrient keys grouped under this category
    pub fn members(&self) -> &'static [NutrientKey] {
        match self {
            NutrientCategory::Macronutrients => &[
                NutrientKey::Energy,
                NutrientKey::Protein,
                NutrientKey::Fat,
                NutrientKey::Carbohydrate,
                NutrientKey::DietaryFiber,
            ],
            NutrientCategory::Vitamins => &[
                NutrientKey::VitaminA,
                NutrientKey::VitaminC,
                NutrientKey::VitaminD,
                NutrientKey::VitaminE,
                NutrientKey::VitaminK,
                NutrientKey::VitaminB1,
                NutrientKey::VitaminB2,
                NutrientKey::VitaminB6,
                NutrientKey::VitaminB12,
                NutrientKey::Niacin,
                NutrientKey::Folate,
            ],
            NutrientCategory::Minerals => &[
                NutrientKey::Calcium,
                NutrientKey::Iron,
                NutrientKey::Zinc,
                NutrientKey::Magnesium,
                NutrientKey::Potassium,
                NutrientKey::Sodium,
                NutrientKey::Phosphorus,
                NutrientKey::Iodine,
                NutrientKey::Selenium,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_str_round_trip() {
        for key in NutrientKey::ALL {
            assert_eq!(NutrientKey::from_str(key.as_str()), Some(key));
        }
        assert_eq!(NutrientKey::from_str("unobtainium"), None);
    }

    #[test]
    fn test_tracked_keys_subset_of_all() {
        for key in NutrientKey::TRACKED {
            assert!(NutrientKey::ALL.contains(&key));
        }
    }

    #[test]
    fn test_category_members_distinct() {
        let mut seen = std::collections::HashSet::new();
        for category in NutrientCategory::ALL {
            for key in category.members() {
                assert!(seen.insert(*key), "{} appears in two categories", key);
            }
        }
        // 5 macronutrients + 11 vitamins + 9 minerals
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&NutrientKey::VitaminB12).unwrap();
        assert_eq!(json, "\"vitaminB12\"");
        let json = serde_json::to_string(&NutrientKey::TransFat).unwrap();
        assert_eq!(json, "\"trans_fat\"");

        let key: NutrientKey = serde_json::from_str("\"dietary_fiber\"").unwrap();
        assert_eq!(key, NutrientKey::DietaryFiber);
    }
}
