use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Nutrition;
use crate::meals::repo::MealEntry;

/// Raw body for POST /log_meals; presence is checked in the handler so the
/// response can name the missing field.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogMealRequest {
    pub user: Option<String>,
    pub meal: Option<String>,
    pub items: Option<Vec<String>>,
}

/// Raw body for POST /webhook.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookRequest {
    pub user: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoggedMealResponse {
    pub message: String,
    pub meal: MealEntry,
}

#[derive(Debug, Serialize)]
pub struct MealHistoryResponse {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub total_meals: usize,
    pub meals: Vec<MealEntry>,
}

/// All-time and same-day nutrition summary for one user.
#[derive(Debug, Serialize)]
pub struct NutritionStatus {
    pub user: String,
    pub bmr: f64,
    pub goal: String,
    pub date: String,
    pub total_nutrition: Nutrition,
    pub today_nutrition: Nutrition,
    pub meal_count_total: usize,
    pub meal_count_today: usize,
}

#[derive(Debug, Serialize)]
pub struct FoodDbResponse {
    pub total_items: usize,
    pub food_items: BTreeMap<String, Nutrition>,
}
