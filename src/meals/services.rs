use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use crate::catalog::Nutrition;
use crate::error::ApiError;
use crate::meals::dto::NutritionStatus;
use crate::meals::repo::{MealEntry, MealType};
use crate::state::AppState;

/// The meal-logging pipeline: validate, resolve every item against the
/// catalog, sum nutrition, append, persist. Fails on the first violation;
/// a failure leaves the meal log untouched.
pub async fn log_meal(
    state: &AppState,
    user_name: &str,
    meal_type: &str,
    food_names: &[String],
) -> Result<MealEntry, ApiError> {
    if food_names.is_empty() || food_names.iter().any(|n| n.trim().is_empty()) {
        return Err(ApiError::InvalidInput(
            "items must be a non-empty list of food names".to_string(),
        ));
    }

    let meal_type = MealType::parse(meal_type)
        .ok_or_else(|| ApiError::InvalidMealType(meal_type.trim().to_string()))?;

    if !state.users.exists(user_name).await {
        return Err(ApiError::UserNotFound(user_name.to_string()));
    }

    let mut nutrition = Nutrition::default();
    for name in food_names {
        let food = state
            .catalog
            .lookup(name)
            .ok_or_else(|| ApiError::FoodNotFound(name.clone()))?;
        nutrition.add(food);
    }

    let entry = MealEntry {
        meal_type,
        items: food_names.to_vec(),
        logged_at: OffsetDateTime::now_utc(),
        nutrition,
    };
    state.meals.append(user_name, entry.clone()).await?;

    info!(
        user = %user_name,
        meal = %meal_type,
        items = food_names.len(),
        calories = nutrition.calories,
        "meal logged"
    );
    Ok(entry)
}

/// Aggregates a user's log into all-time and today (UTC) totals.
pub async fn nutrition_status(
    state: &AppState,
    user_name: &str,
) -> Result<NutritionStatus, ApiError> {
    let profile = state
        .users
        .get(user_name)
        .await
        .ok_or_else(|| ApiError::UserNotFound(user_name.to_string()))?;

    let entries = state.meals.get_all(user_name).await;
    let today = OffsetDateTime::now_utc().date();

    let mut total = Nutrition::default();
    let mut today_total = Nutrition::default();
    let mut meal_count_today = 0;
    for entry in &entries {
        total.add(&entry.nutrition);
        if entry.logged_at.date() == today {
            today_total.add(&entry.nutrition);
            meal_count_today += 1;
        }
    }

    let date_format = format_description!("[year]-[month]-[day]");
    Ok(NutritionStatus {
        user: profile.name,
        bmr: profile.bmr,
        goal: profile.goal,
        date: today.format(&date_format).map_err(anyhow::Error::from)?,
        total_nutrition: total.rounded(),
        today_nutrition: today_total.rounded(),
        meal_count_total: entries.len(),
        meal_count_today,
    })
}
