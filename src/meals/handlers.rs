use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::macros::format_description;
use time::Date;
use tracing::{instrument, warn};

use crate::app::method_not_allowed;
use crate::error::ApiError;
use crate::meals::dto::{
    FoodDbResponse, LogMealRequest, LoggedMealResponse, MealHistoryResponse, NutritionStatus,
    WebhookRequest,
};
use crate::meals::{parser, services};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/:user", get(get_meals).fallback(method_not_allowed))
        .route(
            "/meals/:user/:date",
            get(get_meals_by_date).fallback(method_not_allowed),
        )
        .route("/status/:user", get(get_status).fallback(method_not_allowed))
        .route("/food_db", get(get_food_db).fallback(method_not_allowed))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/log_meals", post(log_meals).fallback(method_not_allowed))
        .route("/webhook", post(webhook).fallback(method_not_allowed))
}

#[instrument(skip(state, payload))]
pub async fn log_meals(
    State(state): State<AppState>,
    Json(payload): Json<LogMealRequest>,
) -> Result<(StatusCode, Json<LoggedMealResponse>), ApiError> {
    let user = required(payload.user, "user")?;
    let meal = required(payload.meal, "meal")?;
    let items = payload
        .items
        .ok_or_else(|| ApiError::InvalidInput("items is required".to_string()))?;

    let entry = services::log_meal(&state, user.trim(), &meal, &items).await?;
    Ok((
        StatusCode::CREATED,
        Json(LoggedMealResponse {
            message: "Meal logged successfully".to_string(),
            meal: entry,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_meals(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<MealHistoryResponse>, ApiError> {
    if !state.users.exists(&user).await {
        return Err(ApiError::UserNotFound(user));
    }
    let meals = state.meals.get_all(&user).await;
    Ok(Json(MealHistoryResponse {
        user,
        date: None,
        total_meals: meals.len(),
        meals,
    }))
}

#[instrument(skip(state))]
pub async fn get_meals_by_date(
    State(state): State<AppState>,
    Path((user, date)): Path<(String, String)>,
) -> Result<Json<MealHistoryResponse>, ApiError> {
    if !state.users.exists(&user).await {
        return Err(ApiError::UserNotFound(user));
    }
    let format = format_description!("[year]-[month]-[day]");
    let day = Date::parse(&date, &format).map_err(|e| {
        warn!(date = %date, error = %e, "unparseable date segment");
        ApiError::BadDate(date.clone())
    })?;

    let meals = state.meals.get_by_date(&user, day).await;
    Ok(Json(MealHistoryResponse {
        user,
        date: Some(date),
        total_meals: meals.len(),
        meals,
    }))
}

#[instrument(skip(state))]
pub async fn get_status(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<NutritionStatus>, ApiError> {
    let status = services::nutrition_status(&state, &user).await?;
    Ok(Json(status))
}

#[instrument(skip(state, payload))]
pub async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookRequest>,
) -> Result<(StatusCode, Json<LoggedMealResponse>), ApiError> {
    let user = required(payload.user, "user")?;
    let message = required(payload.message, "message")?;

    let (meal_type, items) = parser::parse_meal_message(&message)?;
    let entry = services::log_meal(&state, user.trim(), &meal_type, &items).await?;
    Ok((
        StatusCode::CREATED,
        Json(LoggedMealResponse {
            message: format!("Meal logged successfully for {}", user.trim()),
            meal: entry,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_food_db(State(state): State<AppState>) -> Json<FoodDbResponse> {
    Json(FoodDbResponse {
        total_items: state.catalog.len(),
        food_items: state.catalog.items().clone(),
    })
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::InvalidInput(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo::MealType;
    use crate::users::bmr::Gender;
    use crate::users::repo::UserProfile;
    use time::OffsetDateTime;

    async fn state_with_user(name: &str) -> AppState {
        let state = AppState::fake().await;
        state
            .users
            .create(UserProfile {
                name: name.to_string(),
                age: 25,
                weight_kg: 70.0,
                height_cm: 175.0,
                gender: Gender::Male,
                goal: "maintain".to_string(),
                bmr: 1724.05,
                registered_at: OffsetDateTime::now_utc(),
            })
            .await
            .expect("create user");
        state
    }

    #[tokio::test]
    async fn log_meals_requires_every_field() {
        let state = state_with_user("ravi").await;
        let payload = LogMealRequest {
            user: Some("ravi".into()),
            meal: None,
            items: Some(vec!["Dal".into()]),
        };
        let err = log_meals(State(state), Json(payload)).await.unwrap_err();
        assert!(err.to_string().contains("meal is required"));
    }

    #[tokio::test]
    async fn webhook_equals_direct_logging() {
        let state = state_with_user("ravi").await;
        let payload = WebhookRequest {
            user: Some("ravi".into()),
            message: Some("log lunch: Jeera Rice, Dal".into()),
        };
        let (status, Json(body)) = webhook(State(state.clone()), Json(payload))
            .await
            .expect("webhook");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.meal.meal_type, MealType::Lunch);
        assert_eq!(body.meal.nutrition.calories, 430.0);
        assert_eq!(state.meals.get_all("ravi").await.len(), 1);
    }

    #[tokio::test]
    async fn webhook_rejects_unknown_users() {
        let state = AppState::fake().await;
        let payload = WebhookRequest {
            user: Some("nobody".into()),
            message: Some("log lunch: Dal".into()),
        };
        let err = webhook(State(state.clone()), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(_)));
        assert!(state.meals.get_all("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn meal_history_is_date_scoped() {
        let state = state_with_user("ravi").await;
        services::log_meal(&state, "ravi", "lunch", &["Dal".to_string()])
            .await
            .expect("log");

        let today = OffsetDateTime::now_utc()
            .date()
            .format(&format_description!("[year]-[month]-[day]"))
            .expect("format");
        let Json(body) = get_meals_by_date(State(state.clone()), Path(("ravi".into(), today)))
            .await
            .expect("by date");
        assert_eq!(body.total_meals, 1);

        let Json(body) = get_meals_by_date(
            State(state),
            Path(("ravi".into(), "1999-01-01".into())),
        )
        .await
        .expect("by date");
        assert_eq!(body.total_meals, 0);
    }

    #[tokio::test]
    async fn bad_date_segment_is_rejected() {
        let state = state_with_user("ravi").await;
        let err = get_meals_by_date(
            State(state),
            Path(("ravi".into(), "08-08-2026".into())),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadDate(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn meal_history_for_unknown_user_is_not_found() {
        let state = AppState::fake().await;
        let err = get_meals(State(state), Path("nobody".into())).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn food_db_lists_the_whole_catalog() {
        let state = AppState::fake().await;
        let Json(body) = get_food_db(State(state)).await;
        assert_eq!(body.total_items, 8);
        assert!(body.food_items.contains_key("Jeera Rice"));
    }
}
