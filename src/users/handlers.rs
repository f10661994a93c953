use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::app::method_not_allowed;
use crate::catalog::round2;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::bmr::compute_bmr;
use crate::users::dto::{RegisterRequest, RegisteredResponse};
use crate::users::repo::UserProfile;

pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(register).fallback(method_not_allowed))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), ApiError> {
    let new_user = payload.validate().map_err(|e| {
        warn!(error = %e, "register validation failed");
        e
    })?;

    let bmr = compute_bmr(
        new_user.gender,
        new_user.weight_kg,
        new_user.height_cm,
        f64::from(new_user.age),
    );

    let profile = UserProfile {
        name: new_user.name,
        age: new_user.age,
        weight_kg: new_user.weight_kg,
        height_cm: new_user.height_cm,
        gender: new_user.gender,
        goal: new_user.goal,
        bmr: round2(bmr),
        registered_at: OffsetDateTime::now_utc(),
    };

    let profile = state.users.create(profile).await?;
    info!(user = %profile.name, bmr = profile.bmr, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "User registered successfully".to_string(),
            user: profile,
        }),
    ))
}
