use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).fallback(method_not_allowed))
        .merge(crate::users::router())
        .merge(crate::meals::router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Nutrition Tracker API is running",
        "endpoints": [
            "POST /register - Register a new user",
            "POST /log_meals - Log a meal",
            "GET /meals/{user} - Get a user's meal history",
            "GET /meals/{user}/{date} - Get a user's meals for a date (YYYY-MM-DD)",
            "GET /status/{user} - Get a user's nutrition status",
            "POST /webhook - Log a meal from a free-text message",
            "GET /food_db - List available food items"
        ]
    }))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn index_lists_every_endpoint() {
        let Json(body) = index().await;
        let endpoints = body["endpoints"].as_array().expect("endpoints");
        assert_eq!(endpoints.len(), 7);
    }
}
