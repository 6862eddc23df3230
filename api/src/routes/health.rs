use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use util::state::AppState;

use crate::response::ApiResponse;

/// Builds the `/health` route group (public).
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Reports that the API is up and the database answers a ping.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": "OK", "message": "Health check passed" }
/// ```
/// - `503 Service Unavailable` when the database cannot be reached
async fn health_check(State(app_state): State<AppState>) -> Response {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success("DEGRADED", "Database unreachable")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use axum::body::to_bytes;
    use axum::extract::State;
    use db::test_utils::setup_test_db;
    use serde_json::Value;
    use util::state::AppState;

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let state = AppState::new(setup_test_db().await);
        let response = health_check(State(state)).await;
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert_eq!(json["message"], "Health check passed");
    }
}
