use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::AppState;

/// Liveness of the storage layer, probed with a trivial schema-version query.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 204, description = "Service is available"),
        (status = 503, description = "Storage is unreachable")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let probe =
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations ORDER BY version DESC LIMIT 1")
            .fetch_optional(&state.pool)
            .await;

    match probe {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(error) => {
            tracing::warn!(%error, "health probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
