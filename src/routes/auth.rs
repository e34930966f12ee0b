use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::{
    dto::auth_dto::{AuthQuery, TokenResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/auth",
    params(
        ("token" = String, Query, description = "Google OAuth2 ID token")
    ),
    responses(
        (status = 200, description = "Session token issued", body = TokenResponse),
        (status = 401, description = "Identity token rejected")
    )
)]
#[axum::debug_handler]
pub async fn auth(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Result<Json<TokenResponse>> {
    let token = state.auth_service.login(&query.token).await?;
    Ok(Json(token))
}
