use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{Error, Result};
use crate::utils::token;
use crate::AppState;

/// Gate for every protected route: validates the bearer token and makes the
/// claims available to handlers as the acting user. Failures answer 401 with
/// a `WWW-Authenticate: Bearer` challenge via the error envelope.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Missing Authorization header".to_string()))?;
    let header = header
        .to_str()
        .map_err(|_| Error::Unauthorized("Malformed Authorization header".to_string()))?;
    let bearer = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("Unsupported authorization scheme".to_string()))?;

    let claims = token::decode_claims(bearer, &state.config)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
