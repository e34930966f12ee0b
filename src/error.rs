use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::collections::BTreeSet;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error envelope shared by every non-2xx response: a top-level message plus
/// a list of structured sub-errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            message: message.into(),
            errors: errors
                .into_iter()
                .map(|message| ErrorMessage { message })
                .collect(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Request could not be processed", vec![msg]),
            ),
            Error::Unauthorized(msg) => {
                let body = ErrorBody::new("Authorization failed", vec![msg]);
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(body),
                )
                    .into_response();
            }
            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("Resource not found", vec![msg]),
            ),
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Request validation failed", validation_messages(&errors)),
            ),
            Error::Json(err) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Request could not be processed", vec![err.to_string()]),
            ),
            other => {
                tracing::error!(error = %other, "unhandled error");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_body(&other))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(debug_assertions)]
fn internal_body(error: &Error) -> ErrorBody {
    ErrorBody::new("An unexpected error occurred", vec![error.to_string()])
}

#[cfg(not(debug_assertions))]
fn internal_body(_error: &Error) -> ErrorBody {
    ErrorBody::new("An unexpected error occurred", Vec::new())
}

fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let unique: BTreeSet<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors
                .iter()
                .map(move |error| format!("Field {} has an invalid value ({})", field, error.code))
        })
        .collect();
    unique.into_iter().collect()
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value as JsonValue;

    async fn body_json(response: axum::response::Response) -> JsonValue {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let response = Error::Unauthorized("invalid token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["message"], "invalid token");
    }

    #[tokio::test]
    async fn not_found_uses_envelope() {
        let response = Error::NotFound("Test 42 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Resource not found");
        assert_eq!(body["errors"][0]["message"], "Test 42 not found");
    }

    #[tokio::test]
    async fn validation_errors_are_deduplicated() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1))]
            title: String,
        }

        let errors = Payload {
            title: String::new(),
        }
        .validate()
        .unwrap_err();
        let response = Error::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Request validation failed");
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }
}
