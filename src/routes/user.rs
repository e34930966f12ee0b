use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::extract::Query;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        list::{pagination_headers, ListQuery},
        user_dto::{CreateUserPayload, PatchUserPayload, UserResponse},
    },
    error::Result,
    utils::validation::ValidatedJson,
    AppState,
};

#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/user",
    params(
        ("ids" = Option<Vec<Uuid>>, Query, description = "Restrict to these user ids"),
        ("limit" = Option<i64>, Query, description = "Page size, 1-1000"),
        ("offset" = Option<i64>, Query, description = "Offset from the start of the selection")
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 400, description = "Pagination bounds exceeded"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let count = state.user_service.count(query.ids()).await?;
    let users = state
        .user_service
        .get_multiple(query.ids(), query.limit, query.offset)
        .await?;
    let items: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok((
        pagination_headers(count, query.offset, query.limit),
        Json(items),
    ))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_one(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/user/email/{email}",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_email(&email).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = CreateUserPayload,
    responses(
        (status = 200, description = "User replaced", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = PatchUserPayload,
    responses(
        (status = 200, description = "User patched", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PatchUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.patch(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
