use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use axum_extra::extract::Query;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        list::{pagination_headers, ListQuery},
        test_dto::{CreateTestPayload, PatchTestPayload, TestResponse},
    },
    error::Result,
    utils::{token::Claims, validation::ValidatedJson},
    AppState,
};

#[utoipa::path(
    post,
    path = "/test",
    request_body = CreateTestPayload,
    responses(
        (status = 201, description = "Test created", body = TestResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateTestPayload>,
) -> Result<impl IntoResponse> {
    let test = state.test_service.create(claims.sub, payload).await?;
    Ok((StatusCode::CREATED, Json(TestResponse::from(test))))
}

#[utoipa::path(
    get,
    path = "/test",
    params(
        ("ids" = Option<Vec<Uuid>>, Query, description = "Restrict to these test ids"),
        ("limit" = Option<i64>, Query, description = "Page size, 1-1000"),
        ("offset" = Option<i64>, Query, description = "Offset from the start of the selection")
    ),
    responses(
        (status = 200, description = "List of tests", body = Vec<TestResponse>),
        (status = 400, description = "Pagination bounds exceeded"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let count = state.test_service.count(query.ids()).await?;
    let tests = state
        .test_service
        .get_multiple(query.ids(), query.limit, query.offset)
        .await?;
    let items: Vec<TestResponse> = tests.into_iter().map(Into::into).collect();
    Ok((
        pagination_headers(count, query.offset, query.limit),
        Json(items),
    ))
}

#[utoipa::path(
    get,
    path = "/test/{id}",
    params(
        ("id" = Uuid, Path, description = "Test id")
    ),
    responses(
        (status = 200, description = "Test found", body = TestResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Test not found")
    )
)]
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let test = state.test_service.get_one(id).await?;
    Ok(Json(TestResponse::from(test)))
}

#[utoipa::path(
    put,
    path = "/test/{id}",
    params(
        ("id" = Uuid, Path, description = "Test id")
    ),
    request_body = CreateTestPayload,
    responses(
        (status = 200, description = "Test replaced", body = TestResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Test not found")
    )
)]
#[axum::debug_handler]
pub async fn update_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateTestPayload>,
) -> Result<impl IntoResponse> {
    let test = state.test_service.update(claims.sub, id, payload).await?;
    Ok(Json(TestResponse::from(test)))
}

#[utoipa::path(
    patch,
    path = "/test/{id}",
    params(
        ("id" = Uuid, Path, description = "Test id")
    ),
    request_body = PatchTestPayload,
    responses(
        (status = 200, description = "Test patched", body = TestResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Test not found")
    )
)]
#[axum::debug_handler]
pub async fn patch_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PatchTestPayload>,
) -> Result<impl IntoResponse> {
    let test = state.test_service.patch(claims.sub, id, payload).await?;
    Ok(Json(TestResponse::from(test)))
}

#[utoipa::path(
    delete,
    path = "/test/{id}",
    params(
        ("id" = Uuid, Path, description = "Test id")
    ),
    responses(
        (status = 204, description = "Test deleted"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Test not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.test_service.delete(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
