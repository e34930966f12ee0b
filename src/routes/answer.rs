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
        answer_dto::{AnswerResponse, CreateAnswerPayload, PatchAnswerPayload},
        list::{pagination_headers, ListQuery},
    },
    error::Result,
    utils::{token::Claims, validation::ValidatedJson},
    AppState,
};

#[utoipa::path(
    post,
    path = "/answer",
    request_body = CreateAnswerPayload,
    responses(
        (status = 201, description = "Answer created", body = AnswerResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Referenced question not found")
    )
)]
#[axum::debug_handler]
pub async fn create_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateAnswerPayload>,
) -> Result<impl IntoResponse> {
    let answer = state.answer_service.create(claims.sub, payload).await?;
    Ok((StatusCode::CREATED, Json(AnswerResponse::from(answer))))
}

#[utoipa::path(
    get,
    path = "/answer",
    params(
        ("ids" = Option<Vec<Uuid>>, Query, description = "Restrict to these answer ids"),
        ("limit" = Option<i64>, Query, description = "Page size, 1-1000"),
        ("offset" = Option<i64>, Query, description = "Offset from the start of the selection")
    ),
    responses(
        (status = 200, description = "List of answers", body = Vec<AnswerResponse>),
        (status = 400, description = "Pagination bounds exceeded"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn list_answers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let count = state.answer_service.count(query.ids()).await?;
    let answers = state
        .answer_service
        .get_multiple(query.ids(), query.limit, query.offset)
        .await?;
    let items: Vec<AnswerResponse> = answers.into_iter().map(Into::into).collect();
    Ok((
        pagination_headers(count, query.offset, query.limit),
        Json(items),
    ))
}

#[utoipa::path(
    get,
    path = "/answer/{id}",
    params(
        ("id" = Uuid, Path, description = "Answer id")
    ),
    responses(
        (status = 200, description = "Answer found", body = AnswerResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Answer not found")
    )
)]
#[axum::debug_handler]
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let answer = state.answer_service.get_one(id).await?;
    Ok(Json(AnswerResponse::from(answer)))
}

#[utoipa::path(
    put,
    path = "/answer/{id}",
    params(
        ("id" = Uuid, Path, description = "Answer id")
    ),
    request_body = CreateAnswerPayload,
    responses(
        (status = 200, description = "Answer replaced", body = AnswerResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Answer not found")
    )
)]
#[axum::debug_handler]
pub async fn update_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateAnswerPayload>,
) -> Result<impl IntoResponse> {
    let answer = state.answer_service.update(claims.sub, id, payload).await?;
    Ok(Json(AnswerResponse::from(answer)))
}

#[utoipa::path(
    patch,
    path = "/answer/{id}",
    params(
        ("id" = Uuid, Path, description = "Answer id")
    ),
    request_body = PatchAnswerPayload,
    responses(
        (status = 200, description = "Answer patched", body = AnswerResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Answer not found")
    )
)]
#[axum::debug_handler]
pub async fn patch_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PatchAnswerPayload>,
) -> Result<impl IntoResponse> {
    let answer = state.answer_service.patch(claims.sub, id, payload).await?;
    Ok(Json(AnswerResponse::from(answer)))
}

#[utoipa::path(
    delete,
    path = "/answer/{id}",
    params(
        ("id" = Uuid, Path, description = "Answer id")
    ),
    responses(
        (status = 204, description = "Answer deleted"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Answer not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.answer_service.delete(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
