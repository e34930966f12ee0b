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
        question_dto::{CreateQuestionPayload, PatchQuestionPayload, QuestionResponse},
    },
    error::Result,
    utils::{token::Claims, validation::ValidatedJson},
    AppState,
};

#[utoipa::path(
    post,
    path = "/question",
    request_body = CreateQuestionPayload,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Referenced test not found")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    let question = state.question_service.create(claims.sub, payload).await?;
    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

#[utoipa::path(
    get,
    path = "/question",
    params(
        ("ids" = Option<Vec<Uuid>>, Query, description = "Restrict to these question ids"),
        ("limit" = Option<i64>, Query, description = "Page size, 1-1000"),
        ("offset" = Option<i64>, Query, description = "Offset from the start of the selection")
    ),
    responses(
        (status = 200, description = "List of questions", body = Vec<QuestionResponse>),
        (status = 400, description = "Pagination bounds exceeded"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let count = state.question_service.count(query.ids()).await?;
    let questions = state
        .question_service
        .get_multiple(query.ids(), query.limit, query.offset)
        .await?;
    let items: Vec<QuestionResponse> = questions.into_iter().map(Into::into).collect();
    Ok((
        pagination_headers(count, query.offset, query.limit),
        Json(items),
    ))
}

#[utoipa::path(
    get,
    path = "/question/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question found", body = QuestionResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let question = state.question_service.get_one(id).await?;
    Ok(Json(QuestionResponse::from(question)))
}

#[utoipa::path(
    put,
    path = "/question/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    request_body = CreateQuestionPayload,
    responses(
        (status = 200, description = "Question replaced", body = QuestionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    let question = state
        .question_service
        .update(claims.sub, id, payload)
        .await?;
    Ok(Json(QuestionResponse::from(question)))
}

#[utoipa::path(
    patch,
    path = "/question/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    request_body = PatchQuestionPayload,
    responses(
        (status = 200, description = "Question patched", body = QuestionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn patch_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PatchQuestionPayload>,
) -> Result<impl IntoResponse> {
    let question = state.question_service.patch(claims.sub, id, payload).await?;
    Ok(Json(QuestionResponse::from(question)))
}

#[utoipa::path(
    delete,
    path = "/question/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.question_service.delete(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
