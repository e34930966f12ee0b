use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::answer_dto::AnswerResponse;
use crate::models::question::QuestionWithAnswers;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionPayload {
    pub test_guid: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchQuestionPayload {
    pub test_guid: Option<Uuid>,
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub test_guid: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub answers: Vec<AnswerResponse>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl From<QuestionWithAnswers> for QuestionResponse {
    fn from(value: QuestionWithAnswers) -> Self {
        Self {
            id: value.question.guid,
            test_guid: value.question.test_guid,
            title: value.question.title,
            kind: value.question.kind,
            answers: value.answers.into_iter().map(Into::into).collect(),
            created: value.question.created.trunc_subsecs(0),
            updated: value.question.updated.trunc_subsecs(0),
            created_by: value.question.created_by,
            updated_by: value.question.updated_by,
        }
    }
}
