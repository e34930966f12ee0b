use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::question_dto::QuestionResponse;
use crate::models::test::TestWithQuestions;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTestPayload {
    #[validate(length(min = 1))]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PatchTestPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<QuestionResponse>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl From<TestWithQuestions> for TestResponse {
    fn from(value: TestWithQuestions) -> Self {
        Self {
            id: value.test.guid,
            title: value.test.title,
            questions: value.questions.into_iter().map(Into::into).collect(),
            created: value.test.created.trunc_subsecs(0),
            updated: value.test.updated.trunc_subsecs(0),
            created_by: value.test.created_by,
            updated_by: value.test.updated_by,
        }
    }
}
