use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::answer::Answer;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub guid: Uuid,
    pub test_guid: Uuid,
    pub title: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_deleted: i32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}
