use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub guid: Uuid,
    pub question_guid: Uuid,
    pub text: String,
    pub sub_text: Option<String>,
    pub is_correct: i32,
    pub is_deleted: i32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}
