use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub guid: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_deleted: i32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
