use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::Answer;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerPayload {
    pub question_guid: Uuid,
    #[validate(length(min = 1))]
    pub text: String,
    pub sub_text: Option<String>,
    pub is_correct: bool,
}

/// Patch form with presence flags: an omitted field is left untouched, while
/// `"subText": null` explicitly clears the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchAnswerPayload {
    pub question_guid: Option<Uuid>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub sub_text: Option<Option<String>>,
    pub is_correct: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_guid: Uuid,
    pub text: String,
    pub sub_text: Option<String>,
    pub is_correct: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl From<Answer> for AnswerResponse {
    fn from(value: Answer) -> Self {
        Self {
            id: value.guid,
            question_guid: value.question_guid,
            text: value.text,
            sub_text: value.sub_text,
            is_correct: value.is_correct != 0,
            created: value.created.trunc_subsecs(0),
            updated: value.updated.trunc_subsecs(0),
            created_by: value.created_by,
            updated_by: value.updated_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_sub_text_is_distinguished_from_null() {
        let omitted: PatchAnswerPayload = serde_json::from_str(r#"{"text": "A"}"#).unwrap();
        assert_eq!(omitted.sub_text, None);

        let cleared: PatchAnswerPayload = serde_json::from_str(r#"{"subText": null}"#).unwrap();
        assert_eq!(cleared.sub_text, Some(None));

        let set: PatchAnswerPayload = serde_json::from_str(r#"{"subText": "hint"}"#).unwrap();
        assert_eq!(set.sub_text, Some(Some("hint".to_string())));
    }

    #[test]
    fn is_correct_is_boolean_on_the_wire() {
        let answer = Answer {
            guid: Uuid::new_v4(),
            question_guid: Uuid::new_v4(),
            text: "A".into(),
            sub_text: None,
            is_correct: 1,
            is_deleted: 0,
            created: Utc::now(),
            updated: Utc::now(),
            created_by: Uuid::new_v4(),
            updated_by: Uuid::new_v4(),
        };
        let body = serde_json::to_value(AnswerResponse::from(answer)).unwrap();
        assert_eq!(body["isCorrect"], serde_json::Value::Bool(true));
        assert!(body.get("isDeleted").is_none());
    }
}
