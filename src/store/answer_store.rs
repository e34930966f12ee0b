use sqlx::PgConnection;
use uuid::Uuid;

use crate::dto::answer_dto::{CreateAnswerPayload, PatchAnswerPayload};
use crate::error::Result;
use crate::models::answer::Answer;

const COLUMNS: &str =
    "guid, question_guid, text, sub_text, is_correct, is_deleted, created, updated, created_by, updated_by";

pub struct AnswerStore;

impl AnswerStore {
    pub async fn count(conn: &mut PgConnection, guids: Option<&[Uuid]>) -> Result<i64> {
        let total = match guids {
            Some(guids) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(guid) FROM answer WHERE is_deleted = 0 AND guid = ANY($1)",
                )
                .bind(guids)
                .fetch_one(conn)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(guid) FROM answer WHERE is_deleted = 0")
                    .fetch_one(conn)
                    .await?
            }
        };
        Ok(total)
    }

    pub async fn exists(conn: &mut PgConnection, guid: Uuid) -> Result<bool> {
        let found = sqlx::query_scalar::<_, Uuid>(
            "SELECT guid FROM answer WHERE guid = $1 AND is_deleted = 0",
        )
        .bind(guid)
        .fetch_optional(conn)
        .await?;
        Ok(found.is_some())
    }

    pub async fn get_one(conn: &mut PgConnection, guid: Uuid) -> Result<Option<Answer>> {
        let sql = format!("SELECT {COLUMNS} FROM answer WHERE guid = $1 AND is_deleted = 0");
        let answer = sqlx::query_as::<_, Answer>(&sql)
            .bind(guid)
            .fetch_optional(conn)
            .await?;
        Ok(answer)
    }

    pub async fn get_multiple(
        conn: &mut PgConnection,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Answer>> {
        let answers = match guids {
            Some(guids) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM answer
                     WHERE is_deleted = 0 AND guid = ANY($1)
                     ORDER BY created, guid LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Answer>(&sql)
                    .bind(guids)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM answer
                     WHERE is_deleted = 0
                     ORDER BY created, guid LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Answer>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
        };
        Ok(answers)
    }

    pub async fn create(
        conn: &mut PgConnection,
        actor: Uuid,
        form: &CreateAnswerPayload,
    ) -> Result<Answer> {
        let sql = format!(
            "INSERT INTO answer (guid, question_guid, text, sub_text, is_correct, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {COLUMNS}"
        );
        let answer = sqlx::query_as::<_, Answer>(&sql)
            .bind(Uuid::new_v4())
            .bind(form.question_guid)
            .bind(&form.text)
            .bind(form.sub_text.as_deref())
            .bind(i32::from(form.is_correct))
            .bind(actor)
            .fetch_one(conn)
            .await?;
        Ok(answer)
    }

    pub async fn update(
        conn: &mut PgConnection,
        actor: Uuid,
        guid: Uuid,
        form: &CreateAnswerPayload,
    ) -> Result<Option<Answer>> {
        sqlx::query(
            "UPDATE answer
             SET question_guid = $1, text = $2, sub_text = $3, is_correct = $4,
                 updated_by = $5, updated = now()
             WHERE guid = $6",
        )
        .bind(form.question_guid)
        .bind(&form.text)
        .bind(form.sub_text.as_deref())
        .bind(i32::from(form.is_correct))
        .bind(actor)
        .bind(guid)
        .execute(&mut *conn)
        .await?;

        Self::get_one(conn, guid).await
    }

    pub async fn patch(
        conn: &mut PgConnection,
        actor: Uuid,
        guid: Uuid,
        form: &PatchAnswerPayload,
    ) -> Result<Option<Answer>> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 0usize;
        if form.question_guid.is_some() {
            idx += 1;
            sets.push(format!("question_guid = ${idx}"));
        }
        if form.text.is_some() {
            idx += 1;
            sets.push(format!("text = ${idx}"));
        }
        if form.sub_text.is_some() {
            idx += 1;
            sets.push(format!("sub_text = ${idx}"));
        }
        if form.is_correct.is_some() {
            idx += 1;
            sets.push(format!("is_correct = ${idx}"));
        }
        idx += 1;
        sets.push(format!("updated_by = ${idx}"));
        sets.push("updated = now()".to_string());
        let sql = format!(
            "UPDATE answer SET {} WHERE guid = ${}",
            sets.join(", "),
            idx + 1
        );

        let mut query = sqlx::query(&sql);
        if let Some(question_guid) = form.question_guid {
            query = query.bind(question_guid);
        }
        if let Some(text) = &form.text {
            query = query.bind(text);
        }
        if let Some(sub_text) = &form.sub_text {
            query = query.bind(sub_text.as_deref());
        }
        if let Some(is_correct) = form.is_correct {
            query = query.bind(i32::from(is_correct));
        }
        query.bind(actor).bind(guid).execute(&mut *conn).await?;

        Self::get_one(conn, guid).await
    }

    pub async fn delete(conn: &mut PgConnection, actor: Uuid, guid: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE answer SET is_deleted = 1, updated_by = $1, updated = now() WHERE guid = $2",
        )
        .bind(actor)
        .bind(guid)
        .execute(conn)
        .await?;
        Ok(())
    }
}
