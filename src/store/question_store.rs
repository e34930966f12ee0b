use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::dto::question_dto::{CreateQuestionPayload, PatchQuestionPayload};
use crate::error::Result;
use crate::models::answer::Answer;
use crate::models::question::{Question, QuestionWithAnswers};

const COLUMNS: &str =
    "guid, test_guid, title, type, is_deleted, created, updated, created_by, updated_by";

/// Flat row of the question ⨯ live-answer left join. Answer columns are
/// nullable because a live question may have no live answers.
#[derive(Debug, FromRow)]
struct QuestionAnswerRow {
    guid: Uuid,
    test_guid: Uuid,
    title: String,
    kind: String,
    is_deleted: i32,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    created_by: Uuid,
    updated_by: Uuid,
    a_guid: Option<Uuid>,
    a_question_guid: Option<Uuid>,
    a_text: Option<String>,
    a_sub_text: Option<String>,
    a_is_correct: Option<i32>,
    a_created: Option<DateTime<Utc>>,
    a_updated: Option<DateTime<Utc>>,
    a_created_by: Option<Uuid>,
    a_updated_by: Option<Uuid>,
}

const JOINED_COLUMNS: &str = "q.guid, q.test_guid, q.title, q.type AS kind, q.is_deleted, \
     q.created, q.updated, q.created_by, q.updated_by, \
     a.guid AS a_guid, a.question_guid AS a_question_guid, a.text AS a_text, \
     a.sub_text AS a_sub_text, a.is_correct AS a_is_correct, a.created AS a_created, \
     a.updated AS a_updated, a.created_by AS a_created_by, a.updated_by AS a_updated_by";

pub struct QuestionStore;

impl QuestionStore {
    pub async fn count(conn: &mut PgConnection, guids: Option<&[Uuid]>) -> Result<i64> {
        let total = match guids {
            Some(guids) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(guid) FROM question WHERE is_deleted = 0 AND guid = ANY($1)",
                )
                .bind(guids)
                .fetch_one(conn)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(guid) FROM question WHERE is_deleted = 0",
                )
                .fetch_one(conn)
                .await?
            }
        };
        Ok(total)
    }

    pub async fn exists(conn: &mut PgConnection, guid: Uuid) -> Result<bool> {
        let found = sqlx::query_scalar::<_, Uuid>(
            "SELECT guid FROM question WHERE guid = $1 AND is_deleted = 0",
        )
        .bind(guid)
        .fetch_optional(conn)
        .await?;
        Ok(found.is_some())
    }

    pub async fn get_one(
        conn: &mut PgConnection,
        guid: Uuid,
    ) -> Result<Option<QuestionWithAnswers>> {
        let sql = format!(
            "SELECT {JOINED_COLUMNS} FROM question q
             LEFT JOIN answer a ON a.question_guid = q.guid AND a.is_deleted = 0
             WHERE q.guid = $1 AND q.is_deleted = 0
             ORDER BY a.created, a.guid"
        );
        let rows = sqlx::query_as::<_, QuestionAnswerRow>(&sql)
            .bind(guid)
            .fetch_all(conn)
            .await?;
        Ok(group_answers(rows).into_iter().next())
    }

    pub async fn get_multiple(
        conn: &mut PgConnection,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuestionWithAnswers>> {
        // Pagination applies to questions, not to join rows, so the page
        // window stays disjoint and exhaustive however many answers each
        // question carries.
        let rows = match guids {
            Some(guids) => {
                let sql = format!(
                    "SELECT {JOINED_COLUMNS} FROM (
                         SELECT * FROM question WHERE is_deleted = 0 AND guid = ANY($1)
                         ORDER BY created, guid LIMIT $2 OFFSET $3
                     ) q
                     LEFT JOIN answer a ON a.question_guid = q.guid AND a.is_deleted = 0
                     ORDER BY q.created, q.guid, a.created, a.guid"
                );
                sqlx::query_as::<_, QuestionAnswerRow>(&sql)
                    .bind(guids)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {JOINED_COLUMNS} FROM (
                         SELECT * FROM question WHERE is_deleted = 0
                         ORDER BY created, guid LIMIT $1 OFFSET $2
                     ) q
                     LEFT JOIN answer a ON a.question_guid = q.guid AND a.is_deleted = 0
                     ORDER BY q.created, q.guid, a.created, a.guid"
                );
                sqlx::query_as::<_, QuestionAnswerRow>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
        };
        Ok(group_answers(rows))
    }

    /// Live questions of the given tests, each hydrated with its live
    /// answers and grouped by owning test.
    pub async fn for_tests(
        conn: &mut PgConnection,
        test_guids: &[Uuid],
    ) -> Result<Vec<QuestionWithAnswers>> {
        if test_guids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {JOINED_COLUMNS} FROM question q
             LEFT JOIN answer a ON a.question_guid = q.guid AND a.is_deleted = 0
             WHERE q.test_guid = ANY($1) AND q.is_deleted = 0
             ORDER BY q.created, q.guid, a.created, a.guid"
        );
        let rows = sqlx::query_as::<_, QuestionAnswerRow>(&sql)
            .bind(test_guids)
            .fetch_all(conn)
            .await?;
        Ok(group_answers(rows))
    }

    pub async fn create(
        conn: &mut PgConnection,
        actor: Uuid,
        form: &CreateQuestionPayload,
    ) -> Result<Question> {
        let sql = format!(
            "INSERT INTO question (guid, test_guid, title, type, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {COLUMNS}"
        );
        let question = sqlx::query_as::<_, Question>(&sql)
            .bind(Uuid::new_v4())
            .bind(form.test_guid)
            .bind(&form.title)
            .bind(&form.kind)
            .bind(actor)
            .fetch_one(conn)
            .await?;
        Ok(question)
    }

    pub async fn update(
        conn: &mut PgConnection,
        actor: Uuid,
        guid: Uuid,
        form: &CreateQuestionPayload,
    ) -> Result<Option<QuestionWithAnswers>> {
        sqlx::query(
            "UPDATE question
             SET test_guid = $1, title = $2, type = $3, updated_by = $4, updated = now()
             WHERE guid = $5",
        )
        .bind(form.test_guid)
        .bind(&form.title)
        .bind(&form.kind)
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
        form: &PatchQuestionPayload,
    ) -> Result<Option<QuestionWithAnswers>> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 0usize;
        if form.test_guid.is_some() {
            idx += 1;
            sets.push(format!("test_guid = ${idx}"));
        }
        if form.title.is_some() {
            idx += 1;
            sets.push(format!("title = ${idx}"));
        }
        if form.kind.is_some() {
            idx += 1;
            sets.push(format!("type = ${idx}"));
        }
        idx += 1;
        sets.push(format!("updated_by = ${idx}"));
        sets.push("updated = now()".to_string());
        let sql = format!(
            "UPDATE question SET {} WHERE guid = ${}",
            sets.join(", "),
            idx + 1
        );

        let mut query = sqlx::query(&sql);
        if let Some(test_guid) = form.test_guid {
            query = query.bind(test_guid);
        }
        if let Some(title) = &form.title {
            query = query.bind(title);
        }
        if let Some(kind) = &form.kind {
            query = query.bind(kind);
        }
        query.bind(actor).bind(guid).execute(&mut *conn).await?;

        Self::get_one(conn, guid).await
    }

    pub async fn delete(conn: &mut PgConnection, actor: Uuid, guid: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE question SET is_deleted = 1, updated_by = $1, updated = now() WHERE guid = $2",
        )
        .bind(actor)
        .bind(guid)
        .execute(conn)
        .await?;
        Ok(())
    }
}

/// Collapse join rows into questions: duplicate parent rows (one per answer)
/// fold into a single question, a row with null answer columns into a
/// question with no answers. Relies on the query ordering by question key.
fn group_answers(rows: Vec<QuestionAnswerRow>) -> Vec<QuestionWithAnswers> {
    let mut questions: Vec<QuestionWithAnswers> = Vec::new();
    for row in rows {
        let parent_is_current =
            questions.last().map(|entry| entry.question.guid) == Some(row.guid);
        if !parent_is_current {
            questions.push(QuestionWithAnswers {
                question: Question {
                    guid: row.guid,
                    test_guid: row.test_guid,
                    title: row.title.clone(),
                    kind: row.kind.clone(),
                    is_deleted: row.is_deleted,
                    created: row.created,
                    updated: row.updated,
                    created_by: row.created_by,
                    updated_by: row.updated_by,
                },
                answers: Vec::new(),
            });
        }

        let answer = match (
            row.a_guid,
            row.a_question_guid,
            row.a_text,
            row.a_is_correct,
            row.a_created,
            row.a_updated,
            row.a_created_by,
            row.a_updated_by,
        ) {
            (
                Some(guid),
                Some(question_guid),
                Some(text),
                Some(is_correct),
                Some(created),
                Some(updated),
                Some(created_by),
                Some(updated_by),
            ) => Some(Answer {
                guid,
                question_guid,
                text,
                sub_text: row.a_sub_text,
                is_correct,
                is_deleted: 0,
                created,
                updated,
                created_by,
                updated_by,
            }),
            _ => None,
        };

        if let (Some(answer), Some(entry)) = (answer, questions.last_mut()) {
            entry.answers.push(answer);
        }
    }
    questions
}
