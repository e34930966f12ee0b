use std::collections::HashMap;

use sqlx::PgConnection;
use uuid::Uuid;

use crate::dto::test_dto::{CreateTestPayload, PatchTestPayload};
use crate::error::Result;
use crate::models::question::QuestionWithAnswers;
use crate::models::test::{Test, TestWithQuestions};
use crate::store::question_store::QuestionStore;

const COLUMNS: &str = "guid, title, is_deleted, created, updated, created_by, updated_by";

pub struct TestStore;

impl TestStore {
    pub async fn count(conn: &mut PgConnection, guids: Option<&[Uuid]>) -> Result<i64> {
        let total = match guids {
            Some(guids) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(guid) FROM test WHERE is_deleted = 0 AND guid = ANY($1)",
                )
                .bind(guids)
                .fetch_one(conn)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(guid) FROM test WHERE is_deleted = 0")
                    .fetch_one(conn)
                    .await?
            }
        };
        Ok(total)
    }

    pub async fn exists(conn: &mut PgConnection, guid: Uuid) -> Result<bool> {
        let found = sqlx::query_scalar::<_, Uuid>(
            "SELECT guid FROM test WHERE guid = $1 AND is_deleted = 0",
        )
        .bind(guid)
        .fetch_optional(conn)
        .await?;
        Ok(found.is_some())
    }

    /// A live test hydrated with its live questions. A test whose questions
    /// are all tombstoned still comes back, with an empty question list.
    pub async fn get_one(conn: &mut PgConnection, guid: Uuid) -> Result<Option<TestWithQuestions>> {
        let sql = format!("SELECT {COLUMNS} FROM test WHERE guid = $1 AND is_deleted = 0");
        let Some(test) = sqlx::query_as::<_, Test>(&sql)
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let questions = QuestionStore::for_tests(conn, &[guid]).await?;
        Ok(Some(TestWithQuestions { test, questions }))
    }

    pub async fn get_multiple(
        conn: &mut PgConnection,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TestWithQuestions>> {
        // Page over tests first; hydrating questions afterwards keeps the
        // window size independent of how many questions each test owns.
        let tests = match guids {
            Some(guids) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM test
                     WHERE is_deleted = 0 AND guid = ANY($1)
                     ORDER BY created, guid LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Test>(&sql)
                    .bind(guids)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM test
                     WHERE is_deleted = 0
                     ORDER BY created, guid LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Test>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        let test_guids: Vec<Uuid> = tests.iter().map(|test| test.guid).collect();
        let questions = QuestionStore::for_tests(conn, &test_guids).await?;

        let mut by_test: HashMap<Uuid, Vec<QuestionWithAnswers>> = HashMap::new();
        for question in questions {
            by_test
                .entry(question.question.test_guid)
                .or_default()
                .push(question);
        }

        Ok(tests
            .into_iter()
            .map(|test| {
                let questions = by_test.remove(&test.guid).unwrap_or_default();
                TestWithQuestions { test, questions }
            })
            .collect())
    }

    pub async fn create(
        conn: &mut PgConnection,
        actor: Uuid,
        form: &CreateTestPayload,
    ) -> Result<Test> {
        let sql = format!(
            "INSERT INTO test (guid, title, created_by, updated_by)
             VALUES ($1, $2, $3, $3) RETURNING {COLUMNS}"
        );
        let test = sqlx::query_as::<_, Test>(&sql)
            .bind(Uuid::new_v4())
            .bind(&form.title)
            .bind(actor)
            .fetch_one(conn)
            .await?;
        Ok(test)
    }

    pub async fn update(
        conn: &mut PgConnection,
        actor: Uuid,
        guid: Uuid,
        form: &CreateTestPayload,
    ) -> Result<Option<TestWithQuestions>> {
        sqlx::query("UPDATE test SET title = $1, updated_by = $2, updated = now() WHERE guid = $3")
            .bind(&form.title)
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
        form: &PatchTestPayload,
    ) -> Result<Option<TestWithQuestions>> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 0usize;
        if form.title.is_some() {
            idx += 1;
            sets.push(format!("title = ${idx}"));
        }
        idx += 1;
        sets.push(format!("updated_by = ${idx}"));
        sets.push("updated = now()".to_string());
        let sql = format!(
            "UPDATE test SET {} WHERE guid = ${}",
            sets.join(", "),
            idx + 1
        );

        let mut query = sqlx::query(&sql);
        if let Some(title) = &form.title {
            query = query.bind(title);
        }
        query.bind(actor).bind(guid).execute(&mut *conn).await?;

        Self::get_one(conn, guid).await
    }

    pub async fn delete(conn: &mut PgConnection, actor: Uuid, guid: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE test SET is_deleted = 1, updated_by = $1, updated = now() WHERE guid = $2",
        )
        .bind(actor)
        .bind(guid)
        .execute(conn)
        .await?;
        Ok(())
    }
}
