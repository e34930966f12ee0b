use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::question_dto::{CreateQuestionPayload, PatchQuestionPayload};
use crate::error::{Error, Result};
use crate::models::question::QuestionWithAnswers;
use crate::store::question_store::QuestionStore;
use crate::store::test_store::TestStore;

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self, guids: Option<&[Uuid]>) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        QuestionStore::count(&mut conn, guids).await
    }

    pub async fn get_one(&self, guid: Uuid) -> Result<QuestionWithAnswers> {
        let mut conn = self.pool.acquire().await?;
        QuestionStore::get_one(&mut conn, guid)
            .await?
            .ok_or_else(|| not_found(guid))
    }

    pub async fn get_multiple(
        &self,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuestionWithAnswers>> {
        let mut conn = self.pool.acquire().await?;
        QuestionStore::get_multiple(&mut conn, guids, limit, offset).await
    }

    pub async fn create(
        &self,
        actor: Uuid,
        form: CreateQuestionPayload,
    ) -> Result<QuestionWithAnswers> {
        let mut tx = self.pool.begin().await?;
        if !TestStore::exists(&mut tx, form.test_guid).await? {
            return Err(Error::NotFound(format!("Test {} not found", form.test_guid)));
        }
        let question = QuestionStore::create(&mut tx, actor, &form).await?;
        tx.commit().await?;

        tracing::info!(question = %question.guid, %actor, "question created");
        Ok(QuestionWithAnswers {
            question,
            answers: Vec::new(),
        })
    }

    pub async fn update(
        &self,
        actor: Uuid,
        guid: Uuid,
        form: CreateQuestionPayload,
    ) -> Result<QuestionWithAnswers> {
        let mut tx = self.pool.begin().await?;
        QuestionStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let question = QuestionStore::update(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(question = %guid, %actor, "question updated");
        Ok(question)
    }

    pub async fn patch(
        &self,
        actor: Uuid,
        guid: Uuid,
        form: PatchQuestionPayload,
    ) -> Result<QuestionWithAnswers> {
        let mut tx = self.pool.begin().await?;
        QuestionStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let question = QuestionStore::patch(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(question = %guid, %actor, "question patched");
        Ok(question)
    }

    pub async fn delete(&self, actor: Uuid, guid: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        QuestionStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        QuestionStore::delete(&mut tx, actor, guid).await?;
        tx.commit().await?;

        tracing::info!(question = %guid, %actor, "question deleted");
        Ok(())
    }
}

fn not_found(guid: Uuid) -> Error {
    Error::NotFound(format!("Question {} not found", guid))
}
