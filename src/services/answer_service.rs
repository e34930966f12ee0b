use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::answer_dto::{CreateAnswerPayload, PatchAnswerPayload};
use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::store::answer_store::AnswerStore;
use crate::store::question_store::QuestionStore;

#[derive(Clone)]
pub struct AnswerService {
    pool: PgPool,
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self, guids: Option<&[Uuid]>) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        AnswerStore::count(&mut conn, guids).await
    }

    pub async fn get_one(&self, guid: Uuid) -> Result<Answer> {
        let mut conn = self.pool.acquire().await?;
        AnswerStore::get_one(&mut conn, guid)
            .await?
            .ok_or_else(|| not_found(guid))
    }

    pub async fn get_multiple(
        &self,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Answer>> {
        let mut conn = self.pool.acquire().await?;
        AnswerStore::get_multiple(&mut conn, guids, limit, offset).await
    }

    pub async fn create(&self, actor: Uuid, form: CreateAnswerPayload) -> Result<Answer> {
        let mut tx = self.pool.begin().await?;
        if !QuestionStore::exists(&mut tx, form.question_guid).await? {
            return Err(Error::NotFound(format!(
                "Question {} not found",
                form.question_guid
            )));
        }
        let answer = AnswerStore::create(&mut tx, actor, &form).await?;
        tx.commit().await?;

        tracing::info!(answer = %answer.guid, %actor, "answer created");
        Ok(answer)
    }

    pub async fn update(&self, actor: Uuid, guid: Uuid, form: CreateAnswerPayload) -> Result<Answer> {
        let mut tx = self.pool.begin().await?;
        AnswerStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let answer = AnswerStore::update(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(answer = %guid, %actor, "answer updated");
        Ok(answer)
    }

    pub async fn patch(&self, actor: Uuid, guid: Uuid, form: PatchAnswerPayload) -> Result<Answer> {
        let mut tx = self.pool.begin().await?;
        AnswerStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let answer = AnswerStore::patch(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(answer = %guid, %actor, "answer patched");
        Ok(answer)
    }

    pub async fn delete(&self, actor: Uuid, guid: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        AnswerStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        AnswerStore::delete(&mut tx, actor, guid).await?;
        tx.commit().await?;

        tracing::info!(answer = %guid, %actor, "answer deleted");
        Ok(())
    }
}

fn not_found(guid: Uuid) -> Error {
    Error::NotFound(format!("Answer {} not found", guid))
}
