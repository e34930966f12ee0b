use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::test_dto::{CreateTestPayload, PatchTestPayload};
use crate::error::{Error, Result};
use crate::models::test::TestWithQuestions;
use crate::store::test_store::TestStore;

#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self, guids: Option<&[Uuid]>) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        TestStore::count(&mut conn, guids).await
    }

    pub async fn get_one(&self, guid: Uuid) -> Result<TestWithQuestions> {
        let mut conn = self.pool.acquire().await?;
        TestStore::get_one(&mut conn, guid)
            .await?
            .ok_or_else(|| not_found(guid))
    }

    pub async fn get_multiple(
        &self,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TestWithQuestions>> {
        let mut conn = self.pool.acquire().await?;
        TestStore::get_multiple(&mut conn, guids, limit, offset).await
    }

    pub async fn create(&self, actor: Uuid, form: CreateTestPayload) -> Result<TestWithQuestions> {
        let mut tx = self.pool.begin().await?;
        let test = TestStore::create(&mut tx, actor, &form).await?;
        tx.commit().await?;

        tracing::info!(test = %test.guid, %actor, "test created");
        Ok(TestWithQuestions {
            test,
            questions: Vec::new(),
        })
    }

    pub async fn update(
        &self,
        actor: Uuid,
        guid: Uuid,
        form: CreateTestPayload,
    ) -> Result<TestWithQuestions> {
        let mut tx = self.pool.begin().await?;
        TestStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let test = TestStore::update(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(test = %guid, %actor, "test updated");
        Ok(test)
    }

    pub async fn patch(
        &self,
        actor: Uuid,
        guid: Uuid,
        form: PatchTestPayload,
    ) -> Result<TestWithQuestions> {
        let mut tx = self.pool.begin().await?;
        TestStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let test = TestStore::patch(&mut tx, actor, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(test = %guid, %actor, "test patched");
        Ok(test)
    }

    /// Soft-deletes the test only; its questions stay live underneath the
    /// tombstoned parent.
    pub async fn delete(&self, actor: Uuid, guid: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        TestStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        TestStore::delete(&mut tx, actor, guid).await?;
        tx.commit().await?;

        tracing::info!(test = %guid, %actor, "test deleted");
        Ok(())
    }
}

fn not_found(guid: Uuid) -> Error {
    Error::NotFound(format!("Test {} not found", guid))
}
