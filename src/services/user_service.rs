use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user_dto::{CreateUserPayload, PatchUserPayload};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::store::user_store::UserStore;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self, guids: Option<&[Uuid]>) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        UserStore::count(&mut conn, guids).await
    }

    pub async fn get_one(&self, guid: Uuid) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        UserStore::get_one(&mut conn, guid)
            .await?
            .ok_or_else(|| not_found(guid))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        UserStore::get_by_email(&mut conn, email)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", email)))
    }

    pub async fn get_multiple(
        &self,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        UserStore::get_multiple(&mut conn, guids, limit, offset).await
    }

    pub async fn create(&self, form: CreateUserPayload) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let user = UserStore::create(&mut tx, &form).await?;
        tx.commit().await?;

        tracing::info!(user = %user.guid, "user created");
        Ok(user)
    }

    pub async fn update(&self, guid: Uuid, form: CreateUserPayload) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        UserStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let user = UserStore::update(&mut tx, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(user = %guid, "user updated");
        Ok(user)
    }

    pub async fn patch(&self, guid: Uuid, form: PatchUserPayload) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        UserStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        let user = UserStore::patch(&mut tx, guid, &form)
            .await?
            .ok_or_else(|| not_found(guid))?;
        tx.commit().await?;

        tracing::info!(user = %guid, "user patched");
        Ok(user)
    }

    pub async fn delete(&self, guid: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        UserStore::get_one(&mut tx, guid)
            .await?
            .ok_or_else(|| not_found(guid))?;
        UserStore::delete(&mut tx, guid).await?;
        tx.commit().await?;

        tracing::info!(user = %guid, "user deleted");
        Ok(())
    }
}

fn not_found(guid: Uuid) -> Error {
    Error::NotFound(format!("User {} not found", guid))
}
