use sqlx::PgConnection;
use uuid::Uuid;

use crate::dto::user_dto::{CreateUserPayload, PatchUserPayload};
use crate::error::Result;
use crate::models::user::User;

const COLUMNS: &str = "guid, name, surname, email, is_deleted, created, updated";

/// Data access for users. Users carry no audit-by columns, so mutations do
/// not take an actor.
pub struct UserStore;

impl UserStore {
    pub async fn count(conn: &mut PgConnection, guids: Option<&[Uuid]>) -> Result<i64> {
        let total = match guids {
            Some(guids) => {
                sqlx::query_scalar::<_, i64>(
                    r#"SELECT COUNT(guid) FROM "user" WHERE is_deleted = 0 AND guid = ANY($1)"#,
                )
                .bind(guids)
                .fetch_one(conn)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(guid) FROM "user" WHERE is_deleted = 0"#)
                    .fetch_one(conn)
                    .await?
            }
        };
        Ok(total)
    }

    pub async fn exists(conn: &mut PgConnection, guid: Uuid) -> Result<bool> {
        let found = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT guid FROM "user" WHERE guid = $1 AND is_deleted = 0"#,
        )
        .bind(guid)
        .fetch_optional(conn)
        .await?;
        Ok(found.is_some())
    }

    pub async fn get_one(conn: &mut PgConnection, guid: Uuid) -> Result<Option<User>> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "user" WHERE guid = $1 AND is_deleted = 0"#);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(guid)
            .fetch_optional(conn)
            .await?;
        Ok(user)
    }

    pub async fn get_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<User>> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "user" WHERE email = $1 AND is_deleted = 0"#);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(conn)
            .await?;
        Ok(user)
    }

    pub async fn get_multiple(
        conn: &mut PgConnection,
        guids: Option<&[Uuid]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let users = match guids {
            Some(guids) => {
                let sql = format!(
                    r#"SELECT {COLUMNS} FROM "user"
                       WHERE is_deleted = 0 AND guid = ANY($1)
                       ORDER BY created, guid LIMIT $2 OFFSET $3"#
                );
                sqlx::query_as::<_, User>(&sql)
                    .bind(guids)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"SELECT {COLUMNS} FROM "user"
                       WHERE is_deleted = 0
                       ORDER BY created, guid LIMIT $1 OFFSET $2"#
                );
                sqlx::query_as::<_, User>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(conn)
                    .await?
            }
        };
        Ok(users)
    }

    pub async fn create(conn: &mut PgConnection, form: &CreateUserPayload) -> Result<User> {
        let sql = format!(
            r#"INSERT INTO "user" (guid, name, surname, email)
               VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&form.name)
            .bind(&form.surname)
            .bind(&form.email)
            .fetch_one(conn)
            .await?;
        Ok(user)
    }

    pub async fn update(
        conn: &mut PgConnection,
        guid: Uuid,
        form: &CreateUserPayload,
    ) -> Result<Option<User>> {
        sqlx::query(
            r#"UPDATE "user" SET name = $1, surname = $2, email = $3, updated = now() WHERE guid = $4"#,
        )
        .bind(&form.name)
        .bind(&form.surname)
        .bind(&form.email)
        .bind(guid)
        .execute(&mut *conn)
        .await?;

        Self::get_one(conn, guid).await
    }

    pub async fn patch(
        conn: &mut PgConnection,
        guid: Uuid,
        form: &PatchUserPayload,
    ) -> Result<Option<User>> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 0usize;
        if form.name.is_some() {
            idx += 1;
            sets.push(format!("name = ${idx}"));
        }
        if form.surname.is_some() {
            idx += 1;
            sets.push(format!("surname = ${idx}"));
        }
        if form.email.is_some() {
            idx += 1;
            sets.push(format!("email = ${idx}"));
        }
        sets.push("updated = now()".to_string());
        let sql = format!(
            r#"UPDATE "user" SET {} WHERE guid = ${}"#,
            sets.join(", "),
            idx + 1
        );

        let mut query = sqlx::query(&sql);
        if let Some(name) = &form.name {
            query = query.bind(name);
        }
        if let Some(surname) = &form.surname {
            query = query.bind(surname);
        }
        if let Some(email) = &form.email {
            query = query.bind(email);
        }
        query.bind(guid).execute(&mut *conn).await?;

        Self::get_one(conn, guid).await
    }

    pub async fn delete(conn: &mut PgConnection, guid: Uuid) -> Result<()> {
        sqlx::query(r#"UPDATE "user" SET is_deleted = 1, updated = now() WHERE guid = $1"#)
            .bind(guid)
            .execute(conn)
            .await?;
        Ok(())
    }
}
