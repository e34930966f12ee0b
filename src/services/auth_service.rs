use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::dto::auth_dto::TokenResponse;
use crate::dto::user_dto::CreateUserPayload;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::store::user_store::UserStore;
use crate::utils::token;

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity claims Google attests for a valid ID token. The endpoint rejects
/// bad signatures and expired tokens; the audience is checked locally.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: String,
    given_name: String,
    family_name: String,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    client: Client,
    config: Arc<Config>,
    tokeninfo_url: String,
}

impl AuthService {
    pub fn new(pool: PgPool, client: Client, config: Arc<Config>) -> Self {
        Self {
            pool,
            client,
            config,
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
        }
    }

    /// Point identity verification at a different endpoint. Test seam.
    pub fn with_tokeninfo_url(mut self, url: impl Into<String>) -> Self {
        self.tokeninfo_url = url.into();
        self
    }

    /// Exchanges a verified Google ID token for a locally signed session
    /// token, provisioning the user on first login.
    pub async fn login(&self, id_token: &str) -> Result<TokenResponse> {
        let identity = self.verify_identity(id_token).await?;
        let user = self.ensure_user(identity).await?;
        let access_token = token::issue(&user, &self.config)?;
        Ok(TokenResponse { access_token })
    }

    async fn verify_identity(&self, id_token: &str) -> Result<GoogleTokenInfo> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Unauthorized("Identity token rejected".to_string()));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|_| Error::Unauthorized("Identity token rejected".to_string()))?;

        if info.aud != self.config.google_client_id {
            return Err(Error::Unauthorized(
                "Identity token audience mismatch".to_string(),
            ));
        }

        Ok(info)
    }

    /// First login provisions a local user from the identity claims; later
    /// logins resolve the existing row by email. Two concurrent first logins
    /// can both observe "absent" and both insert, since email carries no
    /// uniqueness constraint in storage.
    async fn ensure_user(&self, identity: GoogleTokenInfo) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        if let Some(user) = UserStore::get_by_email(&mut conn, &identity.email).await? {
            return Ok(user);
        }
        drop(conn);

        let form = CreateUserPayload {
            name: identity.given_name,
            surname: identity.family_name,
            email: identity.email,
        };
        let mut tx = self.pool.begin().await?;
        let user = UserStore::create(&mut tx, &form).await?;
        tx.commit().await?;

        tracing::info!(user = %user.guid, "user provisioned on first login");
        Ok(user)
    }
}
