use crate::error::{Error, Result};
use dotenvy::dotenv;
use jsonwebtoken::Algorithm;
use std::env;

/// Runtime configuration, loaded once at startup and carried in `AppState`.
/// Every variable is required; a missing one aborts the process before the
/// listener binds.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_ttl_minutes: i64,
    pub google_client_id: String,
    pub google_client_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_algorithm: get_env_parse("JWT_ALGORITHM")?,
            jwt_ttl_minutes: get_env_parse("JWT_TTL_MINUTES")?,
            google_client_id: get_env("GOOGLE_CLIENT_ID")?,
            google_client_secret: get_env("GOOGLE_CLIENT_SECRET")?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
