use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::user::User;

/// Session token payload. `jti` is unused today but reserved for a future
/// revocation denylist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
    pub email: String,
    pub name: String,
    pub surname: String,
}

pub fn issue(user: &User, config: &Config) -> Result<String> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::minutes(config.jwt_ttl_minutes);
    let claims = Claims {
        sub: user.guid,
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4(),
        email: user.email.clone(),
        name: user.name.clone(),
        surname: user.surname.clone(),
    };

    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign access token: {}", e)))
}

/// The single decode-and-validate primitive. Both the route gate and actor
/// extraction go through here. Validity is signature + embedded expiry only;
/// the audience claim is not checked.
pub fn decode_claims(token: &str, config: &Config) -> Result<Claims> {
    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("Invalid access token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn config(secret: &str, ttl_minutes: i64) -> Config {
        Config {
            server_address: "127.0.0.1:0".into(),
            database_url: "postgres://localhost/quiz".into(),
            jwt_secret: secret.into(),
            jwt_algorithm: Algorithm::HS256,
            jwt_ttl_minutes: ttl_minutes,
            google_client_id: "client-id".into(),
            google_client_secret: "client-secret".into(),
        }
    }

    fn user() -> User {
        User {
            guid: Uuid::new_v4(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            email: "ada@example.com".into(),
            is_deleted: 0,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let config = config("secret", 60);
        let user = user();

        let token = issue(&user, &config).unwrap();
        let claims = decode_claims(&token, &config).unwrap();

        assert_eq!(claims.sub, user.guid);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn zero_ttl_expires_at_issuance() {
        let config = config("secret", 0);
        let token = issue(&user(), &config).unwrap();

        let mut no_exp_check = Validation::new(Algorithm::HS256);
        no_exp_check.validate_exp = false;
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &no_exp_check,
        )
        .unwrap();
        assert_eq!(decoded.claims.exp, decoded.claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("secret", 0);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: now - 10,
            iat: now - 10,
            jti: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            decode_claims(&token, &config),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected_regardless_of_expiry() {
        let signing = config("secret-a", 60);
        let verifying = config("secret-b", 60);
        let token = issue(&user(), &signing).unwrap();

        assert!(matches!(
            decode_claims(&token, &verifying),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let config = config("secret", 60);
        assert!(matches!(
            decode_claims("not-a-token", &config),
            Err(Error::Unauthorized(_))
        ));
    }
}
