use std::env;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use model::user::User;
use serde::{Deserialize, Serialize};
use utility::id::Id;

pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct AuthConfig {
    pub secret: String,
    pub token_lifetime: Duration,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// `JWT_SECRET` is required, `JWT_EXPIRES_IN_HOURS` and `BCRYPT_COST`
    /// fall back to their defaults.
    pub fn from_env() -> Option<Self> {
        let secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty())?;
        let hours = env::var("JWT_EXPIRES_IN_HOURS")
            .ok()
            .and_then(|hours| hours.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_HOURS);
        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|cost| cost.parse().ok())
            .unwrap_or(DEFAULT_BCRYPT_COST);
        Some(Self {
            secret,
            token_lifetime: Duration::hours(hours),
            bcrypt_cost,
        })
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Id<User> {
        Id::new(self.user_id)
    }
}

/// Hashes passwords and issues / verifies HS256 signed session tokens.
pub struct Authenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_lifetime: config.token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let cost = self.bcrypt_cost;
        // bcrypt blocks for a noticeable time
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    pub async fn verify_password(
        &self,
        password: String,
        hash: String,
    ) -> Result<bool, AuthError> {
        let valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(valid)
    }

    pub fn issue_token(&self, user_id: &Id<User>, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.raw(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Fails for a bad signature, a malformed token or an expired token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(AuthConfig::new("test-secret").with_bcrypt_cost(4))
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let auth = authenticator();
        let hash = auth.hash_password("secret123".to_owned()).await.unwrap();
        assert_ne!(hash, "secret123");
        assert!(auth
            .verify_password("secret123".to_owned(), hash.clone())
            .await
            .unwrap());
        assert!(!auth
            .verify_password("wrong".to_owned(), hash)
            .await
            .unwrap());
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let auth = authenticator();
        let token = auth.issue_token(&Id::new(17), "a@b.c").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.user_id(), Id::new(17));
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let other = Authenticator::new(AuthConfig::new("other-secret"));
        let token = other.issue_token(&Id::new(1), "a@b.c").unwrap();
        assert!(authenticator().verify_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        let auth = Authenticator::new(
            AuthConfig::new("test-secret").with_token_lifetime(Duration::hours(-1)),
        );
        let token = auth.issue_token(&Id::new(1), "a@b.c").unwrap();
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(authenticator().verify_token("not.a.token").is_err());
    }
}
