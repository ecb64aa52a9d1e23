//! Password verification and login token issuance.

use crate::{
    models::{EntityId, user::User},
    services::entity_store::EntityStore,
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing or invalid token")]
    InvalidToken,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by a login token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: EntityId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(user: &User, password: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<EntityStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<EntityStore>, jwt_secret: String, token_ttl_secs: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl: Duration::seconds(token_ttl_secs),
        }
    }

    /// Check the credentials and issue a signed token for the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let Some(user) = self.store.find_user_by_email(email).await else {
            warn!("login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if let Err(err) = verify_password(&user, password) {
            warn!(user_id = user.id, "login rejected");
            return Err(err);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, "issued login token");
        Ok(token)
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| {
            debug!("rejected token: {}", err);
            AuthError::InvalidToken
        })?
        .claims;

        self.store
            .get_user(claims.sub)
            .await
            .ok_or(AuthError::InvalidToken)
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?)
    }
}
