use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::AppError;
use crate::models::User;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Unique token identifier, fresh for every issued token.
    pub jti: String,
    /// Internal id of the user.
    pub uid: i32,
    /// One entry per role assigned to the user.
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 tokens with the configured issuer, audience and lifetime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            lifetime: Duration::minutes(settings.lifetime_minutes),
        }
    }

    /// Signs a token for `user` carrying one role claim per entry of `roles`.
    pub fn issue(&self, user: &User, roles: Vec<String>) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;

        let claims = Claims {
            sub: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            uid: user.id,
            roles,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Checks signature, expiry, issuer and audience, then returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}
