//! HS256 bearer tokens via `jsonwebtoken`.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use eventhub_app::ports::TokenIssuer;
use eventhub_domain::error::{AuthError, EventHubError};
use eventhub_domain::id::UserId;
use eventhub_domain::user::User;

/// Lifetime of a token when none is configured.
pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::hours(2);

/// Payload carried by every token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signs and checks tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl JwtTokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl: TimeDelta) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Decode a token into its claims, checking signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] when the token cannot be trusted.
    pub fn claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                AuthError::InvalidToken
            })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, EventHubError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| EventHubError::Internal("token expiry out of range".into()))?;
        let claims = Claims {
            sub: user.id.as_i64(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| EventHubError::Internal(Box::new(err)))?;
        tracing::debug!(user_id = %user.id, "token issued");
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<UserId, EventHubError> {
        let claims = self.claims(token)?;
        Ok(UserId::new(claims.sub))
    }
}
