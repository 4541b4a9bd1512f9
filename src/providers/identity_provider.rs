use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::config::PanelSettings;
use crate::errors::InternalError;
use crate::errors::internal::IdentityError;
use crate::types::internal::{AuthContext, SessionClaims, SessionToken};

/// Signs the panel process in before it may touch the account store
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with a pre-issued token, or anonymously when none is given
    async fn sign_in(&self, token: Option<&SessionToken>) -> Result<AuthContext, InternalError>;
}

/// Verifies pre-issued HS256 session tokens; falls back to anonymous sign-in
pub struct TokenIdentityProvider {
    secret: Option<String>,
}

impl TokenIdentityProvider {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub fn from_settings(settings: &PanelSettings) -> Self {
        Self::new(settings.session_token_secret().map(str::to_owned))
    }

    /// Validate a session token and return its claims
    pub fn verify(&self, token: &SessionToken) -> Result<SessionClaims, InternalError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or(IdentityError::MissingSigningSecret)?;

        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<SessionClaims>(
            token.as_str(),
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => IdentityError::ExpiredToken,
            _ => IdentityError::InvalidToken {
                reason: e.to_string(),
            },
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentityProvider {
    async fn sign_in(&self, token: Option<&SessionToken>) -> Result<AuthContext, InternalError> {
        let auth = match token {
            Some(token) => {
                let claims = self.verify(token)?;
                AuthContext {
                    uid: claims.sub,
                    anonymous: false,
                    signed_in_at: Utc::now(),
                }
            }
            None => AuthContext {
                uid: Uuid::new_v4().to_string(),
                anonymous: true,
                signed_in_at: Utc::now(),
            },
        };

        tracing::info!(uid = %auth.uid, anonymous = auth.anonymous, "Signed in to identity provider");

        Ok(auth)
    }
}
