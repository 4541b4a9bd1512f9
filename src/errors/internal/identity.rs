use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    /// A session token was supplied but nothing is configured to verify it
    #[error("Session token supplied but SESSION_TOKEN_SECRET is not configured")]
    MissingSigningSecret,

    #[error("Invalid session token: {reason}")]
    InvalidToken { reason: String },

    #[error("Session token has expired")]
    ExpiredToken,
}
