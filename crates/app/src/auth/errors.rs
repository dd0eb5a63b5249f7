//! Auth service errors.

use thiserror::Error;

use crate::auth::ApiTokenError;

/// Why a bearer token did not resolve to a user.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Well-formed token with no matching user.
    #[error("unknown api token")]
    UnknownToken,

    #[error("malformed api token")]
    MalformedToken(#[from] ApiTokenError),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
