//! Auth service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{AuthServiceError, hash_api_token, validate_api_token},
    database::Db,
    domain::users::{records::Identity, repository::PgUsersRepository},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        validate_api_token(bearer_token)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .find_user_by_token_hash(&mut tx, &hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::UnknownToken)?;

        tx.commit().await?;

        Ok(user.identity())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the identity of its active user.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;
}
