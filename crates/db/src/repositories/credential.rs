//! Credential repository for stored secrets.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::credentials;

use super::StoreError;

/// Credential repository for store operations.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    db: DatabaseConnection,
}

impl CredentialRepository {
    /// Creates a new credential repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores the credential for a freshly created account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
        password_hash: &str,
    ) -> Result<credentials::Model, StoreError> {
        let credential = credentials::ActiveModel {
            account_id: Set(account_id),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let model = credential.insert(conn).await?;
        Ok(model)
    }

    /// Finds the credential bound to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<credentials::Model>, StoreError> {
        let credential = credentials::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?;
        Ok(credential)
    }
}
