//! Account repository implementing the account store contract.
//!
//! The one rule this layer owes the rest of the system: `append_movement`
//! inserts the movement and recomputes the cached balance inside the same
//! connection (normally a `DatabaseTransaction` owned by the caller), so no
//! observer can ever see a movement without its balance update.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use kudos_core::auth::AccountFilter;
use kudos_core::ledger::derive_balance;

use crate::entities::{accounts, balances, movements};

use super::StoreError;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Validated email identity.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Role (free-form profile text).
    pub role: String,
    /// Native currency code.
    pub currency: String,
}

/// Mutable profile fields updated on reload.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// Department.
    pub department: String,
    /// Role.
    pub role: String,
    /// Native currency code.
    pub currency: String,
}

/// Account repository for store operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection, for unit-of-work control.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns true while no accounts exist (bootstrap state).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        let count = accounts::Entity::find().count(&self.db).await?;
        Ok(count == 0)
    }

    /// Finds an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<accounts::Model>, StoreError> {
        self.find_by_email_in(&self.db, email).await
    }

    /// Finds an account by email on the caller's connection.
    ///
    /// Use this variant inside a transaction; acquiring a second pooled
    /// connection mid-transaction can deadlock a small pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<accounts::Model>, StoreError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(conn)
            .await?;
        Ok(account)
    }

    /// Lists accounts matching an already-scoped filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<accounts::Model>, StoreError> {
        let mut query = accounts::Entity::find();

        if let Some(department) = &filter.department {
            query = query.filter(accounts::Column::Department.eq(department));
        }
        if let Some(email) = &filter.email {
            query = query.filter(accounts::Column::Email.eq(email));
        }

        let accounts = query
            .order_by_asc(accounts::Column::Email)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Returns the distinct currency codes present in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn distinct_currencies(&self) -> Result<Vec<String>, StoreError> {
        let currencies = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Currency)
            .distinct()
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(currencies)
    }

    /// Inserts a new account within the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate email).
    pub async fn insert_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: NewAccount,
    ) -> Result<accounts::Model, StoreError> {
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            name: Set(input.name),
            department: Set(input.department),
            role: Set(input.role),
            currency: Set(input.currency),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = account.insert(conn).await?;
        Ok(model)
    }

    /// Updates the mutable profile fields of an existing account in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        account: accounts::Model,
        update: ProfileUpdate,
    ) -> Result<accounts::Model, StoreError> {
        let mut active: accounts::ActiveModel = account.into();
        active.department = Set(update.department);
        active.role = Set(update.role);
        active.currency = Set(update.currency);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(conn).await?;
        Ok(model)
    }

    /// Appends a movement and recomputes the cached balance.
    ///
    /// Both writes happen on the caller's connection; pass the operation's
    /// `DatabaseTransaction` so the movement and its balance update commit
    /// or roll back together.
    ///
    /// Concurrent appends to the same account serialize on the account row
    /// lock taken here: a later transaction blocks until the earlier one
    /// commits, so its recompute sees every committed movement. On sqlite
    /// the lock clause is a no-op and the single-writer model serializes
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountNotFound` for an unknown account, or an
    /// error if any query in the unit of work fails.
    pub async fn append_movement<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
        value: Decimal,
        actor: &str,
    ) -> Result<movements::Model, StoreError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(StoreError::AccountNotFound(account_id))?;

        let now = Utc::now();

        let movement = movements::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(account_id),
            value: Set(value),
            actor: Set(actor.to_string()),
            created_at: Set(now.into()),
        };
        let inserted = movement.insert(conn).await?;

        self.recompute_balance(conn, account_id).await?;

        Ok(inserted)
    }

    /// Recomputes and persists the balance from the movement history.
    async fn recompute_balance<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
    ) -> Result<(), StoreError> {
        let values = movements::Entity::find()
            .filter(movements::Column::AccountId.eq(account_id))
            .select_only()
            .column(movements::Column::Value)
            .into_tuple::<Decimal>()
            .all(conn)
            .await?;

        let total = derive_balance(values);
        let now = Utc::now().into();

        let existing = balances::Entity::find_by_id(account_id).one(conn).await?;
        match existing {
            Some(balance) => {
                let mut active: balances::ActiveModel = balance.into();
                active.value = Set(total);
                active.updated_at = Set(now);
                active.update(conn).await?;
            }
            None => {
                let balance = balances::ActiveModel {
                    account_id: Set(account_id),
                    value: Set(total),
                    updated_at: Set(now),
                };
                balance.insert(conn).await?;
            }
        }

        Ok(())
    }

    /// Reads the cached balance for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_balance(&self, account_id: Uuid) -> Result<Decimal, StoreError> {
        let balance = balances::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?;
        Ok(balance.map_or(Decimal::ZERO, |b| b.value))
    }

    /// Returns the most recent movement for an account, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn last_movement(
        &self,
        account_id: Uuid,
    ) -> Result<Option<movements::Model>, StoreError> {
        let movement = movements::Entity::find()
            .filter(movements::Column::AccountId.eq(account_id))
            .order_by_desc(movements::Column::CreatedAt)
            .order_by_desc(movements::Column::Id)
            .one(&self.db)
            .await?;
        Ok(movement)
    }

    /// Lists an account's movements ordered oldest to newest.
    ///
    /// Ties on the timestamp are broken by the time-ordered id, so the
    /// order is stable and matches insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<movements::Model>, StoreError> {
        let movements = movements::Entity::find()
            .filter(movements::Column::AccountId.eq(account_id))
            .order_by_asc(movements::Column::CreatedAt)
            .order_by_asc(movements::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movements)
    }
}
