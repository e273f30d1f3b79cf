//! The transaction engine: the public operation surface over the ledger.
//!
//! Every mutating operation opens one transaction on entry and commits it
//! once, after every movement in the batch succeeded. A failure on any
//! movement drops the transaction, which rolls the whole batch back, so no
//! partial state is ever externally visible.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

use kudos_core::auth::{
    AccountFilter, AuthError, Capability, Principal, generate_password, hash_password,
    resolve_scope,
};
use kudos_core::currency::{Rate, RateSource, convert};
use kudos_core::ledger::{LedgerService, initial_grant};
use kudos_db::repositories::{NewAccount, ProfileUpdate};
use kudos_db::{AccountRepository, CredentialRepository};
use kudos_shared::types::email::EmailAddress;
use kudos_shared::{AppError, AppResult};

use crate::gate::{AuthGate, Caller};
use crate::notify::Notifier;
use crate::types::{AccountRow, LoadRow, LoadedAccount, MovementRow, TransferReceipt};

/// Actor recorded on system-generated movements such as the initial grant.
const SYSTEM_ACTOR: &str = "system";

/// The transaction engine.
///
/// Holds the store repositories plus the two external collaborators, and
/// implements the operation surface: load, read, add, remove, transfer, and
/// movements. Construct one per process and share it; every operation takes
/// the caller context explicitly.
pub struct Engine {
    accounts: AccountRepository,
    credentials: CredentialRepository,
    rates: Arc<dyn RateSource>,
    notifier: Arc<dyn Notifier>,
}

impl Engine {
    /// Builds an engine over an established database connection.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        rates: Arc<dyn RateSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            credentials: CredentialRepository::new(db),
            rates,
            notifier,
        }
    }

    /// Returns an authorization gate over the same store.
    #[must_use]
    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.accounts.clone(), self.credentials.clone())
    }

    /// Bulk-creates or updates accounts.
    ///
    /// Requires the elevated capability, or the bootstrap caller while the
    /// store is still empty. Rows with an existing email update the mutable
    /// profile fields in place; new rows create the account, append the
    /// role-based initial grant, and store a generated credential. All rows
    /// commit as one unit of work; welcome notifications go out only after
    /// the commit succeeded.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthorized` for a standard caller, `InvalidEmail` for a
    /// malformed row, or a database error. Any failure leaves the store
    /// untouched.
    pub async fn load(&self, caller: &Caller, rows: Vec<LoadRow>) -> AppResult<Vec<LoadedAccount>> {
        match caller {
            Caller::Bootstrap => {}
            Caller::Authenticated(principal) if principal.is_elevated() => {}
            Caller::Authenticated(_) => {
                return Err(AppError::NotAuthorized(
                    "loading accounts requires the manager role".into(),
                ));
            }
        }

        let mut results = Vec::with_capacity(rows.len());
        let mut welcomes = Vec::new();

        let txn = self.accounts.connection().begin().await.map_err(db_err)?;

        for row in rows {
            let email = EmailAddress::parse(&row.email)?;

            match self.accounts.find_by_email_in(&txn, email.as_str()).await? {
                Some(existing) => {
                    let updated = self
                        .accounts
                        .update_profile(
                            &txn,
                            existing,
                            ProfileUpdate {
                                department: row.department,
                                role: row.role,
                                currency: row.currency,
                            },
                        )
                        .await?;
                    results.push(loaded(updated, false));
                }
                None => {
                    let account = self
                        .accounts
                        .insert_account(
                            &txn,
                            NewAccount {
                                email: email.as_str().to_string(),
                                name: row.name,
                                department: row.department,
                                role: row.role,
                                currency: row.currency,
                            },
                        )
                        .await?;

                    let capability = Capability::from_role(&account.role);
                    self.accounts
                        .append_movement(&txn, account.id, initial_grant(capability), SYSTEM_ACTOR)
                        .await?;

                    let password = generate_password();
                    let hash = hash_password(&password).map_err(AuthError::from)?;
                    self.credentials.insert(&txn, account.id, &hash).await?;

                    welcomes.push((account.email.clone(), account.name.clone(), password));
                    results.push(loaded(account, true));
                }
            }
        }

        txn.commit().await.map_err(db_err)?;

        for (email, name, password) in welcomes {
            self.notifier.account_created(&email, &name, &password).await;
        }

        Ok(results)
    }

    /// Lists accounts visible to the caller, with converted balances.
    ///
    /// Filters are normalized, passed through the scope rule, and applied
    /// to the store. Rates are resolved once per distinct currency in the
    /// result set; a failed lookup degrades the affected rows to a zero
    /// converted value instead of failing the listing.
    ///
    /// # Errors
    ///
    /// Returns `ScopeViolation` for a standard caller filtering outside
    /// their own account, or a database error.
    pub async fn read(
        &self,
        principal: &Principal,
        filter: AccountFilter,
    ) -> AppResult<Vec<AccountRow>> {
        let scoped = resolve_scope(principal, filter)?;
        let accounts = self.accounts.list(&scoped).await?;

        let codes: Vec<String> = accounts
            .iter()
            .map(|a| a.currency.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let rates: HashMap<String, Rate> = self
            .rates
            .resolve_rates(&codes)
            .await
            .into_iter()
            .map(|rate| (rate.code.clone(), rate))
            .collect();

        let mut rows = Vec::with_capacity(accounts.len());
        for account in accounts {
            let balance = self.accounts.get_balance(account.id).await?;
            let last_movement = self.accounts.last_movement(account.id).await?;

            let rate = rates
                .get(&account.currency)
                .cloned()
                .unwrap_or_else(|| Rate::degraded(account.currency.clone()));

            rows.push(AccountRow {
                email: account.email,
                name: account.name,
                department: account.department,
                role: account.role,
                currency: account.currency,
                balance,
                converted: convert(balance, &rate),
                degraded: rate.degraded,
                last_movement: last_movement.map(|m| m.created_at.to_utc()),
            });
        }

        Ok(rows)
    }

    /// Applies a signed point adjustment to every account in scope.
    ///
    /// The target set is resolved through the same scope rule as `read`.
    /// Elevated callers mint freely; standard callers fund the batch from
    /// their own balance and receive a counter-debit per target. All
    /// movements commit as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an empty target set, `InsufficientBalance`
    /// when a standard caller cannot cover the total, `ScopeViolation` for
    /// an out-of-scope filter, or a database error. Any failure produces
    /// zero movements.
    pub async fn add(
        &self,
        principal: &Principal,
        value: Decimal,
        filter: AccountFilter,
    ) -> AppResult<Vec<AccountRow>> {
        let scoped = resolve_scope(principal, filter)?;
        let targets = self.accounts.list(&scoped).await?;
        let plan = LedgerService::plan_batch(value, targets.len(), principal)?;

        let txn = self.accounts.connection().begin().await.map_err(db_err)?;

        for target in &targets {
            self.accounts
                .append_movement(&txn, target.id, plan.per_target, &principal.email)
                .await?;

            if let Some(debit) = plan.counter_debit {
                self.accounts
                    .append_movement(&txn, principal.account_id, debit, &target.email)
                    .await?;
            }
        }

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            actor = %principal.email,
            value = %plan.per_target,
            targets = targets.len(),
            "points adjusted"
        );

        self.read(principal, scoped).await
    }

    /// `add` with the value's sign inverted.
    ///
    /// # Errors
    ///
    /// Fails exactly as `add` does.
    pub async fn remove(
        &self,
        principal: &Principal,
        value: Decimal,
        filter: AccountFilter,
    ) -> AppResult<Vec<AccountRow>> {
        self.add(principal, -value, filter).await
    }

    /// Moves points from the caller to another account.
    ///
    /// Appends the matched movement pair atomically, each side attributed
    /// to the counterpart's identity.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveTransfer`, `SelfTransfer`,
    /// `InsufficientBalance`, `NotFound` for an unknown recipient, or a
    /// database error.
    pub async fn transfer(
        &self,
        principal: &Principal,
        value: Decimal,
        to_email: &str,
    ) -> AppResult<TransferReceipt> {
        let value = LedgerService::validate_transfer(value, to_email, principal)?;

        let recipient = self
            .accounts
            .find_by_email(to_email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {to_email}")))?;

        let txn = self.accounts.connection().begin().await.map_err(db_err)?;
        self.accounts
            .append_movement(&txn, recipient.id, value, &principal.email)
            .await?;
        self.accounts
            .append_movement(&txn, principal.account_id, -value, &recipient.email)
            .await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            from = %principal.email,
            to = %recipient.email,
            value = %value,
            "points transferred"
        );

        Ok(TransferReceipt {
            value,
            to_email: recipient.email,
            remaining_balance: principal.balance - value,
        })
    }

    /// Lists the caller's own movement history, newest first.
    ///
    /// Elevated callers also see only their own history here; other
    /// accounts' histories are a `read`-side concern. Ties on the timestamp
    /// preserve insertion order, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the history cannot be read.
    pub async fn movements(&self, principal: &Principal) -> AppResult<Vec<MovementRow>> {
        let history = self.accounts.list_movements(principal.account_id).await?;

        let rate = self
            .rates
            .resolve_rates(std::slice::from_ref(&principal.currency))
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| Rate::degraded(principal.currency.clone()));

        Ok(history
            .into_iter()
            .rev()
            .map(|movement| MovementRow {
                date: movement.created_at.to_utc(),
                value: movement.value,
                converted: convert(movement.value, &rate),
                actor: movement.actor,
            })
            .collect())
    }
}

fn loaded(account: kudos_db::entities::accounts::Model, created: bool) -> LoadedAccount {
    LoadedAccount {
        email: account.email,
        name: account.name,
        department: account.department,
        role: account.role,
        currency: account.currency,
        created,
    }
}

fn db_err(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}
