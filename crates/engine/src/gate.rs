//! Authorization gate: credentials in, caller context out.

use chrono::Utc;

use kudos_core::auth::{AuthError, Capability, Principal, verify_password};
use kudos_db::entities::accounts;
use kudos_db::{AccountRepository, CredentialRepository};
use kudos_shared::{AppError, AppResult};

/// The resolved caller for one logical session.
#[derive(Debug, Clone)]
pub enum Caller {
    /// No accounts exist yet; authentication is bypassed so the very first
    /// load can run. Only loading is permitted in this state.
    Bootstrap,
    /// A fully authenticated principal.
    Authenticated(Principal),
}

impl Caller {
    /// Returns the principal, if the caller authenticated.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Bootstrap => None,
            Self::Authenticated(principal) => Some(principal),
        }
    }

    /// Unwraps the principal, rejecting the bootstrap caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingCredentials` for the bootstrap caller,
    /// which may only load accounts.
    pub fn require_principal(&self) -> AppResult<&Principal> {
        self.principal().ok_or_else(|| {
            AppError::MissingCredentials("this operation requires an authenticated account".into())
        })
    }
}

/// Resolves a caller context from presented credentials.
#[derive(Debug, Clone)]
pub struct AuthGate {
    accounts: AccountRepository,
    credentials: CredentialRepository,
}

impl AuthGate {
    /// Creates a new gate over the given repositories.
    #[must_use]
    pub const fn new(accounts: AccountRepository, credentials: CredentialRepository) -> Self {
        Self {
            accounts,
            credentials,
        }
    }

    /// Resolves the caller for one logical session.
    ///
    /// While the store holds no accounts, authentication is bypassed and the
    /// bootstrap caller is returned; the first account cannot authenticate
    /// against itself. Otherwise both identity and secret are required and
    /// are verified against the stored credential.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials`, `UnknownIdentity`, or `BadSecret` per
    /// the step that failed, or a database error.
    pub async fn resolve(
        &self,
        identity: Option<&str>,
        secret: Option<&str>,
    ) -> AppResult<Caller> {
        if self.accounts.is_empty().await? {
            tracing::info!("no accounts exist yet, proceeding in bootstrap mode");
            return Ok(Caller::Bootstrap);
        }

        let identity = non_blank(identity)
            .ok_or_else(|| AuthError::MissingCredentials("no identity supplied".into()))?;
        let secret = non_blank(secret)
            .ok_or_else(|| AuthError::MissingCredentials("no secret supplied".into()))?;

        let account = self
            .accounts
            .find_by_email(identity)
            .await?
            .ok_or_else(|| AuthError::UnknownIdentity(identity.to_string()))?;

        let credential = self
            .credentials
            .find_by_account(account.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("account {} has no credential", account.id)))?;

        let verified =
            verify_password(secret, &credential.password_hash).map_err(AuthError::from)?;
        if !verified {
            return Err(AuthError::BadSecret.into());
        }

        let principal = self.principal_for(&account).await?;
        tracing::debug!(
            email = %principal.email,
            capability = %principal.capability,
            "caller authenticated"
        );
        Ok(Caller::Authenticated(principal))
    }

    /// Builds a principal from an account row.
    ///
    /// The balance and last-movement snapshot are read eagerly here so the
    /// operations never re-query the caller's own state.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot queries fail.
    pub async fn principal_for(&self, account: &accounts::Model) -> AppResult<Principal> {
        let balance = self.accounts.get_balance(account.id).await?;
        let last_movement = self.accounts.last_movement(account.id).await?;

        Ok(Principal {
            account_id: account.id,
            email: account.email.clone(),
            department: account.department.clone(),
            currency: account.currency.clone(),
            capability: Capability::from_role(&account.role),
            balance,
            last_movement: last_movement.map(|m| m.created_at.with_timezone(&Utc)),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
