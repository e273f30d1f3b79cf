//! Out-of-band notification collaborator.
//!
//! Delivery is fire-and-forget from the engine's point of view: a failed
//! notification is logged, never propagated, so ledger correctness does not
//! depend on the mail server.

use async_trait::async_trait;

use kudos_shared::EmailService;

/// Notification collaborator for account lifecycle events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announces a freshly created account to its owner.
    ///
    /// The generated password travels only through this call.
    async fn account_created(&self, email: &str, name: &str, password: &str);
}

/// Notifier delivering welcome messages over SMTP.
pub struct EmailNotifier {
    service: EmailService,
}

impl EmailNotifier {
    /// Creates a notifier over the given email service.
    #[must_use]
    pub const fn new(service: EmailService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn account_created(&self, email: &str, name: &str, password: &str) {
        if let Err(e) = self.service.send_welcome_email(email, name, password).await {
            tracing::warn!(email, error = %e, "failed to deliver welcome email");
        }
    }
}

/// Log-only notifier for setups without SMTP.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn account_created(&self, email: &str, _name: &str, _password: &str) {
        // The password is deliberately not logged.
        tracing::info!(email, "account created, no mail transport configured");
    }
}
