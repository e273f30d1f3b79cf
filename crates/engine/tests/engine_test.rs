//! End-to-end tests for the transaction engine on an in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;

use kudos_core::auth::{AccountFilter, Capability, Principal};
use kudos_core::currency::StaticRates;
use kudos_db::migration::{Migrator, MigratorTrait};
use kudos_engine::{Caller, Engine, LoadRow, Notifier};
use kudos_shared::AppError;

/// Captures welcome notifications so tests can sign in with the generated
/// password.
#[derive(Default)]
struct RecordingNotifier {
    welcomes: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn account_created(&self, email: &str, name: &str, password: &str) {
        self.welcomes.lock().unwrap().push((
            email.to_string(),
            name.to_string(),
            password.to_string(),
        ));
    }
}

impl RecordingNotifier {
    fn password_for(&self, email: &str) -> String {
        self.welcomes
            .lock()
            .unwrap()
            .iter()
            .find(|(e, _, _)| e == email)
            .map(|(_, _, password)| password.clone())
            .expect("no welcome recorded for account")
    }
}

struct Harness {
    engine: Engine,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    async fn new() -> Self {
        // One pooled connection, so every query sees the same in-memory store.
        let db = kudos_db::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let rates = StaticRates::new([("BRL".to_string(), dec!(5))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = Engine::new(db, Arc::new(rates), notifier.clone());
        Self { engine, notifier }
    }

    /// Loads the standing two-account fixture as the bootstrap caller.
    async fn load_joe_and_jim(&self) {
        let rows = vec![
            row("Joe Doe", "Sales", "Salesman", "joe@doe.com", "USD"),
            row("Jim Doe", "Management", "Manager", "jim@doe.com", "USD"),
        ];
        self.engine
            .load(&Caller::Bootstrap, rows)
            .await
            .expect("fixture load failed");
    }

    /// Signs in with the password captured from the welcome notification.
    async fn authenticate(&self, email: &str) -> Principal {
        let password = self.notifier.password_for(email);
        let caller = self
            .engine
            .gate()
            .resolve(Some(email), Some(&password))
            .await
            .expect("authentication failed");
        match caller {
            Caller::Authenticated(principal) => principal,
            Caller::Bootstrap => panic!("expected an authenticated caller"),
        }
    }
}

fn row(name: &str, department: &str, role: &str, email: &str, currency: &str) -> LoadRow {
    LoadRow {
        name: name.to_string(),
        department: department.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        currency: currency.to_string(),
    }
}

#[tokio::test]
async fn test_bootstrap_load_grants_by_role() {
    let h = Harness::new().await;

    // The very first caller sees an empty store and bypasses authentication.
    let caller = h.engine.gate().resolve(None, None).await.unwrap();
    assert!(matches!(caller, Caller::Bootstrap));

    h.load_joe_and_jim().await;

    let joe = h.authenticate("joe@doe.com").await;
    assert_eq!(joe.capability, Capability::Standard);
    assert_eq!(joe.balance, dec!(500));
    assert!(joe.last_movement.is_some());

    let jim = h.authenticate("jim@doe.com").await;
    assert_eq!(jim.capability, Capability::Elevated);
    assert_eq!(jim.balance, dec!(100));
}

#[tokio::test]
async fn test_load_requires_elevation_once_bootstrapped() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;

    let joe = h.authenticate("joe@doe.com").await;
    let result = h
        .engine
        .load(
            &Caller::Authenticated(joe),
            vec![row("Pam", "Reception", "Receptionist", "pam@doe.com", "USD")],
        )
        .await;
    assert!(matches!(result, Err(AppError::NotAuthorized(_))));

    // Missing credentials are rejected once accounts exist.
    let result = h.engine.gate().resolve(None, None).await;
    assert!(matches!(result, Err(AppError::MissingCredentials(_))));
}

#[tokio::test]
async fn test_reload_updates_profile_without_new_grant() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let jim = h.authenticate("jim@doe.com").await;

    let results = h
        .engine
        .load(
            &Caller::Authenticated(jim.clone()),
            vec![row("Joe Doe", "Marketing", "Salesman", "joe@doe.com", "BRL")],
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].created);

    let rows = h
        .engine
        .read(&jim, AccountFilter::by_email("joe@doe.com"))
        .await
        .unwrap();
    assert_eq!(rows[0].department, "Marketing");
    assert_eq!(rows[0].currency, "BRL");
    // No second initial grant on reload.
    assert_eq!(rows[0].balance, dec!(500));
}

#[tokio::test]
async fn test_load_rejects_malformed_email() {
    let h = Harness::new().await;
    let result = h
        .engine
        .load(
            &Caller::Bootstrap,
            vec![row("Bad", "Sales", "Salesman", "not-an-email", "USD")],
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidEmail(_))));
}

#[tokio::test]
async fn test_elevated_add_by_email_and_department() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let jim = h.authenticate("jim@doe.com").await;

    h.engine
        .add(&jim, dec!(-30), AccountFilter::by_email("joe@doe.com"))
        .await
        .unwrap();
    h.engine
        .add(&jim, dec!(90), AccountFilter::by_department("Management"))
        .await
        .unwrap();

    let rows = h.engine.read(&jim, AccountFilter::default()).await.unwrap();
    let balance = |email: &str| {
        rows.iter()
            .find(|r| r.email == email)
            .map(|r| r.balance)
            .unwrap()
    };
    assert_eq!(balance("joe@doe.com"), dec!(470));
    assert_eq!(balance("jim@doe.com"), dec!(190));
}

#[tokio::test]
async fn test_standard_add_is_funded_by_counter_debit() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let joe = h.authenticate("joe@doe.com").await;

    // A standard caller is pinned to their own account, and the grant is
    // paired with a counter-debit, so the balance nets out.
    h.engine
        .add(&joe, dec!(50), AccountFilter::default())
        .await
        .unwrap();

    let joe = h.authenticate("joe@doe.com").await;
    assert_eq!(joe.balance, dec!(500));

    let movements = h.engine.movements(&joe).await.unwrap();
    assert_eq!(movements.len(), 3);
}

#[tokio::test]
async fn test_insufficient_balance_applies_nothing() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let joe = h.authenticate("joe@doe.com").await;

    let result = h.engine.add(&joe, dec!(600), AccountFilter::default()).await;
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { .. })
    ));

    let joe = h.authenticate("joe@doe.com").await;
    assert_eq!(joe.balance, dec!(500));
    assert_eq!(h.engine.movements(&joe).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_standard_scope_violation_on_foreign_filters() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let joe = h.authenticate("joe@doe.com").await;

    let result = h
        .engine
        .read(&joe, AccountFilter::by_department("Management"))
        .await;
    assert!(matches!(result, Err(AppError::ScopeViolation(_))));

    // No filters resolves to exactly the caller's own row.
    let rows = h.engine.read(&joe, AccountFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "joe@doe.com");
}

#[tokio::test]
async fn test_transfer_full_balance() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let joe = h.authenticate("joe@doe.com").await;

    let receipt = h
        .engine
        .transfer(&joe, dec!(500), "jim@doe.com")
        .await
        .unwrap();
    assert_eq!(receipt.value, dec!(500));
    assert_eq!(receipt.remaining_balance, dec!(0));

    let joe = h.authenticate("joe@doe.com").await;
    let jim = h.authenticate("jim@doe.com").await;
    assert_eq!(joe.balance, dec!(0));
    assert_eq!(jim.balance, dec!(600));

    // Each side of the pair is attributed to the counterpart.
    let joe_movements = h.engine.movements(&joe).await.unwrap();
    assert_eq!(joe_movements[0].value, dec!(-500));
    assert_eq!(joe_movements[0].actor, "jim@doe.com");
    let jim_movements = h.engine.movements(&jim).await.unwrap();
    assert_eq!(jim_movements[0].value, dec!(500));
    assert_eq!(jim_movements[0].actor, "joe@doe.com");
}

#[tokio::test]
async fn test_transfer_rejections_leave_ledger_untouched() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let joe = h.authenticate("joe@doe.com").await;

    let result = h.engine.transfer(&joe, dec!(10), "joe@doe.com").await;
    assert!(matches!(result, Err(AppError::SelfTransfer)));

    let result = h.engine.transfer(&joe, dec!(501), "jim@doe.com").await;
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { .. })
    ));

    let result = h.engine.transfer(&joe, dec!(0), "jim@doe.com").await;
    assert!(matches!(result, Err(AppError::NonPositiveTransfer(_))));

    let result = h.engine.transfer(&joe, dec!(10), "pam@doe.com").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let joe = h.authenticate("joe@doe.com").await;
    assert_eq!(joe.balance, dec!(500));
    assert_eq!(h.engine.movements(&joe).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_movements_are_newest_first() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let jim = h.authenticate("jim@doe.com").await;

    h.engine
        .add(&jim, dec!(-30), AccountFilter::by_email("joe@doe.com"))
        .await
        .unwrap();

    let joe = h.authenticate("joe@doe.com").await;
    let movements = h.engine.movements(&joe).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].value, dec!(-30));
    assert_eq!(movements[0].actor, "jim@doe.com");
    assert_eq!(movements[1].value, dec!(500));
    assert_eq!(movements[1].actor, "system");
    assert!(movements[0].date >= movements[1].date);
    // USD converts at the identity rate.
    assert_eq!(movements[0].converted, movements[0].value);
}

#[tokio::test]
async fn test_conversion_and_degraded_rows() {
    let h = Harness::new().await;
    let rows = vec![
        row("Jim Doe", "Management", "Manager", "jim@doe.com", "USD"),
        row("Ana Reis", "Sales", "Salesman", "ana@doe.com", "BRL"),
        row("Eva Novak", "Sales", "Salesman", "eva@doe.com", "XYZ"),
    ];
    h.engine.load(&Caller::Bootstrap, rows).await.unwrap();
    let jim = h.authenticate("jim@doe.com").await;

    let rows = h.engine.read(&jim, AccountFilter::default()).await.unwrap();
    let by_email = |email: &str| rows.iter().find(|r| r.email == email).unwrap();

    let jim_row = by_email("jim@doe.com");
    assert_eq!(jim_row.converted, jim_row.balance);
    assert!(!jim_row.degraded);

    let ana = by_email("ana@doe.com");
    assert_eq!(ana.converted, dec!(2500)); // 500 points at rate 5
    assert!(!ana.degraded);

    // The unknown currency degrades its row; the read still succeeds.
    let eva = by_email("eva@doe.com");
    assert_eq!(eva.converted, dec!(0));
    assert!(eva.degraded);
}

#[tokio::test]
async fn test_gate_failure_steps() {
    let h = Harness::new().await;
    h.load_joe_and_jim().await;
    let gate = h.engine.gate();

    let result = gate.resolve(Some("joe@doe.com"), None).await;
    assert!(matches!(result, Err(AppError::MissingCredentials(_))));

    let result = gate.resolve(Some("pam@doe.com"), Some("whatever")).await;
    assert!(matches!(result, Err(AppError::UnknownIdentity(_))));

    let result = gate.resolve(Some("joe@doe.com"), Some("wrong")).await;
    assert!(matches!(result, Err(AppError::BadSecret)));
}
