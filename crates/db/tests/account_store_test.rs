//! Integration tests for the account store, on an in-memory sqlite store.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use sea_orm::TransactionTrait;

use kudos_core::auth::AccountFilter;
use kudos_db::migration::{Migrator, MigratorTrait};
use kudos_db::{AccountRepository, CredentialRepository, StoreError};
use kudos_db::repositories::{NewAccount, ProfileUpdate};

async fn test_db() -> DatabaseConnection {
    // One pooled connection, so every query sees the same in-memory store.
    let db = kudos_db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

fn joe() -> NewAccount {
    NewAccount {
        email: "joe@doe.com".to_string(),
        name: "Joe Doe".to_string(),
        department: "Sales".to_string(),
        role: "Salesman".to_string(),
        currency: "USD".to_string(),
    }
}

#[tokio::test]
async fn test_insert_and_find_by_email() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    let account = repo.insert_account(&txn, joe()).await.unwrap();
    txn.commit().await.unwrap();

    let found = repo
        .find_by_email("joe@doe.com")
        .await
        .unwrap()
        .expect("account should exist");
    assert_eq!(found.id, account.id);
    assert_eq!(found.department, "Sales");

    assert!(repo.find_by_email("nobody@doe.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_is_empty_flips_after_first_account() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    assert!(repo.is_empty().await.unwrap());

    let txn = db.begin().await.unwrap();
    repo.insert_account(&txn, joe()).await.unwrap();
    txn.commit().await.unwrap();

    assert!(!repo.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_append_movement_recomputes_balance() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    let account = repo.insert_account(&txn, joe()).await.unwrap();
    repo.append_movement(&txn, account.id, dec!(500), "system")
        .await
        .unwrap();
    repo.append_movement(&txn, account.id, dec!(-30), "jim@doe.com")
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert_eq!(repo.get_balance(account.id).await.unwrap(), dec!(470));

    let movements = repo.list_movements(account.id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].value, dec!(500));
    assert_eq!(movements[1].value, dec!(-30));
    assert_eq!(movements[1].actor, "jim@doe.com");
}

#[tokio::test]
async fn test_append_movement_locks_the_account_row_first() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    // The lock lookup runs before the insert, so an unknown account is
    // rejected up front rather than failing on the foreign key.
    let txn = db.begin().await.unwrap();
    let result = repo
        .append_movement(&txn, uuid::Uuid::new_v4(), dec!(10), "system")
        .await;
    assert!(matches!(result, Err(StoreError::AccountNotFound(_))));
    txn.rollback().await.unwrap();
}

#[tokio::test]
async fn test_balance_for_unknown_account_is_zero() {
    let db = test_db().await;
    let repo = AccountRepository::new(db);

    let balance = repo.get_balance(uuid::Uuid::new_v4()).await.unwrap();
    assert_eq!(balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_uncommitted_movements_roll_back() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    let account = repo.insert_account(&txn, joe()).await.unwrap();
    repo.append_movement(&txn, account.id, dec!(500), "system")
        .await
        .unwrap();
    txn.commit().await.unwrap();

    // Partial batch that never commits.
    let txn = db.begin().await.unwrap();
    repo.append_movement(&txn, account.id, dec!(100), "jim@doe.com")
        .await
        .unwrap();
    txn.rollback().await.unwrap();

    assert_eq!(repo.get_balance(account.id).await.unwrap(), dec!(500));
    assert_eq!(repo.list_movements(account.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_with_filters() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    repo.insert_account(&txn, joe()).await.unwrap();
    repo.insert_account(
        &txn,
        NewAccount {
            email: "jim@doe.com".to_string(),
            name: "Jim Doe".to_string(),
            department: "Management".to_string(),
            role: "Manager".to_string(),
            currency: "BRL".to_string(),
        },
    )
    .await
    .unwrap();
    txn.commit().await.unwrap();

    let all = repo.list(&AccountFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let sales = repo
        .list(&AccountFilter::by_department("Sales"))
        .await
        .unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].email, "joe@doe.com");

    let jim = repo
        .list(&AccountFilter::by_email("jim@doe.com"))
        .await
        .unwrap();
    assert_eq!(jim.len(), 1);

    let mut currencies = repo.distinct_currencies().await.unwrap();
    currencies.sort();
    assert_eq!(currencies, vec!["BRL".to_string(), "USD".to_string()]);
}

#[tokio::test]
async fn test_update_profile_in_place() {
    let db = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    let account = repo.insert_account(&txn, joe()).await.unwrap();
    txn.commit().await.unwrap();

    let txn = db.begin().await.unwrap();
    let updated = repo
        .update_profile(
            &txn,
            account.clone(),
            ProfileUpdate {
                department: "Management".to_string(),
                role: "Manager".to_string(),
                currency: "EUR".to_string(),
            },
        )
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert_eq!(updated.id, account.id);
    assert_eq!(updated.department, "Management");
    assert_eq!(updated.role, "Manager");
    assert_eq!(updated.currency, "EUR");
}

#[tokio::test]
async fn test_credentials_round_trip() {
    let db = test_db().await;
    let accounts = AccountRepository::new(db.clone());
    let credentials = CredentialRepository::new(db.clone());

    let txn = db.begin().await.unwrap();
    let account = accounts.insert_account(&txn, joe()).await.unwrap();
    credentials
        .insert(&txn, account.id, "$argon2id$test-hash")
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let stored = credentials
        .find_by_account(account.id)
        .await
        .unwrap()
        .expect("credential should exist");
    assert_eq!(stored.password_hash, "$argon2id$test-hash");
}
