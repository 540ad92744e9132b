//! Shared setup for repository integration tests.
//!
//! Tests run the real migrator against an in-memory SQLite database unless
//! `TEST_DATABASE_URL` points somewhere else.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use walletify_core::category::Category;
use walletify_db::migration::Migrator;
use walletify_db::repositories::DEFAULT_STATIC_CATEGORIES;
use walletify_db::{CategoryRepository, UserRepository};
use walletify_shared::types::UserId;

/// Connects, migrates and seeds the static categories.
pub async fn setup() -> DatabaseConnection {
    let url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    // One connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    CategoryRepository::new(db.clone())
        .seed_static(&DEFAULT_STATIC_CATEGORIES)
        .await
        .expect("Failed to seed static categories");
    db
}

/// Provisions a fresh user.
pub async fn new_user(db: &DatabaseConnection) -> UserId {
    let id = UserId::new();
    UserRepository::new(db.clone())
        .ensure_exists(id, Some(&format!("{id}@example.com")))
        .await
        .expect("Failed to create user");
    id
}

/// The user's effective categories.
pub async fn categories(db: &DatabaseConnection, user: UserId) -> Vec<Category> {
    CategoryRepository::new(db.clone())
        .effective_categories(user)
        .await
        .expect("Failed to load categories")
}

/// Parses a `YYYY-MM-DD` literal.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date literal")
}
