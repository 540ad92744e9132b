//! Core business logic for Walletify.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Budget windows, detail validation, spent-vs-limit aggregation
//! - `category` - Category registry rules (effective set, naming, ownership)
//! - `expense` - Expense ledger write rules and aggregation helpers
//! - `shared_expense` - Expenses recorded for another user

pub mod budget;
pub mod category;
pub mod expense;
pub mod shared_expense;
