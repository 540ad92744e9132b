//! Shared expenses.
//!
//! An owner records an expense on behalf of a recipient, who may edit, accept
//! or delete it. Shared expenses stay out of the ledger and out of budget
//! aggregates.

pub mod error;
pub mod service;
pub mod types;

pub use error::SharedExpenseError;
pub use service::SharedExpenseService;
pub use types::{
    SharedExpense, SharedExpenseEdit, SharedExpenseFilter, SharedExpenseInput, SharedScope,
};
