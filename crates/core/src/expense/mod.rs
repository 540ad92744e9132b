//! Expense ledger rules.
//!
//! Expenses are dated money movements against one category. The ledger is
//! read by the budget engine for spent aggregates and written only by user
//! action or by settling a future expense.

pub mod error;
pub mod types;
pub mod validation;

pub use error::ExpenseError;
pub use types::{Expense, ExpenseFilter, ExpenseInput};
pub use validation::{spent_by_category, spent_in, validate_expense, validate_filter};
