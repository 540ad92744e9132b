//! Budget lifecycle and reconciliation.
//!
//! A budget is a closed date window with a set of details: per-category
//! limits and scheduled future expenses. This module holds the pure rules;
//! persistence and transactions live in the repository layer.

pub mod error;
pub mod notification;
pub mod period;
pub mod service;
pub mod types;
pub mod validation;


#[cfg(test)]
mod validation_props;

pub use error::BudgetError;
pub use notification::{DEFAULT_LEAD_DAYS, ReminderGroup, due_details, should_notify};
pub use period::BudgetPeriod;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetInput, BudgetView, Detail, DetailInput, DetailKind, DetailView,
    FutureExpenseDetail, LimitDetail, NewDetail,
};
pub use validation::DetailValidator;
