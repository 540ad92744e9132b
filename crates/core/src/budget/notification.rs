//! Reminder predicate for upcoming future expenses.

use chrono::NaiveDate;
use walletify_shared::types::UserId;

use super::types::{Detail, FutureExpenseDetail};

/// Default number of days ahead a reminder is due.
pub const DEFAULT_LEAD_DAYS: i64 = 3;

/// Returns true when an unsettled future expense expires exactly
/// `lead_days` after `today`.
#[must_use]
pub fn should_notify(detail: &Detail, today: NaiveDate, lead_days: i64) -> bool {
    match detail {
        Detail::FutureExpense(fe) => is_due(fe, today, lead_days),
        Detail::Limit(_) => false,
    }
}

fn is_due(detail: &FutureExpenseDetail, today: NaiveDate, lead_days: i64) -> bool {
    !detail.expended && (detail.expiration_date - today).num_days() == lead_days
}

/// Keeps the future expenses of `details` that are due for a reminder.
#[must_use]
pub fn due_details(details: &[Detail], today: NaiveDate, lead_days: i64) -> Vec<FutureExpenseDetail> {
    details
        .iter()
        .filter_map(|d| match d {
            Detail::FutureExpense(fe) if is_due(fe, today, lead_days) => Some(fe.clone()),
            _ => None,
        })
        .collect()
}

/// Reminders for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderGroup {
    /// Recipient.
    pub user_id: UserId,
    /// Recipient address, when known.
    pub email: Option<String>,
    /// Future expenses due for a reminder.
    pub details: Vec<FutureExpenseDetail>,
}
