//! Write-time rules and aggregates for the expense ledger.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletify_shared::types::{AmountError, CategoryId, validate_amount};

use super::error::ExpenseError;
use super::types::{Expense, ExpenseFilter, ExpenseInput};

/// Maximum length of an expense name.
pub const MAX_NAME_LEN: usize = 50;

/// Validates an expense before it is written.
///
/// Category membership is checked by the caller, which owns the user's
/// effective category set.
///
/// # Errors
///
/// Returns the first failing rule: date, value, then name.
pub fn validate_expense(input: &ExpenseInput, today: NaiveDate) -> Result<(), ExpenseError> {
    if input.date > today {
        return Err(ExpenseError::FutureDate);
    }

    validate_amount(input.value).map_err(|e| match e {
        AmountError::NonPositive => ExpenseError::NonPositiveValue,
        AmountError::TooPrecise => ExpenseError::InvalidPrecision,
        AmountError::TooLarge => ExpenseError::AmountTooLarge,
    })?;

    let name_len = input.name.trim().chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(ExpenseError::InvalidName { max: MAX_NAME_LEN });
    }

    Ok(())
}

/// Validates a filter query.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidRange` if `from` is after `to`.
pub fn validate_filter(filter: &ExpenseFilter) -> Result<(), ExpenseError> {
    if filter.from > filter.to {
        return Err(ExpenseError::InvalidRange);
    }
    Ok(())
}

/// Sums the expenses of one category dated within `[from, to]`.
#[must_use]
pub fn spent_in(expenses: &[Expense], category: CategoryId, from: NaiveDate, to: NaiveDate) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.category_id == category && e.date >= from && e.date <= to)
        .map(|e| e.value)
        .sum()
}

/// Sums expenses dated within `[from, to]`, grouped by category.
#[must_use]
pub fn spent_by_category(
    expenses: &[Expense],
    from: NaiveDate,
    to: NaiveDate,
) -> HashMap<CategoryId, Decimal> {
    let mut totals: HashMap<CategoryId, Decimal> = HashMap::new();
    for expense in expenses.iter().filter(|e| e.date >= from && e.date <= to) {
        *totals.entry(expense.category_id).or_default() += expense.value;
    }
    totals
}
