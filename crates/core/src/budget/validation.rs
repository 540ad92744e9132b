//! Detail batch validation.
//!
//! Rules run in a fixed order and stop at the first failure:
//!
//! 1. the batch is not empty
//! 2. each detail is exactly one of limit or future expense
//! 3. at least one limit is present
//! 4. no category has two limits
//! 5. amounts are positive; zero-valued entries are dropped
//! 6. future expenses of a category fit under that category's limit
//!
//! Rules 1, 3 and 6 are batch-consistency rules and can be skipped by the
//! caller. Variant shape, duplicate limits, amounts, category membership
//! and expiration dates are always checked.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletify_shared::types::{CategoryId, validate_amount};

use super::error::BudgetError;
use super::period::BudgetPeriod;
use super::types::{DetailInput, FutureExpenseDetail, NewDetail};

/// Validates a detail batch against a budget window.
#[derive(Debug)]
pub struct DetailValidator<'a> {
    period: BudgetPeriod,
    categories: &'a HashSet<CategoryId>,
    preserved: &'a [FutureExpenseDetail],
    skip_batch_rules: bool,
}

impl<'a> DetailValidator<'a> {
    /// Creates a validator for `period`, accepting only `categories`.
    #[must_use]
    pub const fn new(period: BudgetPeriod, categories: &'a HashSet<CategoryId>) -> Self {
        Self {
            period,
            categories,
            preserved: &[],
            skip_batch_rules: false,
        }
    }

    /// Future expenses already stored on the budget that survive an update.
    ///
    /// They count towards rule 6 and must still expire inside the window.
    #[must_use]
    pub fn with_preserved(mut self, preserved: &'a [FutureExpenseDetail]) -> Self {
        self.preserved = preserved;
        self
    }

    /// Skips the batch-consistency rules.
    #[must_use]
    pub fn skip_batch_rules(mut self, skip: bool) -> Self {
        self.skip_batch_rules = skip;
        self
    }

    /// Validates `details` and classifies them.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation found.
    pub fn validate(&self, details: &[DetailInput]) -> Result<Vec<NewDetail>, BudgetError> {
        // Rule 1
        if details.is_empty() && !self.skip_batch_rules {
            return Err(BudgetError::EmptyBudget);
        }

        // Rule 2
        let classified = details
            .iter()
            .map(|d| self.classify(d))
            .collect::<Result<Vec<_>, _>>()?;

        // Rule 3
        let has_limit = classified
            .iter()
            .any(|d| matches!(d, NewDetail::Limit { .. }));
        if !has_limit && !self.skip_batch_rules {
            return Err(BudgetError::NoLimitDetail);
        }

        // Rule 4
        let mut limited = HashSet::new();
        for detail in &classified {
            if let NewDetail::Limit { category_id, .. } = detail
                && !limited.insert(*category_id)
            {
                return Err(BudgetError::DuplicateCategoryLimit(*category_id));
            }
        }

        // Rule 5
        let mut accepted = Vec::with_capacity(classified.len());
        for detail in classified {
            let amount = match &detail {
                NewDetail::Limit { limit, .. } => *limit,
                NewDetail::FutureExpense { value, .. } => *value,
            };
            if amount.is_zero() {
                continue;
            }
            validate_amount(amount)?;

            if let NewDetail::FutureExpense {
                expiration_date, ..
            } = &detail
            {
                self.ensure_in_window(*expiration_date)?;
            }
            accepted.push(detail);
        }

        // Rule 3 again, a batch of zero-valued limits keeps none of them.
        if !self.skip_batch_rules
            && !accepted
                .iter()
                .any(|d| matches!(d, NewDetail::Limit { .. }))
        {
            return Err(BudgetError::NoLimitDetail);
        }

        for preserved in self.preserved {
            self.ensure_in_window(preserved.expiration_date)?;
        }

        // Rule 6
        if !self.skip_batch_rules {
            self.check_future_expense_totals(&accepted)?;
        }

        Ok(accepted)
    }

    fn classify(&self, input: &DetailInput) -> Result<NewDetail, BudgetError> {
        if input.limit.is_some() == input.value.is_some() {
            return Err(BudgetError::AmbiguousDetail(input.category_id));
        }
        if !self.categories.contains(&input.category_id) {
            return Err(BudgetError::CategoryNotFound(input.category_id));
        }

        match (input.limit, input.value) {
            (Some(limit), _) => Ok(NewDetail::Limit {
                category_id: input.category_id,
                limit,
            }),
            (None, Some(value)) => {
                let name = input
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or(BudgetError::MissingFutureExpenseField { field: "name" })?;
                let expiration_date = input
                    .expiration_date
                    .ok_or(BudgetError::MissingFutureExpenseField {
                        field: "expiration_date",
                    })?;
                Ok(NewDetail::FutureExpense {
                    category_id: input.category_id,
                    name: name.to_string(),
                    value,
                    expiration_date,
                })
            }
            (None, None) => Err(BudgetError::AmbiguousDetail(input.category_id)),
        }
    }

    fn ensure_in_window(&self, expiration_date: NaiveDate) -> Result<(), BudgetError> {
        if self.period.contains(expiration_date) {
            Ok(())
        } else {
            Err(BudgetError::DetailOutOfBudgetRange { expiration_date })
        }
    }

    fn check_future_expense_totals(&self, accepted: &[NewDetail]) -> Result<(), BudgetError> {
        let limits: HashMap<CategoryId, Decimal> = accepted
            .iter()
            .filter_map(|d| match d {
                NewDetail::Limit { category_id, limit } => Some((*category_id, *limit)),
                NewDetail::FutureExpense { .. } => None,
            })
            .collect();

        // Categories in first-seen order so the reported one is deterministic.
        let mut order: Vec<CategoryId> = Vec::new();
        let mut totals: HashMap<CategoryId, Decimal> = HashMap::new();
        let new_future = accepted.iter().filter_map(|d| match d {
            NewDetail::FutureExpense {
                category_id, value, ..
            } => Some((*category_id, *value)),
            NewDetail::Limit { .. } => None,
        });
        let kept_future = self.preserved.iter().map(|d| (d.category_id, d.value));

        for (category_id, value) in kept_future.chain(new_future) {
            let total = totals.entry(category_id).or_insert_with(|| {
                order.push(category_id);
                Decimal::ZERO
            });
            *total += value;
        }

        for category_id in order {
            let total = totals[&category_id];
            let Some(&limit) = limits.get(&category_id) else {
                return Err(BudgetError::NoLimitForFutureExpense(category_id));
            };
            if total > limit {
                return Err(BudgetError::FutureExpenseExceedsLimit {
                    category_id,
                    total,
                    limit,
                });
            }
        }

        Ok(())
    }
}
