//! Shared expense rules.

use std::collections::HashSet;

use chrono::NaiveDate;
use walletify_shared::types::{CategoryId, UserId};

use super::error::SharedExpenseError;
use super::types::{SharedExpense, SharedExpenseFilter, SharedScope};
use crate::expense::{ExpenseError, ExpenseInput, validate_expense};

/// Stateless checks for shared expenses.
pub struct SharedExpenseService;

impl SharedExpenseService {
    /// Applies the ledger write rules, then the two-user category rule.
    ///
    /// `owner_categories` and `recipient_categories` are the effective sets
    /// of both users.
    ///
    /// # Errors
    ///
    /// Returns the first failing ledger rule, or `CategoryNotFound` when
    /// either user cannot see the category.
    pub fn validate(
        input: &ExpenseInput,
        owner_categories: &HashSet<CategoryId>,
        recipient_categories: &HashSet<CategoryId>,
        today: NaiveDate,
    ) -> Result<(), SharedExpenseError> {
        validate_expense(input, today)?;
        if !owner_categories.contains(&input.category_id)
            || !recipient_categories.contains(&input.category_id)
        {
            return Err(SharedExpenseError::CategoryNotFound(input.category_id));
        }
        Ok(())
    }

    /// Rejects sharing with oneself.
    ///
    /// # Errors
    ///
    /// Returns `CannotShareWithSelf` when both ids match.
    pub fn ensure_counterparty(owner: UserId, recipient: UserId) -> Result<(), SharedExpenseError> {
        if owner == recipient {
            return Err(SharedExpenseError::CannotShareWithSelf);
        }
        Ok(())
    }

    /// Owner and recipient may read.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for anyone else.
    pub fn ensure_party(expense: &SharedExpense, user: UserId) -> Result<(), SharedExpenseError> {
        if expense.owner_id == user || expense.recipient_id == user {
            Ok(())
        } else {
            Err(SharedExpenseError::Forbidden)
        }
    }

    /// Only the recipient may edit, accept or delete.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for anyone else, the owner included.
    pub fn ensure_recipient(
        expense: &SharedExpense,
        user: UserId,
    ) -> Result<(), SharedExpenseError> {
        if expense.recipient_id == user {
            Ok(())
        } else {
            Err(SharedExpenseError::Forbidden)
        }
    }

    /// Validates a filter query.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `from` is after `to`.
    pub fn validate_filter(filter: &SharedExpenseFilter) -> Result<(), SharedExpenseError> {
        if filter.from > filter.to {
            return Err(ExpenseError::InvalidRange.into());
        }
        Ok(())
    }

    /// Returns true if `expense` is on the filter's side for `user` and
    /// passes its date and category bounds.
    #[must_use]
    pub fn matches(filter: &SharedExpenseFilter, user: UserId, expense: &SharedExpense) -> bool {
        let side = match filter.scope {
            SharedScope::Mine => expense.owner_id,
            SharedScope::SharedWithMe => expense.recipient_id,
        };
        side == user
            && expense.date >= filter.from
            && expense.date <= filter.to
            && filter.category_id.is_none_or(|c| c == expense.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use walletify_shared::types::SharedExpenseId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn shared(owner: UserId, recipient: UserId, category: CategoryId, day: &str) -> SharedExpense {
        SharedExpense {
            id: SharedExpenseId::new(),
            owner_id: owner,
            recipient_id: recipient,
            category_id: category,
            name: "dinner".to_string(),
            value: dec!(2500),
            date: date(day),
            accepted: false,
            created_at: Utc::now(),
        }
    }

    fn input(category: CategoryId, value: Decimal, day: &str) -> ExpenseInput {
        ExpenseInput {
            category_id: category,
            name: "dinner".to_string(),
            value,
            date: date(day),
        }
    }

    #[test]
    fn test_category_must_be_visible_to_both() {
        let common = CategoryId::new();
        let private = CategoryId::new();
        let owner: HashSet<CategoryId> = [common, private].into_iter().collect();
        let recipient: HashSet<CategoryId> = std::iter::once(common).collect();
        let today = date("2024-06-12");

        assert_eq!(
            SharedExpenseService::validate(&input(common, dec!(10), "2024-06-12"), &owner, &recipient, today),
            Ok(())
        );
        assert_eq!(
            SharedExpenseService::validate(&input(private, dec!(10), "2024-06-12"), &owner, &recipient, today),
            Err(SharedExpenseError::CategoryNotFound(private))
        );
    }

    #[rstest]
    #[case(dec!(10), "2988-01-01", ExpenseError::FutureDate)]
    #[case(dec!(-58.25), "2015-01-01", ExpenseError::NonPositiveValue)]
    fn test_ledger_rules_apply(
        #[case] value: Decimal,
        #[case] day: &str,
        #[case] expected: ExpenseError,
    ) {
        let category = CategoryId::new();
        let set: HashSet<CategoryId> = std::iter::once(category).collect();
        let err =
            SharedExpenseService::validate(&input(category, value, day), &set, &set, date("2024-06-12"))
                .unwrap_err();
        assert_eq!(err.code(), expected.code());
        assert_eq!(err, SharedExpenseError::Invalid(expected));
    }

    #[test]
    fn test_cannot_share_with_self() {
        let user = UserId::new();
        assert_eq!(
            SharedExpenseService::ensure_counterparty(user, user),
            Err(SharedExpenseError::CannotShareWithSelf)
        );
        assert!(SharedExpenseService::ensure_counterparty(user, UserId::new()).is_ok());
    }

    #[test]
    fn test_only_recipient_may_change() {
        let owner = UserId::new();
        let recipient = UserId::new();
        let stranger = UserId::new();
        let expense = shared(owner, recipient, CategoryId::new(), "2024-06-12");

        assert!(SharedExpenseService::ensure_recipient(&expense, recipient).is_ok());
        assert_eq!(
            SharedExpenseService::ensure_recipient(&expense, owner),
            Err(SharedExpenseError::Forbidden)
        );

        assert!(SharedExpenseService::ensure_party(&expense, owner).is_ok());
        assert!(SharedExpenseService::ensure_party(&expense, recipient).is_ok());
        assert_eq!(
            SharedExpenseService::ensure_party(&expense, stranger),
            Err(SharedExpenseError::Forbidden)
        );
    }

    #[test]
    fn test_filter_scope_dates_and_category() {
        let me = UserId::new();
        let friend = UserId::new();
        let food = CategoryId::new();
        let rent = CategoryId::new();
        let mine = SharedExpenseFilter {
            scope: SharedScope::Mine,
            from: date("2022-06-12"),
            to: date("2022-06-12"),
            category_id: None,
        };

        assert!(SharedExpenseService::matches(&mine, me, &shared(me, friend, food, "2022-06-12")));
        assert!(!SharedExpenseService::matches(&mine, me, &shared(friend, me, food, "2022-06-12")));
        assert!(!SharedExpenseService::matches(&mine, me, &shared(me, friend, food, "2022-06-13")));

        let with_me = SharedExpenseFilter {
            scope: SharedScope::SharedWithMe,
            category_id: Some(rent),
            ..mine
        };
        assert!(SharedExpenseService::matches(&with_me, me, &shared(friend, me, rent, "2022-06-12")));
        assert!(!SharedExpenseService::matches(&with_me, me, &shared(friend, me, food, "2022-06-12")));
    }

    #[test]
    fn test_inverted_filter_range() {
        let filter = SharedExpenseFilter {
            scope: SharedScope::Mine,
            from: date("2022-06-13"),
            to: date("2022-06-12"),
            category_id: None,
        };
        assert_eq!(
            SharedExpenseService::validate_filter(&filter),
            Err(SharedExpenseError::Invalid(ExpenseError::InvalidRange))
        );
    }
}
