//! Property-based tests for budget windows, validation and aggregation.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use walletify_shared::types::{BudgetId, CategoryId, DetailId, ExpenseId, UserId};

use super::error::BudgetError;
use super::period::BudgetPeriod;
use super::service::BudgetService;
use super::types::{Budget, Detail, DetailInput, LimitDetail};
use super::validation::DetailValidator;
use crate::expense::Expense;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Strategy for a window starting within two years of the base date.
fn period_strategy() -> impl Strategy<Value = BudgetPeriod> {
    (0i64..730, 0i64..120).prop_map(|(start, len)| {
        let from = base_date() + Duration::days(start);
        BudgetPeriod::new(from, from + Duration::days(len)).unwrap()
    })
}

/// Strategy for a positive two-decimal amount.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_budget(user: UserId, period: BudgetPeriod) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: user,
        period,
        created_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Overlap is symmetric and agrees with a day-by-day intersection.
    #[test]
    fn prop_overlap_symmetric_and_exact(a in period_strategy(), b in period_strategy()) {
        let shares_a_day = a.initial_date().max(b.initial_date()) <= a.final_date().min(b.final_date());
        prop_assert_eq!(a.overlaps(&b), shares_a_day);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Back-to-back windows never collide; creating them in sequence succeeds.
    #[test]
    fn prop_sequential_windows_accepted(lengths in prop::collection::vec(0i64..60, 1..12)) {
        let user = UserId::new();
        let mut budgets = Vec::new();
        let mut from = base_date();

        for len in lengths {
            let period = BudgetPeriod::new(from, from + Duration::days(len)).unwrap();
            prop_assert!(BudgetService::ensure_no_overlap(&period, &budgets, None).is_ok());
            budgets.push(make_budget(user, period));
            from = period.final_date() + Duration::days(1);
        }
    }

    /// Any window sharing a day with an existing one is rejected.
    #[test]
    fn prop_colliding_window_rejected(existing in period_strategy(), offset in 0i64..120, len in 0i64..120) {
        let user = UserId::new();
        let first = make_budget(user, existing);
        let span = (existing.final_date() - existing.initial_date()).num_days();
        let start = existing.initial_date() + Duration::days(offset.min(span));
        let candidate = BudgetPeriod::new(start, start + Duration::days(len)).unwrap();

        prop_assert_eq!(
            BudgetService::ensure_no_overlap(&candidate, std::slice::from_ref(&first), None),
            Err(BudgetError::OverlappingBudget { conflicting: first.id })
        );
    }

    /// total_limit is the sum of limits whatever their order.
    #[test]
    fn prop_total_limit_order_independent(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
        let budget = make_budget(UserId::new(), BudgetPeriod::new(base_date(), base_date()).unwrap());
        let mut details: Vec<Detail> = amounts
            .iter()
            .map(|a| Detail::Limit(LimitDetail {
                id: DetailId::new(),
                budget_id: budget.id,
                category_id: CategoryId::new(),
                limit: *a,
            }))
            .collect();
        let expected: Decimal = amounts.iter().copied().sum();

        let forward = BudgetService::build_view(&budget, &details, &[], &[], base_date());
        details.reverse();
        let backward = BudgetService::build_view(&budget, &details, &[], &[], base_date());

        prop_assert_eq!(forward.total_limit, expected);
        prop_assert_eq!(backward.total_limit, expected);
    }

    /// total_spent only counts limited categories inside the window.
    #[test]
    fn prop_total_spent_matches_filtered_sum(
        period in period_strategy(),
        entries in prop::collection::vec((0usize..3, -30i64..150, amount_strategy()), 0..25),
    ) {
        let user = UserId::new();
        let budget = make_budget(user, period);
        let cats = [CategoryId::new(), CategoryId::new(), CategoryId::new()];
        // Only the first two categories carry a limit.
        let details: Vec<Detail> = cats[..2]
            .iter()
            .map(|c| Detail::Limit(LimitDetail {
                id: DetailId::new(),
                budget_id: budget.id,
                category_id: *c,
                limit: Decimal::ONE_HUNDRED,
            }))
            .collect();

        let expenses: Vec<Expense> = entries
            .iter()
            .map(|(cat, day, value)| Expense {
                id: ExpenseId::new(),
                user_id: user,
                category_id: cats[*cat],
                name: "e".to_string(),
                value: *value,
                date: period.initial_date() + Duration::days(*day),
                future_expense: false,
                created_at: Utc::now(),
            })
            .collect();

        let expected: Decimal = expenses
            .iter()
            .filter(|e| e.category_id != cats[2] && period.contains(e.date))
            .map(|e| e.value)
            .sum();

        let view = BudgetService::build_view(&budget, &details, &expenses, &[], base_date());
        prop_assert_eq!(view.total_spent, expected);
    }

    /// A batch of distinct positive limits always validates unchanged.
    #[test]
    fn prop_distinct_limits_validate(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
        let cats: Vec<CategoryId> = amounts.iter().map(|_| CategoryId::new()).collect();
        let set: HashSet<CategoryId> = cats.iter().copied().collect();
        let inputs: Vec<DetailInput> = cats
            .iter()
            .zip(&amounts)
            .map(|(c, a)| DetailInput::limit(*c, *a))
            .collect();
        let period = BudgetPeriod::new(base_date(), base_date()).unwrap();

        let accepted = DetailValidator::new(period, &set).validate(&inputs);
        prop_assert_eq!(accepted.map(|v| v.len()), Ok(amounts.len()));
    }

    /// Future expenses are accepted exactly when their sum fits the limit.
    #[test]
    fn prop_future_expense_sum_against_limit(
        limit in amount_strategy(),
        values in prop::collection::vec(amount_strategy(), 1..6),
    ) {
        let cat = CategoryId::new();
        let set: HashSet<CategoryId> = std::iter::once(cat).collect();
        let period = BudgetPeriod::new(base_date(), base_date() + Duration::days(30)).unwrap();
        let mut inputs = vec![DetailInput::limit(cat, limit)];
        inputs.extend(
            values
                .iter()
                .map(|v| DetailInput::future_expense(cat, "planned", *v, base_date())),
        );
        let total: Decimal = values.iter().copied().sum();

        let result = DetailValidator::new(period, &set).validate(&inputs);
        if total <= limit {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result,
                Err(BudgetError::FutureExpenseExceedsLimit { category_id: cat, total, limit })
            );
        }
    }
}
