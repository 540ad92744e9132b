//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use walletify_shared::types::{BudgetId, CategoryId, DetailId, UserId};

use super::period::BudgetPeriod;

/// A user's spending plan over a closed date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Date window.
    pub period: BudgetPeriod,
    /// Creation timestamp, used for listing order.
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// A budget is active while today lies inside its window.
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.period.contains(today)
    }

    /// A budget is editable until its first day arrives.
    ///
    /// Once begun it stays locked, even after it has ended.
    #[must_use]
    pub fn is_editable(&self, today: NaiveDate) -> bool {
        !self.is_active(today) && !self.period.has_begun(today)
    }
}

/// Detail variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    /// Spending cap for one category.
    Limit,
    /// Scheduled expense inside the budget window.
    FutureExpense,
}

impl DetailKind {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::FutureExpense => "future_expense",
        }
    }
}

/// Spending cap for one category within a budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitDetail {
    /// Detail ID.
    pub id: DetailId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Category capped.
    pub category_id: CategoryId,
    /// Cap amount.
    pub limit: Decimal,
}

/// An anticipated expense scheduled inside a budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureExpenseDetail {
    /// Detail ID.
    pub id: DetailId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Category the expense will be charged to.
    pub category_id: CategoryId,
    /// Short description.
    pub name: String,
    /// Expected amount.
    pub value: Decimal,
    /// Day the expense is due.
    pub expiration_date: NaiveDate,
    /// Set once the expense has been settled into the ledger.
    pub expended: bool,
}

/// A stored budget detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Spending cap.
    Limit(LimitDetail),
    /// Scheduled expense.
    FutureExpense(FutureExpenseDetail),
}

impl Detail {
    /// Detail ID.
    #[must_use]
    pub const fn id(&self) -> DetailId {
        match self {
            Self::Limit(d) => d.id,
            Self::FutureExpense(d) => d.id,
        }
    }

    /// Owning budget.
    #[must_use]
    pub const fn budget_id(&self) -> BudgetId {
        match self {
            Self::Limit(d) => d.budget_id,
            Self::FutureExpense(d) => d.budget_id,
        }
    }

    /// Referenced category.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        match self {
            Self::Limit(d) => d.category_id,
            Self::FutureExpense(d) => d.category_id,
        }
    }

    /// Variant tag.
    #[must_use]
    pub const fn kind(&self) -> DetailKind {
        match self {
            Self::Limit(_) => DetailKind::Limit,
            Self::FutureExpense(_) => DetailKind::FutureExpense,
        }
    }
}

/// A detail as submitted by a client, not yet classified.
///
/// A limit carries `limit`; a future expense carries `value`, `name` and
/// `expiration_date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailInput {
    /// Referenced category.
    pub category_id: CategoryId,
    /// Cap amount, for limits.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit: Option<Decimal>,
    /// Expected amount, for future expenses.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    /// Description, for future expenses.
    #[serde(default)]
    pub name: Option<String>,
    /// Due day, for future expenses.
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl DetailInput {
    /// A limit detail input.
    #[must_use]
    pub fn limit(category_id: CategoryId, limit: Decimal) -> Self {
        Self {
            category_id,
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// A future-expense detail input.
    #[must_use]
    pub fn future_expense(
        category_id: CategoryId,
        name: impl Into<String>,
        value: Decimal,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            category_id,
            value: Some(value),
            name: Some(name.into()),
            expiration_date: Some(expiration_date),
            ..Self::default()
        }
    }
}

/// A validated detail ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewDetail {
    /// Spending cap.
    Limit {
        /// Category capped.
        category_id: CategoryId,
        /// Cap amount.
        limit: Decimal,
    },
    /// Scheduled expense.
    FutureExpense {
        /// Category charged.
        category_id: CategoryId,
        /// Description.
        name: String,
        /// Expected amount.
        value: Decimal,
        /// Due day.
        expiration_date: NaiveDate,
    },
}

impl NewDetail {
    /// Referenced category.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        match self {
            Self::Limit { category_id, .. } | Self::FutureExpense { category_id, .. } => {
                *category_id
            }
        }
    }
}

/// Body of a budget create or update request.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetInput {
    /// First day.
    pub initial_date: NaiveDate,
    /// Last day.
    pub final_date: NaiveDate,
    /// Detail batch.
    pub details: Vec<DetailInput>,
}

/// One entry of a budget view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailView {
    /// A limit, or a zero placeholder for a category without one.
    Limit {
        /// Detail ID; `None` for placeholders.
        id: Option<DetailId>,
        /// Category.
        category_id: CategoryId,
        /// Cap amount.
        #[serde(with = "rust_decimal::serde::float")]
        limit: Decimal,
        /// Spent in the category within the budget window.
        #[serde(with = "rust_decimal::serde::float")]
        spent: Decimal,
        /// `limit - spent`; negative when overspent.
        #[serde(with = "rust_decimal::serde::float")]
        remaining: Decimal,
    },
    /// A scheduled expense.
    FutureExpense {
        /// Detail ID.
        id: DetailId,
        /// Category.
        category_id: CategoryId,
        /// Description.
        name: String,
        /// Expected amount.
        #[serde(with = "rust_decimal::serde::float")]
        value: Decimal,
        /// Due day.
        expiration_date: NaiveDate,
        /// Whether it has been settled.
        expended: bool,
        /// Spent in the category within the budget window.
        #[serde(with = "rust_decimal::serde::float")]
        spent: Decimal,
    },
}

impl DetailView {
    /// Referenced category.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        match self {
            Self::Limit { category_id, .. } | Self::FutureExpense { category_id, .. } => {
                *category_id
            }
        }
    }
}

/// Read model of a budget with aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetView {
    /// Budget ID.
    pub id: BudgetId,
    /// First day.
    pub initial_date: NaiveDate,
    /// Last day.
    pub final_date: NaiveDate,
    /// Stored details followed by zero placeholders.
    pub details: Vec<DetailView>,
    /// Sum of all limits.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_limit: Decimal,
    /// Sum of spending in limited categories.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// Today lies inside the window.
    pub active: bool,
    /// The window has not begun yet.
    pub editable: bool,
}
