//! Closed date windows.

use chrono::NaiveDate;

use super::error::BudgetError;

/// An inclusive `[initial_date, final_date]` window of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPeriod {
    initial_date: NaiveDate,
    final_date: NaiveDate,
}

impl BudgetPeriod {
    /// Creates a window; a single-day window is allowed.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidRange` if `initial_date > final_date`.
    pub fn new(initial_date: NaiveDate, final_date: NaiveDate) -> Result<Self, BudgetError> {
        if initial_date > final_date {
            return Err(BudgetError::InvalidRange {
                initial_date,
                final_date,
            });
        }
        Ok(Self {
            initial_date,
            final_date,
        })
    }

    /// First day of the window.
    #[must_use]
    pub const fn initial_date(&self) -> NaiveDate {
        self.initial_date
    }

    /// Last day of the window.
    #[must_use]
    pub const fn final_date(&self) -> NaiveDate {
        self.final_date
    }

    /// Returns true if `date` lies inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.initial_date <= date && date <= self.final_date
    }

    /// Closed-interval overlap: sharing a single boundary day counts.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(other.initial_date) || other.contains(self.initial_date)
    }

    /// Returns true once `today` has reached the first day.
    #[must_use]
    pub fn has_begun(&self, today: NaiveDate) -> bool {
        self.initial_date <= today
    }
}
