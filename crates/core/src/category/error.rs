//! Category error types.

use thiserror::Error;
use walletify_shared::types::CategoryId;

/// Category-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Category not found in the caller's effective set.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Category belongs to another user.
    #[error("Category belongs to another user")]
    Forbidden,

    /// Static categories are shared and cannot be changed by users.
    #[error("Static categories cannot be modified or deleted")]
    StaticCategory,

    /// Name is empty or longer than the limit.
    #[error("Category name must be between 1 and {max} characters")]
    InvalidName {
        /// Maximum name length.
        max: usize,
    },

    /// Icon reference is empty or longer than the limit.
    #[error("Category icon must be between 1 and {max} characters")]
    InvalidIcon {
        /// Maximum icon length.
        max: usize,
    },

    /// Name already used in the caller's effective set.
    #[error("A category named '{0}' already exists")]
    DuplicateName(String),

    /// Category is still referenced by expenses or budget details.
    #[error("Category is in use and cannot be deleted")]
    InUse,
}

impl CategoryError {
    /// Returns the machine-readable error code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "category_not_found",
            Self::Forbidden => "forbidden",
            Self::StaticCategory => "static_category",
            Self::InvalidName { .. } => "invalid_name",
            Self::InvalidIcon { .. } => "invalid_icon",
            Self::DuplicateName(_) => "duplicate_name",
            Self::InUse => "category_in_use",
        }
    }
}
