//! Category data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walletify_shared::types::{CategoryId, UserId};

/// A spending category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "CategoryJson")]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning user; `None` for static categories.
    pub user_id: Option<UserId>,
    /// Display name, stored lower-cased.
    pub name: String,
    /// Icon reference understood by the client.
    pub icon: String,
    /// Display color as `#RRGGBB`.
    pub color: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Returns true for categories shared by every user.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Wire shape of a category: owner and timestamps stay server-side.
#[derive(Serialize)]
struct CategoryJson {
    id: CategoryId,
    name: String,
    icon: String,
    color: String,
    #[serde(rename = "static")]
    is_static: bool,
}

impl From<Category> for CategoryJson {
    fn from(category: Category) -> Self {
        Self {
            is_static: category.is_static(),
            id: category.id,
            name: category.name,
            icon: category.icon,
            color: category.color,
        }
    }
}

/// Input for creating or renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Icon reference.
    pub icon: String,
}
