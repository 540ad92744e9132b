//! Category registry rules.

use std::collections::HashSet;

use walletify_shared::types::{CategoryId, UserId};

use super::error::CategoryError;
use super::types::{Category, CategoryInput};

/// Maximum length of a category name.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of an icon reference.
pub const MAX_ICON_LEN: usize = 50;

/// Category service for business logic.
pub struct CategoryService;

impl CategoryService {
    /// Builds a user's effective category set: static categories first, then
    /// the user's own, each in creation order, deduplicated by id.
    #[must_use]
    pub fn effective_set(static_categories: Vec<Category>, owned: Vec<Category>) -> Vec<Category> {
        let mut seen = HashSet::new();
        let mut statics: Vec<Category> = static_categories
            .into_iter()
            .filter(Category::is_static)
            .collect();
        let mut owned = owned;
        statics.sort_by_key(|c| (c.created_at, c.id.into_inner()));
        owned.sort_by_key(|c| (c.created_at, c.id.into_inner()));

        statics
            .into_iter()
            .chain(owned)
            .filter(|c| seen.insert(c.id))
            .collect()
    }

    /// Looks a category up in an effective set.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the id is not part of the set.
    pub fn resolve(effective: &[Category], id: CategoryId) -> Result<&Category, CategoryError> {
        effective
            .iter()
            .find(|c| c.id == id)
            .ok_or(CategoryError::NotFound(id))
    }

    /// Normalizes and validates category input.
    ///
    /// Names are trimmed and lower-cased; icons are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` or `InvalidIcon` for empty or oversized values.
    pub fn normalize(input: &CategoryInput) -> Result<CategoryInput, CategoryError> {
        let name = input.name.trim().to_lowercase();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(CategoryError::InvalidName { max: MAX_NAME_LEN });
        }

        let icon = input.icon.trim().to_string();
        if icon.is_empty() || icon.chars().count() > MAX_ICON_LEN {
            return Err(CategoryError::InvalidIcon { max: MAX_ICON_LEN });
        }

        Ok(CategoryInput { name, icon })
    }

    /// Rejects a name already present in the effective set.
    ///
    /// `exclude` skips the category being renamed.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateName` on collision.
    pub fn ensure_unique_name(
        effective: &[Category],
        name: &str,
        exclude: Option<CategoryId>,
    ) -> Result<(), CategoryError> {
        let taken = effective
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .any(|c| c.name.eq_ignore_ascii_case(name));

        if taken {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Checks that `user` may rename or delete `category`.
    ///
    /// # Errors
    ///
    /// Returns `StaticCategory` for shared categories and `Forbidden` for
    /// categories owned by someone else.
    pub fn ensure_modifiable(category: &Category, user: UserId) -> Result<(), CategoryError> {
        match category.user_id {
            None => Err(CategoryError::StaticCategory),
            Some(owner) if owner != user => Err(CategoryError::Forbidden),
            Some(_) => Ok(()),
        }
    }

    /// Formats an RGB triple as a `#RRGGBB` display color.
    #[must_use]
    pub fn format_color(rgb: [u8; 3]) -> String {
        format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
    }
}
