//! Category repository: the category registry.
//!
//! A user sees the static categories plus their own.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;
use walletify_core::category::{
    Category, CategoryError as DomainError, CategoryInput, CategoryService,
};
use walletify_shared::types::{CategoryId, UserId};

use crate::entities::{budget_details, categories, expenses, shared_expenses};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A category shared by every user.
#[derive(Debug, Clone, Copy)]
pub struct StaticCategory {
    /// Display name.
    pub name: &'static str,
    /// Icon reference.
    pub icon: &'static str,
}

/// Static categories every installation starts with.
pub const DEFAULT_STATIC_CATEGORIES: [StaticCategory; 5] = [
    StaticCategory {
        name: "Impuestos y Servicios",
        icon: "AccountBalance",
    },
    StaticCategory {
        name: "Entretenimiento y Ocio",
        icon: "Casino",
    },
    StaticCategory {
        name: "Hogar y Mercado",
        icon: "Home",
    },
    StaticCategory {
        name: "Buen vivir/Antojos",
        icon: "EmojiEmotions",
    },
    StaticCategory {
        name: "Electrodomesticos",
        icon: "Kitchen",
    },
];

/// Loads a user's effective category set through any connection.
pub(crate) async fn load_effective<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
) -> Result<Vec<Category>, DbErr> {
    let rows = categories::Entity::find()
        .filter(
            Condition::any()
                .add(categories::Column::UserId.is_null())
                .add(categories::Column::UserId.eq(user.into_inner())),
        )
        .order_by_asc(categories::Column::CreatedAt)
        .order_by_asc(categories::Column::Id)
        .all(conn)
        .await?;

    let (statics, owned): (Vec<Category>, Vec<Category>) = rows
        .into_iter()
        .map(Category::from)
        .partition(Category::is_static);

    Ok(CategoryService::effective_set(statics, owned))
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the static categories followed by the user's own.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn effective_categories(&self, user: UserId) -> Result<Vec<Category>, DbErr> {
        load_effective(&self.db, user).await
    }

    /// Finds a category visible to `user`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category is not in the user's effective set.
    pub async fn by_id(&self, user: UserId, id: CategoryId) -> Result<Category, CategoryError> {
        let effective = load_effective(&self.db, user).await?;
        Ok(CategoryService::resolve(&effective, id)?.clone())
    }

    /// Creates a category owned by `user` with a random display color.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or icon is invalid, the name is taken, or
    /// the database operation fails.
    pub async fn create(
        &self,
        user: UserId,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        let input = CategoryService::normalize(&input)?;
        let effective = load_effective(&self.db, user).await?;
        CategoryService::ensure_unique_name(&effective, &input.name, None)?;

        let color = CategoryService::format_color(rand::random());
        let category = categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(Some(user.into_inner())),
            name: Set(input.name),
            icon: Set(input.icon),
            color: Set(color),
            created_at: Set(Utc::now().into()),
        };

        let model = category.insert(&self.db).await?;
        tracing::info!(user_id = %user, category_id = %model.id, "Category created");
        Ok(model.into())
    }

    /// Renames a category or changes its icon.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `StaticCategory` or `Forbidden` for categories the
    /// user may not change, plus the validation errors of `create`.
    pub async fn update(
        &self,
        user: UserId,
        id: CategoryId,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        let model = self.find_modifiable(user, id).await?;
        let input = CategoryService::normalize(&input)?;
        let effective = load_effective(&self.db, user).await?;
        CategoryService::ensure_unique_name(&effective, &input.name, Some(id))?;

        let mut active: categories::ActiveModel = model.into();
        active.name = Set(input.name);
        active.icon = Set(input.icon);

        let model = active.update(&self.db).await?;
        tracing::info!(user_id = %user, category_id = %id, "Category updated");
        Ok(model.into())
    }

    /// Deletes a category owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `InUse` while expenses, shared expenses or budget details
    /// reference it, plus the ownership errors of `update`.
    pub async fn delete(&self, user: UserId, id: CategoryId) -> Result<(), CategoryError> {
        let txn = self.db.begin().await?;

        let model = categories::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound(id))?;
        CategoryService::ensure_modifiable(&Category::from(model), user)?;

        let expense_refs = expenses::Entity::find()
            .filter(expenses::Column::CategoryId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        let detail_refs = budget_details::Entity::find()
            .filter(budget_details::Column::CategoryId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        let shared_refs = shared_expenses::Entity::find()
            .filter(shared_expenses::Column::CategoryId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        if expense_refs > 0 || detail_refs > 0 || shared_refs > 0 {
            return Err(DomainError::InUse.into());
        }

        categories::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(user_id = %user, category_id = %id, "Category deleted");
        Ok(())
    }

    /// Inserts the static categories that do not exist yet.
    ///
    /// Returns how many were inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_static(&self, defaults: &[StaticCategory]) -> Result<usize, DbErr> {
        let mut inserted = 0;

        for default in defaults {
            let name = default.name.trim().to_lowercase();
            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.is_null())
                .filter(categories::Column::Name.eq(name.as_str()))
                .count(&self.db)
                .await?
                > 0;
            if exists {
                continue;
            }

            categories::ActiveModel {
                id: Set(Uuid::now_v7()),
                user_id: Set(None),
                name: Set(name),
                icon: Set(default.icon.to_string()),
                color: Set(CategoryService::format_color(rand::random())),
                created_at: Set(Utc::now().into()),
            }
            .insert(&self.db)
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn find_modifiable(
        &self,
        user: UserId,
        id: CategoryId,
    ) -> Result<categories::Model, CategoryError> {
        let model = categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound(id))?;
        CategoryService::ensure_modifiable(&Category::from(model.clone()), user)?;
        Ok(model)
    }
}
