//! User repository for database operations.
//!
//! Identity is owned by the token issuer; this table only mirrors the
//! subjects seen in valid tokens so that rows can reference them.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};
use walletify_shared::types::UserId;

use crate::entities::users;

/// Finds the earliest user registered under `email`.
pub(crate) async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email.trim()))
        .order_by_asc(users::Column::CreatedAt)
        .one(conn)
        .await
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a user by the email last seen in their token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        find_by_email(&self.db, email).await
    }

    /// Returns the user row for `id`, creating it on first sight.
    ///
    /// A known email is recorded, or refreshed when it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn ensure_exists(
        &self,
        id: UserId,
        email: Option<&str>,
    ) -> Result<users::Model, DbErr> {
        if let Some(existing) = self.find_by_id(id).await? {
            return match email {
                Some(email) if existing.email.as_deref() != Some(email) => {
                    let mut active: users::ActiveModel = existing.into();
                    active.email = Set(Some(email.to_string()));
                    active.update(&self.db).await
                }
                _ => Ok(existing),
            };
        }

        let user = users::ActiveModel {
            id: Set(id.into_inner()),
            email: Set(email.map(str::to_string)),
            created_at: Set(chrono::Utc::now().into()),
        };

        // Concurrent first requests from one user race here
        users::Entity::insert(user)
            .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        tracing::info!(user_id = %id, "User provisioned");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {id}")))
    }
}
