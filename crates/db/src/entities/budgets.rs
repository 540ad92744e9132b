//! `SeaORM` Entity for budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use walletify_core::budget::{Budget, BudgetPeriod};
use walletify_shared::types::{BudgetId, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub initial_date: Date,
    pub final_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::budget_details::Entity")]
    BudgetDetails,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::budget_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into the domain budget.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored range is inverted.
    pub fn into_budget(self) -> Result<Budget, DbErr> {
        let period = BudgetPeriod::new(self.initial_date, self.final_date)
            .map_err(|e| DbErr::Type(format!("budget {}: {e}", self.id)))?;
        Ok(Budget {
            id: BudgetId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            period,
            created_at: self.created_at.to_utc(),
        })
    }
}
