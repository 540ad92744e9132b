//! `SeaORM` Entity for budget_details table.
//!
//! Limits and future expenses share one table, tagged by `kind`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use walletify_core::budget::{Detail, FutureExpenseDetail, LimitDetail};
use walletify_shared::types::{BudgetId, CategoryId, DetailId};

/// Stored value of `kind` for limits.
pub const KIND_LIMIT: &str = "limit";

/// Stored value of `kind` for future expenses.
pub const KIND_FUTURE_EXPENSE: &str = "future_expense";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    /// `limit` or `future_expense`.
    pub kind: String,
    /// Cap for limits, expected amount for future expenses.
    #[sea_orm(column_type = "Decimal(Some((11, 2)))")]
    pub value: Decimal,
    pub name: Option<String>,
    pub expiration_date: Option<Date>,
    pub expended: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id"
    )]
    Budgets,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into its domain variant.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` for an unknown kind or a future expense row
    /// missing its name or expiration date.
    pub fn into_detail(self) -> Result<Detail, DbErr> {
        let id = DetailId::from_uuid(self.id);
        let budget_id = BudgetId::from_uuid(self.budget_id);
        let category_id = CategoryId::from_uuid(self.category_id);

        match self.kind.as_str() {
            KIND_LIMIT => Ok(Detail::Limit(LimitDetail {
                id,
                budget_id,
                category_id,
                limit: self.value,
            })),
            KIND_FUTURE_EXPENSE => {
                let (Some(name), Some(expiration_date)) = (self.name, self.expiration_date) else {
                    return Err(DbErr::Type(format!(
                        "future expense {id} is missing its name or expiration date"
                    )));
                };
                Ok(Detail::FutureExpense(FutureExpenseDetail {
                    id,
                    budget_id,
                    category_id,
                    name,
                    value: self.value,
                    expiration_date,
                    expended: self.expended,
                }))
            }
            other => Err(DbErr::Type(format!("unknown budget detail kind '{other}'"))),
        }
    }
}
