//! `SeaORM` Entity for shared_expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use walletify_core::shared_expense::SharedExpense;
use walletify_shared::types::{CategoryId, SharedExpenseId, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shared_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub recipient_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((11, 2)))")]
    pub value: Decimal,
    pub date: Date,
    pub accepted: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SharedExpense {
    fn from(model: Model) -> Self {
        Self {
            id: SharedExpenseId::from_uuid(model.id),
            owner_id: UserId::from_uuid(model.owner_id),
            recipient_id: UserId::from_uuid(model.recipient_id),
            category_id: CategoryId::from_uuid(model.category_id),
            name: model.name,
            value: model.value,
            date: model.date,
            accepted: model.accepted,
            created_at: model.created_at.to_utc(),
        }
    }
}
