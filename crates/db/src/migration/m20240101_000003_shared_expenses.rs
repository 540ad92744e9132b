//! Shared expenses: one user records an expense for another.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharedExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharedExpenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SharedExpenses::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(SharedExpenses::RecipientId).uuid().not_null())
                    .col(ColumnDef::new(SharedExpenses::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(SharedExpenses::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(SharedExpenses::Value)
                            .decimal_len(11, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SharedExpenses::Date).date().not_null())
                    .col(
                        ColumnDef::new(SharedExpenses::Accepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SharedExpenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_expenses_owner")
                            .from(SharedExpenses::Table, SharedExpenses::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_expenses_recipient")
                            .from(SharedExpenses::Table, SharedExpenses::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_expenses_category")
                            .from(SharedExpenses::Table, SharedExpenses::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shared_expenses_owner_date")
                    .table(SharedExpenses::Table)
                    .col(SharedExpenses::OwnerId)
                    .col(SharedExpenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shared_expenses_recipient_date")
                    .table(SharedExpenses::Table)
                    .col(SharedExpenses::RecipientId)
                    .col(SharedExpenses::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SharedExpenses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum SharedExpenses {
    Table,
    Id,
    OwnerId,
    RecipientId,
    CategoryId,
    Name,
    Value,
    Date,
    Accepted,
    CreatedAt,
}
