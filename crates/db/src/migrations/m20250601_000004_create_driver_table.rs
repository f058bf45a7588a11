//! Create driver table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Driver::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Driver::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Driver::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Driver::Phone).string_len(32))
                    .col(ColumnDef::new(Driver::LicenseNumber).string_len(32))
                    .col(
                        ColumnDef::new(Driver::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_user")
                            .from(Driver::Table, Driver::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id - one driver profile per account
        manager
            .create_index(
                Index::create()
                    .name("idx_driver_user_id")
                    .table(Driver::Table)
                    .col(Driver::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Driver::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Driver {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    LicenseNumber,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
