//! Create boarding point table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoardingPoint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoardingPoint::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BoardingPoint::Name).string_len(256).not_null())
                    .col(ColumnDef::new(BoardingPoint::AddressReference).string_len(256))
                    .col(
                        ColumnDef::new(BoardingPoint::RouteOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: route_order (stop lists are always walked in route order)
        manager
            .create_index(
                Index::create()
                    .name("idx_boarding_point_route_order")
                    .table(BoardingPoint::Table)
                    .col(BoardingPoint::RouteOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BoardingPoint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BoardingPoint {
    Table,
    Id,
    Name,
    AddressReference,
    RouteOrder,
}
