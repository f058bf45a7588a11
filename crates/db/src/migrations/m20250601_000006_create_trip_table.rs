//! Create trip table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trip::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trip::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trip::PollId).string_len(32).not_null())
                    .col(ColumnDef::new(Trip::TripType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Trip::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Trip::CurrentBoardingPointId).string_len(32))
                    .col(ColumnDef::new(Trip::CurrentUniversity).string_len(16))
                    .col(ColumnDef::new(Trip::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trip::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Trip::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_poll")
                            .from(Trip::Table, Trip::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_current_boarding_point")
                            .from(Trip::Table, Trip::CurrentBoardingPointId)
                            .to(BoardingPoint::Table, BoardingPoint::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (poll_id, trip_type) - at most one trip per
        // direction per poll; a racing duplicate create fails here
        manager
            .create_index(
                Index::create()
                    .name("idx_trip_poll_type")
                    .table(Trip::Table)
                    .col(Trip::PollId)
                    .col(Trip::TripType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status (list filtering)
        manager
            .create_index(
                Index::create()
                    .name("idx_trip_status")
                    .table(Trip::Table)
                    .col(Trip::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trip::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Trip {
    Table,
    Id,
    PollId,
    TripType,
    Status,
    CurrentBoardingPointId,
    CurrentUniversity,
    StartedAt,
    CompletedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Poll {
    Table,
    Id,
}

#[derive(Iden)]
enum BoardingPoint {
    Table,
    Id,
}
