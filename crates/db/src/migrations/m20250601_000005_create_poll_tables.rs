//! Create poll and vote tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Poll::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Poll::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Poll::Date).date().not_null())
                    .col(
                        ColumnDef::new(Poll::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: date - one poll per day
        manager
            .create_index(
                Index::create()
                    .name("idx_poll_date")
                    .table(Poll::Table)
                    .col(Poll::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vote::StudentId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::PollId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::Option).string_len(24).not_null())
                    .col(
                        ColumnDef::new(Vote::VotedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_student")
                            .from(Vote::Table, Vote::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_poll")
                            .from(Vote::Table, Vote::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (student_id, poll_id) - at most one vote per student
        // per poll; a racing duplicate insert fails here, not in app code
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_student_poll")
                    .table(Vote::Table)
                    .col(Vote::StudentId)
                    .col(Vote::PollId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (poll_id, option) - stop resolution filters on both
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_poll_option")
                    .table(Vote::Table)
                    .col(Vote::PollId)
                    .col(Vote::Option)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Poll::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Poll {
    Table,
    Id,
    Date,
    Status,
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    StudentId,
    PollId,
    Option,
    VotedAt,
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
}
