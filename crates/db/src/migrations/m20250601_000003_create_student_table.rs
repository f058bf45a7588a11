//! Create student table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Student::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Student::Phone).string_len(32))
                    .col(ColumnDef::new(Student::ClassShift).string_len(16).not_null())
                    .col(ColumnDef::new(Student::University).string_len(16).not_null())
                    .col(ColumnDef::new(Student::BoardingPointId).string_len(32))
                    .col(
                        ColumnDef::new(Student::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_user")
                            .from(Student::Table, Student::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_boarding_point")
                            .from(Student::Table, Student::BoardingPointId)
                            .to(BoardingPoint::Table, BoardingPoint::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id - one student profile per account
        manager
            .create_index(
                Index::create()
                    .name("idx_student_user_id")
                    .table(Student::Table)
                    .col(Student::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: boarding_point_id (outbound stop resolution)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_boarding_point_id")
                    .table(Student::Table)
                    .col(Student::BoardingPointId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    ClassShift,
    University,
    BoardingPointId,
    RegisteredAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum BoardingPoint {
    Table,
    Id,
}
