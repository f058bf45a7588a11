//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_boarding_point_table;
mod m20250601_000003_create_student_table;
mod m20250601_000004_create_driver_table;
mod m20250601_000005_create_poll_tables;
mod m20250601_000006_create_trip_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_boarding_point_table::Migration),
            Box::new(m20250601_000003_create_student_table::Migration),
            Box::new(m20250601_000004_create_driver_table::Migration),
            Box::new(m20250601_000005_create_poll_tables::Migration),
            Box::new(m20250601_000006_create_trip_table::Migration),
        ]
    }
}
