//! Create `course_enrollment_count` table.
//!
//! One row per course: current occupancy and the mirrored capacity ceiling.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollmentCount::Table)
                    .if_not_exists()
                    .col(integer(CourseEnrollmentCount::CourseId).primary_key())
                    .col(integer(CourseEnrollmentCount::Count).not_null().default(0))
                    .col(integer(CourseEnrollmentCount::Capacity).not_null())
                    .col(timestamp_with_time_zone(CourseEnrollmentCount::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseEnrollmentCount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CourseEnrollmentCount { Table, CourseId, Count, Capacity, UpdatedAt }
