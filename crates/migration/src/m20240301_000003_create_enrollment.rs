//! Create `enrollment` table.
//!
//! No foreign keys: students and courses belong to other services.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(pk_auto(Enrollment::Id))
                    .col(integer(Enrollment::StudentId).not_null())
                    .col(integer(Enrollment::CourseId).not_null())
                    .col(timestamp_with_time_zone(Enrollment::EnrolledAt).not_null())
                    .col(timestamp_with_time_zone(Enrollment::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // one enrollment per (student, course)
        manager
            .create_index(
                Index::create()
                    .name("uniq_enrollment_student_course")
                    .table(Enrollment::Table)
                    .col(Enrollment::StudentId)
                    .col(Enrollment::CourseId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enrollment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enrollment { Table, Id, StudentId, CourseId, EnrolledAt, UpdatedAt }
