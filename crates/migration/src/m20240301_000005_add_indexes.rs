use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enrollment: lookups by course (course details, purge, recount)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_course")
                    .table(Enrollment::Table)
                    .col(Enrollment::CourseId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Course: listing by name
        manager
            .create_index(
                Index::create()
                    .name("idx_course_name")
                    .table(Course::Table)
                    .col(Course::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_course_name").table(Course::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_enrollment_course").table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Enrollment { Table, CourseId }

#[derive(DeriveIden)]
enum Course { Table, Name }
