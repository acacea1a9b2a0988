//! Create `student` table.
//!
//! Owned by the student service; `email` is unique.
use sea_orm_migration::{prelude::*, schema::*};

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
                    .col(pk_auto(Student::Id))
                    .col(string_len(Student::FirstName, 100).not_null())
                    .col(string_len(Student::LastName, 100).not_null())
                    .col(string_len(Student::Email, 255).unique_key().not_null())
                    .col(string_len_null(Student::Phone, 32))
                    .col(string_len_null(Student::Address, 255))
                    .col(date_null(Student::DateOfBirth))
                    .col(string_len_null(Student::Gender, 16))
                    .col(date_null(Student::EnrollmentDate))
                    .col(string_len_null(Student::Status, 16))
                    .col(timestamp_with_time_zone(Student::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Student::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    DateOfBirth,
    Gender,
    EnrollmentDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
