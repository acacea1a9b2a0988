#![cfg(test)]
use sea_orm::DatabaseConnection;

/// Fresh migrated database per test; nothing leaks between tests.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}
