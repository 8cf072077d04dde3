use sea_orm::{Database, DatabaseConnection, DbErr};

/// Connect to one of the two stores.
///
/// The URL is injected by the process entry point; nothing in this crate
/// reads the environment.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(url).await
}
