use chrono::NaiveDateTime;
use migration::{EscapeRoomMigrator, FestivalMigrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory store with the real migrations applied. A single pooled
/// connection keeps every query on the same in-memory database.
async fn connect_memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    Database::connect(options)
        .await
        .expect("in-memory sqlite should connect")
}

pub async fn festival_db() -> DatabaseConnection {
    let db = connect_memory().await;
    FestivalMigrator::up(&db, None)
        .await
        .expect("festival migrations should apply");
    db
}

pub async fn escaperoom_db() -> DatabaseConnection {
    let db = connect_memory().await;
    EscapeRoomMigrator::up(&db, None)
        .await
        .expect("escape-room migrations should apply");
    db
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
