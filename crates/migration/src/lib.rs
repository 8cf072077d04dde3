pub use sea_orm_migration::prelude::*;

mod m20260114_create_registrations;
mod m20260114_create_escaperoom_tables;
mod m20260115_seed_trivia;

/// Migrations for the festival store.
pub struct FestivalMigrator;

#[async_trait::async_trait]
impl MigratorTrait for FestivalMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260114_create_registrations::Migration)]
    }
}

/// Migrations for the escape-room store.
pub struct EscapeRoomMigrator;

#[async_trait::async_trait]
impl MigratorTrait for EscapeRoomMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260114_create_escaperoom_tables::Migration),
            Box::new(m20260115_seed_trivia::Migration),
        ]
    }
}
