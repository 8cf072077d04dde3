use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::FirstName).string().not_null())
                    .col(ColumnDef::new(Registrations::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Registrations::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Registrations::Phone).string().not_null())
                    .col(ColumnDef::new(Registrations::Cedula).string())
                    .col(ColumnDef::new(Registrations::Edad).small_integer())
                    .col(ColumnDef::new(Registrations::Sector).string())
                    .col(ColumnDef::new(Registrations::Sports).json().not_null())
                    .col(
                        ColumnDef::new(Registrations::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Registrations::CheckInTime).timestamp())
                    .col(
                        ColumnDef::new(Registrations::EntradaScanned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Registrations::EntradaTime).timestamp())
                    .col(
                        ColumnDef::new(Registrations::EntregaScanned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Registrations::EntregaTime).timestamp())
                    .col(
                        ColumnDef::new(Registrations::CompletoScanned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Registrations::CompletoTime).timestamp())
                    .col(
                        ColumnDef::new(Registrations::SorteoScanned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Registrations::SorteoTime).timestamp())
                    .col(
                        ColumnDef::new(Registrations::RegistrationDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-registrations-cedula")
                    .table(Registrations::Table)
                    .col(Registrations::Cedula)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-registrations-status")
                    .table(Registrations::Table)
                    .col(Registrations::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Registrations {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Cedula,
    Edad,
    Sector,
    Sports,
    Status,
    CheckInTime,
    EntradaScanned,
    EntradaTime,
    EntregaScanned,
    EntregaTime,
    CompletoScanned,
    CompletoTime,
    SorteoScanned,
    SorteoTime,
    RegistrationDate,
    UpdatedAt,
}
