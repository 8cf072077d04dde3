use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Whatsapp).string().not_null())
                    .col(
                        ColumnDef::new(Users::TriviaCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::PartnerId).uuid())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create time_slots table
        manager
            .create_table(
                Table::create()
                    .table(TimeSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeSlots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeSlots::Date).date().not_null())
                    .col(ColumnDef::new(TimeSlots::StartTime).string().not_null())
                    .col(ColumnDef::new(TimeSlots::EndTime).string().not_null())
                    .col(
                        ColumnDef::new(TimeSlots::Capacity)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reservations table
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::TimeslotId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reservations::QrCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(ColumnDef::new(Reservations::CheckedInAt).timestamp())
                    .col(ColumnDef::new(Reservations::InterestRating).small_integer())
                    .col(ColumnDef::new(Reservations::RatedAt).timestamp())
                    .col(ColumnDef::new(Reservations::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-user_id")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-timeslot_id")
                            .from(Reservations::Table, Reservations::TimeslotId)
                            .to(TimeSlots::Table, TimeSlots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create registration_controls table
        manager
            .create_table(
                Table::create()
                    .table(RegistrationControls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationControls::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationControls::IsOpen)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationControls::Reason).string())
                    .col(ColumnDef::new(RegistrationControls::UpdatedBy).string())
                    .col(
                        ColumnDef::new(RegistrationControls::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create timeslot_configs table
        manager
            .create_table(
                Table::create()
                    .table(TimeslotConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeslotConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TimeslotConfigs::EventDates)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeslotConfigs::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeslotConfigs::StartHour)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeslotConfigs::EndHour).integer().not_null())
                    .col(
                        ColumnDef::new(TimeslotConfigs::SlotsPerDay)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeslotConfigs::UpdatedBy).string())
                    .col(
                        ColumnDef::new(TimeslotConfigs::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create questions table
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::Position).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create answers table
        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Answers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Answers::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(Answers::Text).text().not_null())
                    .col(
                        ColumnDef::new(Answers::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-answers-question_id")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reservations-user_id")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reservations-timeslot_id")
                    .table(Reservations::Table)
                    .col(Reservations::TimeslotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-time_slots-date")
                    .table(TimeSlots::Table)
                    .col(TimeSlots::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimeslotConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegistrationControls::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimeSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Whatsapp,
    TriviaCompleted,
    PartnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TimeSlots {
    Table,
    Id,
    Date,
    StartTime,
    EndTime,
    Capacity,
}

#[derive(DeriveIden)]
enum Reservations {
    Table,
    Id,
    UserId,
    TimeslotId,
    QrCode,
    Status,
    CheckedInAt,
    InterestRating,
    RatedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RegistrationControls {
    Table,
    Id,
    IsOpen,
    Reason,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimeslotConfigs {
    Table,
    Id,
    EventDates,
    DurationMinutes,
    StartHour,
    EndHour,
    SlotsPerDay,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    Text,
    Position,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    QuestionId,
    Text,
    IsCorrect,
}
