use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// The fixed five-question bank. The correct answer is always derivable
/// from the confirmation material every participant receives.
const QUESTIONS: [(&str, [(&str, bool); 3]); 5] = [
    (
        "¿Cuántas personas conforman un grupo del Escape Room?",
        [("Dos", true), ("Cuatro", false), ("Seis", false)],
    ),
    (
        "¿Cuánto dura cada turno del Escape Room?",
        [
            ("15 minutos", true),
            ("30 minutos", false),
            ("1 hora", false),
        ],
    ),
    (
        "¿Qué debes presentar en la entrada para ingresar?",
        [
            ("El código QR de tu reserva", true),
            ("Tu cédula", false),
            ("El comprobante de pago", false),
        ],
    ),
    (
        "¿Cuántas veces puede usarse el código QR?",
        [
            ("Una sola vez", true),
            ("Dos veces", false),
            ("Las veces que quieras", false),
        ],
    ),
    (
        "¿Con cuánta anticipación debes llegar a tu turno?",
        [
            ("5 minutos", true),
            ("30 minutos", false),
            ("No es necesario llegar antes", false),
        ],
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (position, (text, answers)) in QUESTIONS.iter().enumerate() {
            let question_id = Uuid::new_v4();
            let insert = Query::insert()
                .into_table(Questions::Table)
                .columns([Questions::Id, Questions::Text, Questions::Position])
                .values_panic([
                    question_id.into(),
                    (*text).into(),
                    (position as i32 + 1).into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;

            for (answer_text, is_correct) in answers {
                let insert = Query::insert()
                    .into_table(Answers::Table)
                    .columns([
                        Answers::Id,
                        Answers::QuestionId,
                        Answers::Text,
                        Answers::IsCorrect,
                    ])
                    .values_panic([
                        Uuid::new_v4().into(),
                        question_id.into(),
                        (*answer_text).into(),
                        (*is_correct).into(),
                    ])
                    .to_owned();
                manager.exec_stmt(insert).await?;
            }
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Answers::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Questions::Table).to_owned())
            .await
    }
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
