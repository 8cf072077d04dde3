mod common;

use chrono::NaiveDate;
use common::{escaperoom_db, now};
use database::ServiceError;
use database::entities::escaperoom::{answer, question, reservation, time_slot, user};
use database::services::escaperoom::admin::AdminService;
use database::services::escaperoom::checkin::CheckinService;
use database::services::escaperoom::reservation::{ResendRequest, ReservationService};
use database::services::escaperoom::timeslot::TimeslotService;
use database::services::escaperoom::trivia::{AnswerSubmission, TriviaService};
use database::services::escaperoom::user::{NewUser, UserService};
use models::clock::EventClock;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

fn new_user(first_name: &str, email: &str) -> NewUser {
    NewUser {
        first_name: first_name.into(),
        last_name: "Paz".into(),
        email: email.into(),
        whatsapp: "0991234567".into(),
    }
}

async fn make_pair(db: &DatabaseConnection, tag: &str) -> (user::Model, user::Model) {
    UserService::create_pair(
        db,
        [
            new_user("Ana", &format!("ana.{tag}@mail.ec")),
            new_user("Luis", &format!("luis.{tag}@mail.ec")),
        ],
        now(),
    )
    .await
    .expect("pair registration should succeed")
}

async fn make_solo_user(db: &DatabaseConnection, email: &str) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set("Sola".into()),
        last_name: Set("Vera".into()),
        email: Set(email.into()),
        whatsapp: Set("0998765432".into()),
        trivia_completed: Set(true),
        partner_id: Set(None),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("user insert should succeed")
}

async fn make_slot(db: &DatabaseConnection, capacity: i32) -> time_slot::Model {
    time_slot::ActiveModel {
        id: Set(Uuid::new_v4()),
        date: Set(NaiveDate::from_ymd_opt(2026, 2, 27).expect("valid date")),
        start_time: Set("08:00".into()),
        end_time: Set("08:15".into()),
        capacity: Set(capacity),
    }
    .insert(db)
    .await
    .expect("slot insert should succeed")
}

async fn complete_trivia(db: &DatabaseConnection, user: &user::Model) {
    let mut active: user::ActiveModel = user.clone().into();
    active.trivia_completed = Set(true);
    active.update(db).await.expect("trivia flag update");
}

#[tokio::test]
async fn pair_links_are_mutual() {
    let db = escaperoom_db().await;
    let (ana, luis) = make_pair(&db, "mutual").await;

    assert_eq!(ana.partner_id, Some(luis.id));
    assert_eq!(luis.partner_id, Some(ana.id));
    assert!(!ana.trivia_completed);
}

#[tokio::test]
async fn pair_registration_rejects_reused_and_equal_emails() {
    let db = escaperoom_db().await;
    make_pair(&db, "first").await;

    let err = UserService::create_pair(
        &db,
        [
            new_user("Eva", "ana.first@mail.ec"),
            new_user("Tom", "tom@mail.ec"),
        ],
        now(),
    )
    .await
    .expect_err("already-partnered email must be rejected");
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = UserService::create_pair(
        &db,
        [new_user("Eva", "same@mail.ec"), new_user("Tom", "same@mail.ec")],
        now(),
    )
    .await
    .expect_err("equal emails must be rejected");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn trivia_success_propagates_to_the_partner() {
    let db = escaperoom_db().await;
    let (ana, luis) = make_pair(&db, "trivia").await;

    let questions = question::Entity::find().all(&db).await.expect("questions");
    assert_eq!(questions.len(), 5, "seed should provide five questions");

    let mut correct = Vec::new();
    for q in &questions {
        let right = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(q.id))
            .filter(answer::Column::IsCorrect.eq(true))
            .one(&db)
            .await
            .expect("answer lookup")
            .expect("every question has a correct answer");
        correct.push(AnswerSubmission {
            question_id: q.id,
            answer_id: right.id,
        });
    }

    let result = TriviaService::validate_answers(&db, ana.id, &correct)
        .await
        .expect("grading should succeed");
    assert!(result.correct);

    let ana = UserService::get_by_id(&db, ana.id).await.unwrap().unwrap();
    let luis = UserService::get_by_id(&db, luis.id).await.unwrap().unwrap();
    assert!(ana.trivia_completed);
    assert!(luis.trivia_completed, "completion is a group property");
}

#[tokio::test]
async fn trivia_failure_changes_neither_member() {
    let db = escaperoom_db().await;
    let (ana, luis) = make_pair(&db, "trivia-fail").await;

    let questions = question::Entity::find().all(&db).await.expect("questions");
    let mut wrong = Vec::new();
    for q in &questions {
        let incorrect = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(q.id))
            .filter(answer::Column::IsCorrect.eq(false))
            .one(&db)
            .await
            .expect("answer lookup")
            .expect("every question has wrong options");
        wrong.push(AnswerSubmission {
            question_id: q.id,
            answer_id: incorrect.id,
        });
    }

    let result = TriviaService::validate_answers(&db, ana.id, &wrong)
        .await
        .expect("grading should succeed");
    assert!(!result.correct);

    let ana = UserService::get_by_id(&db, ana.id).await.unwrap().unwrap();
    let luis = UserService::get_by_id(&db, luis.id).await.unwrap().unwrap();
    assert!(!ana.trivia_completed);
    assert!(!luis.trivia_completed);

    let err = TriviaService::validate_answers(&db, ana.id, &[])
        .await
        .expect_err("five answers are mandatory");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn booking_requires_completed_trivia() {
    let db = escaperoom_db().await;
    let (ana, _) = make_pair(&db, "gate").await;
    let slot = make_slot(&db, 2).await;

    let err = ReservationService::book(&db, ana.id, slot.id, now())
        .await
        .expect_err("booking before trivia must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn one_active_reservation_per_user() {
    let db = escaperoom_db().await;
    let user = make_solo_user(&db, "solo@mail.ec").await;
    let slot = make_slot(&db, 5).await;

    ReservationService::book(&db, user.id, slot.id, now())
        .await
        .expect("first booking should succeed");

    let err = ReservationService::book(&db, user.id, slot.id, now())
        .await
        .expect_err("second booking must conflict");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn pair_booking_fills_the_slot_and_blocks_a_third_seat() {
    let db = escaperoom_db().await;
    let (ana, luis) = make_pair(&db, "fill").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let slot = make_slot(&db, 2).await;

    let booked = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect("pair booking should fill both seats atomically");
    assert_eq!(booked.len(), 2);
    assert_eq!(booked[0].user.id, ana.id);
    assert_ne!(booked[0].reservation.qr_code, booked[1].reservation.qr_code);

    let third = make_solo_user(&db, "tercero@mail.ec").await;
    let err = ReservationService::book(&db, third.id, slot.id, now())
        .await
        .expect_err("the slot is now full");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let active = TimeslotService::count_active_reservations(&db, slot.id)
        .await
        .expect("count");
    assert_eq!(active, 2, "occupancy never exceeds capacity");
}

#[tokio::test]
async fn pair_booking_needs_two_free_seats() {
    let db = escaperoom_db().await;
    let occupant = make_solo_user(&db, "ocupante@mail.ec").await;
    let slot = make_slot(&db, 2).await;
    ReservationService::book(&db, occupant.id, slot.id, now())
        .await
        .expect("occupant booking should succeed");

    let (ana, luis) = make_pair(&db, "late").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;

    let err = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect_err("one free seat is not enough for a pair");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let active = TimeslotService::count_active_reservations(&db, slot.id)
        .await
        .expect("count");
    assert_eq!(active, 1, "a failed pair booking must not write anything");
}

#[tokio::test]
async fn checkin_consumes_the_ticket_exactly_once() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let user = make_solo_user(&db, "qr@mail.ec").await;
    let slot = make_slot(&db, 2).await;
    let booked = ReservationService::book(&db, user.id, slot.id, now())
        .await
        .expect("booking should succeed");

    let first_scan = now();
    let detail = CheckinService::checkin(&db, &booked.reservation.qr_code, first_scan, &clock)
        .await
        .expect("first check-in should succeed");
    assert_eq!(detail.reservation.status, "USED");
    assert_eq!(detail.reservation.checked_in_at, Some(first_scan));

    let err = CheckinService::checkin(&db, &booked.reservation.qr_code, now(), &clock)
        .await
        .expect_err("a used ticket cannot be consumed again");
    match err {
        ServiceError::BadRequest(message) => assert!(message.contains("ya fue utilizado")),
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = reservation::Entity::find_by_id(booked.reservation.id)
        .one(&db)
        .await
        .expect("lookup")
        .expect("row exists");
    assert_eq!(stored.checked_in_at, Some(first_scan), "timestamp must not move");
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let err = CheckinService::get_by_token(&db, "deadbeef-0000", &clock)
        .await
        .expect_err("unknown token must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn group_checkin_requires_mutual_partners() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, luis) = make_pair(&db, "group").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let stranger = make_solo_user(&db, "extrano@mail.ec").await;
    let slot = make_slot(&db, 4).await;

    let pair = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect("pair booking");
    let solo = ReservationService::book(&db, stranger.id, slot.id, now())
        .await
        .expect("solo booking");

    let err = CheckinService::checkin_group(
        &db,
        &pair[0].reservation.qr_code,
        &solo.reservation.qr_code,
        now(),
        &clock,
    )
    .await
    .expect_err("unpaired tickets must be rejected");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let stamp = now();
    let (first, second) = CheckinService::checkin_group(
        &db,
        &pair[0].reservation.qr_code,
        &pair[1].reservation.qr_code,
        stamp,
        &clock,
    )
    .await
    .expect("mutual partners check in together");
    assert_eq!(first.reservation.checked_in_at, Some(stamp));
    assert_eq!(second.reservation.checked_in_at, Some(stamp));
}

#[tokio::test]
async fn rating_is_bounded_and_stamps_both_reservations() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, luis) = make_pair(&db, "rate").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let slot = make_slot(&db, 2).await;
    let pair = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect("pair booking");
    CheckinService::checkin_group(
        &db,
        &pair[0].reservation.qr_code,
        &pair[1].reservation.qr_code,
        now(),
        &clock,
    )
    .await
    .expect("group check-in");

    let groups = CheckinService::checked_in_groups(&db).await.expect("groups");
    assert_eq!(groups.len(), 1, "one unrated group, listed once");

    let err = CheckinService::rate_group(
        &db,
        pair[0].reservation.id,
        pair[1].reservation.id,
        4,
        now(),
    )
    .await
    .expect_err("rating 4 is out of range");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let (first, second) = CheckinService::rate_group(
        &db,
        pair[0].reservation.id,
        pair[1].reservation.id,
        2,
        now(),
    )
    .await
    .expect("rating 2 is valid");
    assert_eq!(first.interest_rating, Some(2));
    assert_eq!(second.interest_rating, Some(2));

    let groups = CheckinService::checked_in_groups(&db).await.expect("groups");
    assert!(groups.is_empty(), "rated groups leave the queue");
}

#[tokio::test]
async fn resend_creates_reservations_for_the_whole_group() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, luis) = make_pair(&db, "resend").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let slot = make_slot(&db, 2).await;

    let outcome = ReservationService::resend_or_create(
        &db,
        ResendRequest {
            email: ana.email.clone(),
            new_email: None,
            new_whatsapp: None,
            new_partner_email: None,
            new_partner_whatsapp: None,
            new_timeslot_id: Some(slot.id),
        },
        now(),
        &clock,
    )
    .await
    .expect("first resend creates both reservations");

    assert!(outcome.reservation_created);
    assert_eq!(outcome.deliveries.len(), 2);
    assert!(outcome.partner_sent_to.is_some());

    let active = TimeslotService::count_active_reservations(&db, slot.id)
        .await
        .expect("count");
    assert_eq!(active, 2);
}

#[tokio::test]
async fn resend_requires_a_slot_when_no_reservation_exists() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, _) = make_pair(&db, "resend-missing").await;
    complete_trivia(&db, &ana).await;

    let err = ReservationService::resend_or_create(
        &db,
        ResendRequest {
            email: ana.email.clone(),
            new_email: None,
            new_whatsapp: None,
            new_partner_email: None,
            new_partner_whatsapp: None,
            new_timeslot_id: None,
        },
        now(),
        &clock,
    )
    .await
    .expect_err("a first reservation needs a slot");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn resend_rejects_used_reservations() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let user = make_solo_user(&db, "usado@mail.ec").await;
    let slot = make_slot(&db, 2).await;
    let booked = ReservationService::book(&db, user.id, slot.id, now())
        .await
        .expect("booking");
    CheckinService::checkin(&db, &booked.reservation.qr_code, now(), &clock)
        .await
        .expect("check-in");

    let err = ReservationService::resend_or_create(
        &db,
        ResendRequest {
            email: user.email.clone(),
            new_email: None,
            new_whatsapp: None,
            new_partner_email: None,
            new_partner_whatsapp: None,
            new_timeslot_id: None,
        },
        now(),
        &clock,
    )
    .await
    .expect_err("used reservations are terminal");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn reassign_moves_the_group_but_keeps_tokens() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, luis) = make_pair(&db, "move").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let slot = make_slot(&db, 2).await;
    let other = time_slot::ActiveModel {
        id: Set(Uuid::new_v4()),
        date: Set(NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date")),
        start_time: Set("09:00".into()),
        end_time: Set("09:15".into()),
        capacity: Set(2),
    }
    .insert(&db)
    .await
    .expect("slot insert");

    let pair = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect("pair booking");

    let (first, second) = CheckinService::reassign_group(
        &db,
        &pair[0].reservation.qr_code,
        &pair[1].reservation.qr_code,
        other.id,
        &clock,
    )
    .await
    .expect("group reassignment");

    assert_eq!(first.reservation.timeslot_id, other.id);
    assert_eq!(second.reservation.timeslot_id, other.id);
    assert_eq!(first.reservation.qr_code, pair[0].reservation.qr_code);
    assert_eq!(second.reservation.qr_code, pair[1].reservation.qr_code);
}

#[tokio::test]
async fn timeslot_clearing_is_blocked_by_reservations() {
    let db = escaperoom_db().await;
    let user = make_solo_user(&db, "bloqueo@mail.ec").await;
    let slot = make_slot(&db, 2).await;
    ReservationService::book(&db, user.id, slot.id, now())
        .await
        .expect("booking");

    let err = TimeslotService::clear_all(&db)
        .await
        .expect_err("clearing with bookings must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    reservation::Entity::delete_many()
        .exec(&db)
        .await
        .expect("cleanup");
    let deleted = TimeslotService::clear_all(&db)
        .await
        .expect("clearing succeeds once empty");
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn admin_config_drives_generation() {
    let db = escaperoom_db().await;

    let err = AdminService::generate_timeslots(&db)
        .await
        .expect_err("generation without configuration must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let config = AdminService::set_timeslot_config(
        &db,
        vec![
            NaiveDate::from_ymd_opt(2026, 2, 27).expect("valid date"),
            NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date"),
        ],
        15,
        8,
        20,
        Some("admin@mail.ec".into()),
        now(),
    )
    .await
    .expect("config should save");
    assert_eq!(config.slots_per_day, 48);

    let summary = AdminService::generate_timeslots(&db)
        .await
        .expect("generation should succeed");
    assert_eq!(summary.total_slots, 96);
    assert_eq!(summary.days, 2);

    let slots = TimeslotService::slots_for_date(
        &db,
        NaiveDate::from_ymd_opt(2026, 2, 27).expect("valid date"),
    )
    .await
    .expect("slot listing");
    assert_eq!(slots.len(), 48);
    assert_eq!(slots[0].slot.start_time, "08:00");
    assert_eq!(slots[0].reserved, 0);
}

#[tokio::test]
async fn users_export_joins_partner_and_rating() {
    let db = escaperoom_db().await;
    let clock = EventClock::guayaquil();
    let (ana, luis) = make_pair(&db, "export").await;
    complete_trivia(&db, &ana).await;
    complete_trivia(&db, &luis).await;
    let slot = make_slot(&db, 2).await;
    let pair = ReservationService::book_pair(&db, &[ana.id, luis.id], slot.id, now())
        .await
        .expect("pair booking");
    CheckinService::checkin_group(
        &db,
        &pair[0].reservation.qr_code,
        &pair[1].reservation.qr_code,
        now(),
        &clock,
    )
    .await
    .expect("group check-in");
    CheckinService::rate_group(&db, pair[0].reservation.id, pair[1].reservation.id, 3, now())
        .await
        .expect("rating");

    let rows = AdminService::users_data(&db).await.expect("export");
    assert_eq!(rows.len(), 2);
    let ana_row = rows
        .iter()
        .find(|r| r.email == ana.email)
        .expect("ana in export");
    assert!(ana_row.checked_in);
    assert_eq!(ana_row.interest_level, "Bastante interesado");
    assert_eq!(ana_row.partner_name, "Luis Paz");
    assert_eq!(ana_row.timeslot, "08:00 - 08:15");
}
