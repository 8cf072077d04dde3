mod common;

use chrono::Duration;
use common::{festival_db, now};
use database::ServiceError;
use database::services::festival::registration::{
    ContactUpdate, NewRegistration, RegistrationService, VerifyOutcome,
};
use database::services::festival::scan::ScanService;
use models::scan::{ScanCode, ScanMode};

fn sample_registration(email: &str) -> NewRegistration {
    NewRegistration {
        first_name: "Ana".into(),
        last_name: "Mora".into(),
        email: email.into(),
        phone: "0991234567".into(),
        cedula: None,
        edad: Some(24),
        sector: Some("Norte".into()),
        sports: vec!["Correr".into()],
    }
}

#[tokio::test]
async fn registration_starts_pending() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("ana@mail.ec"), now())
        .await
        .expect("registration should succeed");

    assert_eq!(row.status, "PENDING");
    assert_eq!(row.sports.0, vec!["Correr".to_string()]);
    assert!(row.check_in_time.is_none());
    assert!(!row.entrada_scanned);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let db = festival_db().await;
    RegistrationService::create(&db, sample_registration("ana@mail.ec"), now())
        .await
        .expect("first registration should succeed");

    let err = RegistrationService::create(&db, sample_registration("ana@mail.ec"), now())
        .await
        .expect_err("duplicate email must be rejected");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let db = festival_db().await;

    let mut bad_phone = sample_registration("p@mail.ec");
    bad_phone.phone = "12345".into();
    assert!(matches!(
        RegistrationService::create(&db, bad_phone, now()).await,
        Err(ServiceError::BadRequest(_))
    ));

    let mut bad_sport = sample_registration("s@mail.ec");
    bad_sport.sports = vec!["Parkour".into()];
    assert!(matches!(
        RegistrationService::create(&db, bad_sport, now()).await,
        Err(ServiceError::BadRequest(_))
    ));

    let mut bad_cedula = sample_registration("c@mail.ec");
    bad_cedula.cedula = Some("1714616124".into());
    assert!(matches!(
        RegistrationService::create(&db, bad_cedula, now()).await,
        Err(ServiceError::BadRequest(_))
    ));

    let rows = RegistrationService::get_all(&db, None, None, None)
        .await
        .expect("listing should work");
    assert!(rows.is_empty(), "rejected requests must not persist rows");
}

#[tokio::test]
async fn cedula_is_unique_and_searchable() {
    let db = festival_db().await;
    let mut first = sample_registration("uno@mail.ec");
    first.cedula = Some("1714616123".into());
    RegistrationService::create(&db, first, now())
        .await
        .expect("valid cédula should be accepted");

    let found = RegistrationService::get_by_cedula(&db, "1714616123")
        .await
        .expect("search should work");
    assert!(found.is_some());

    let mut second = sample_registration("dos@mail.ec");
    second.cedula = Some("1714616123".into());
    let err = RegistrationService::create(&db, second, now())
        .await
        .expect_err("duplicate cédula must be rejected");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn verify_checks_in_once_and_keeps_the_original_timestamp() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("v@mail.ec"), now())
        .await
        .expect("registration should succeed");

    let first_scan = now();
    let outcome = RegistrationService::verify(&db, row.id, first_scan)
        .await
        .expect("first verification should succeed");
    let checked_in = match outcome {
        VerifyOutcome::CheckedIn(r) => r,
        VerifyOutcome::AlreadyUsed(_) => panic!("first verification must check in"),
    };
    assert_eq!(checked_in.status, "CHECKED_IN");
    assert_eq!(checked_in.check_in_time, Some(first_scan));

    let outcome = RegistrationService::verify(&db, row.id, first_scan + Duration::minutes(5))
        .await
        .expect("repeat verification should not error");
    match outcome {
        VerifyOutcome::AlreadyUsed(r) => {
            assert_eq!(r.check_in_time, Some(first_scan), "timestamp must not move");
        }
        VerifyOutcome::CheckedIn(_) => panic!("repeat verification must be idempotent"),
    }
}

#[tokio::test]
async fn contact_update_requires_some_field_and_validates() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("u@mail.ec"), now())
        .await
        .expect("registration should succeed");

    let err = RegistrationService::update_contact(
        &db,
        row.id,
        ContactUpdate {
            email: None,
            phone: None,
        },
        now(),
    )
    .await
    .expect_err("empty update must be rejected");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let updated = RegistrationService::update_contact(
        &db,
        row.id,
        ContactUpdate {
            email: Some("nueva@mail.ec".into()),
            phone: None,
        },
        now(),
    )
    .await
    .expect("valid update should succeed");
    assert_eq!(updated.email, "nueva@mail.ec");
}

#[tokio::test]
async fn entrada_is_monotonic() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("e@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let qr = row.id.to_string();

    let first = ScanService::scan_entrada(&db, &qr, None, now())
        .await
        .expect("first entrada should succeed");
    assert!(first.participant.entrada_scanned);
    assert_eq!(first.participant.status, "CHECKED_IN");

    let err = ScanService::scan_entrada(&db, &qr, None, now())
        .await
        .expect_err("second entrada must fail");
    match err {
        ServiceError::Scan { code, .. } => assert_eq!(code, ScanCode::AlreadyEntered),
        other => panic!("unexpected error: {other:?}"),
    }

    let unchanged = RegistrationService::get_by_id(&db, row.id)
        .await
        .expect("lookup should work")
        .expect("row should exist");
    assert_eq!(unchanged.entrada_time, Some(first.timestamp));
}

#[tokio::test]
async fn strict_entrega_requires_entrada_first() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("s1@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let qr = row.id.to_string();

    let err = ScanService::scan_entrega(&db, &qr, None, now())
        .await
        .expect_err("entrega before entrada must fail");
    match err {
        ServiceError::Scan { code, .. } => assert_eq!(code, ScanCode::NotEntered),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn combined_entrega_stamps_entrada_as_side_effect() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("s2@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let qr = row.id.to_string();

    let record = ScanService::scan_entrega_combined(&db, &qr, None, now())
        .await
        .expect("combined entrega should succeed without entrada");
    assert!(record.participant.entrada_scanned);
    assert!(record.participant.entrega_scanned);
    assert_eq!(record.participant.status, "CHECKED_IN");

    let err = ScanService::scan_entrega_combined(&db, &qr, None, now())
        .await
        .expect_err("entrega is still settable only once");
    assert!(matches!(
        err,
        ServiceError::Scan {
            code: ScanCode::AlreadyScanned,
            ..
        }
    ));
}

#[tokio::test]
async fn completo_and_sorteo_enforce_ordering() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("s3@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let qr = row.id.to_string();

    let err = ScanService::scan_completo(&db, &qr, None, now())
        .await
        .expect_err("completo before entrega must fail");
    assert!(matches!(
        err,
        ServiceError::Scan {
            code: ScanCode::PassportNotDelivered,
            ..
        }
    ));

    ScanService::scan_entrada(&db, &qr, None, now())
        .await
        .expect("entrada should succeed");

    let err = ScanService::scan_sorteo(&db, &qr, None, now())
        .await
        .expect_err("sorteo without entrega must fail");
    assert!(matches!(
        err,
        ServiceError::Scan {
            code: ScanCode::PassportNotDelivered,
            ..
        }
    ));

    ScanService::scan_entrega(&db, &qr, None, now())
        .await
        .expect("entrega should succeed");
    ScanService::scan_completo(&db, &qr, None, now())
        .await
        .expect("completo should succeed after entrega");
    ScanService::scan_sorteo(&db, &qr, None, now())
        .await
        .expect("sorteo should succeed after entrada+entrega");

    let err = ScanService::scan_sorteo(&db, &qr, None, now())
        .await
        .expect_err("sorteo is settable only once");
    assert!(matches!(
        err,
        ServiceError::Scan {
            code: ScanCode::AlreadyParticipated,
            ..
        }
    ));
}

#[tokio::test]
async fn validate_is_read_only() {
    let db = festival_db().await;
    let row = RegistrationService::create(&db, sample_registration("ro@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let qr = row.id.to_string();

    let preview = ScanService::validate(&db, &qr, ScanMode::Entrada)
        .await
        .expect("validation should succeed");
    assert!(preview.can_scan);
    assert!(!preview.eligible_for_sorteo);

    let unchanged = RegistrationService::get_by_id(&db, row.id)
        .await
        .expect("lookup should work")
        .expect("row should exist");
    assert!(!unchanged.entrada_scanned, "validate must not mutate");
}

#[tokio::test]
async fn unknown_qr_reports_invalid_code() {
    let db = festival_db().await;
    let err = ScanService::validate(&db, "not-a-uuid", ScanMode::Entrada)
        .await
        .expect_err("unknown QR must fail");
    assert!(matches!(
        err,
        ServiceError::Scan {
            code: ScanCode::InvalidQr,
            ..
        }
    ));
}

#[tokio::test]
async fn stats_count_by_status_and_sport() {
    let db = festival_db().await;
    let first = RegistrationService::create(&db, sample_registration("st1@mail.ec"), now())
        .await
        .expect("registration should succeed");
    let mut other = sample_registration("st2@mail.ec");
    other.sports = vec!["Correr".into(), "Nadar".into()];
    RegistrationService::create(&db, other, now())
        .await
        .expect("registration should succeed");

    RegistrationService::verify(&db, first.id, now())
        .await
        .expect("check-in should succeed");

    let stats = RegistrationService::stats(&db).await.expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.checked_in, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.sports_count, 3);
    assert_eq!(stats.sport_breakdown.get("Correr"), Some(&2));
    assert_eq!(stats.sport_breakdown.get("Nadar"), Some(&1));
    assert_eq!(stats.recent_scans.len(), 1);
}
