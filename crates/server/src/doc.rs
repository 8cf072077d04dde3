use crate::routes::{escaperoom, health, registration, scan, stats, verification};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        registration::create,
        registration::list,
        registration::get_by_id,
        registration::search_by_cedula,
        registration::update,
        registration::resend,
        registration::send_alt_email,
        registration::send_whatsapp,
        verification::verify,
        stats::get_stats,
        scan::validate,
        scan::entrada,
        scan::entrega,
        scan::entrega_combined,
        scan::completo,
        scan::sorteo,
        scan::history,
        scan::stats,
        escaperoom::health,
        escaperoom::users::register_multiple,
        escaperoom::users::search,
        escaperoom::trivia::questions,
        escaperoom::trivia::validate,
        escaperoom::timeslots::slots_for_date,
        escaperoom::reservations::create,
        escaperoom::reservations::create_multiple,
        escaperoom::reservations::resend,
        escaperoom::checkin::validate,
        escaperoom::checkin::confirm,
        escaperoom::checkin::reassign,
        escaperoom::checkin::group_checkin,
        escaperoom::checkin::group_reassign,
        escaperoom::checkin::checked_in_groups,
        escaperoom::checkin::rate_group,
        escaperoom::checkin::available_timeslots,
        escaperoom::admin::registration_status,
        escaperoom::admin::set_registration_control,
        escaperoom::admin::reset_registration_control,
        escaperoom::admin::timeslot_config,
        escaperoom::admin::set_timeslot_config,
        escaperoom::admin::generate_timeslots,
        escaperoom::admin::clear_timeslots,
        escaperoom::admin::users_data,
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Registrations", description = "Festival participant registration"),
        (name = "Verification", description = "Festival ticket verification"),
        (name = "Stats", description = "Festival dashboard numbers"),
        (name = "Scan", description = "Festival passport scanner API"),
        (name = "EscapeRoom", description = "Escape-room registration, trivia, and booking"),
        (name = "EscapeRoomCheckin", description = "Escape-room staff check-in operations"),
        (name = "EscapeRoomAdmin", description = "Escape-room administration"),
    ),
    info(
        title = "PowerFest Events API",
        version = "1.0.0",
        description = "Registration and check-in backend for the sports festival and the escape-room attraction",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
