pub mod answer;
pub mod question;
pub mod registration_control;
pub mod reservation;
pub mod time_slot;
pub mod timeslot_config;
pub mod user;
