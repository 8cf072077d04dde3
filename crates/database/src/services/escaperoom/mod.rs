pub mod admin;
pub mod checkin;
pub mod reservation;
pub mod timeslot;
pub mod trivia;
pub mod user;
pub mod window;
