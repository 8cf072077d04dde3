pub mod common;
pub mod escaperoom;
pub mod registration;
pub mod scan;
