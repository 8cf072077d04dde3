pub mod escaperoom;
pub mod festival;
