pub mod email;
pub mod gateway;
pub mod outcome;
pub mod qr;
pub mod whatsapp;

pub use gateway::{Notifier, NotifyConfig, ReservationNotice};
pub use outcome::{ChannelOutcome, NotificationReport};
