use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Coarse lifecycle of a festival participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantStatus {
    Pending,
    CheckedIn,
    NoShow,
}

impl ParticipantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::CheckedIn => "CHECKED_IN",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CHECKED_IN" => Ok(Self::CheckedIn),
            "NO_SHOW" => Ok(Self::NoShow),
            _ => Err(format!("Unknown participant status: {s}")),
        }
    }
}

impl Display for ParticipantStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of an escape-room reservation.
///
/// `Used` and `Cancelled` are terminal: no operation transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Active,
    Used,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Used => "USED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Cancelled)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "USED" => Ok(Self::Used),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown reservation status: {s}")),
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_status_round_trips() {
        for status in [
            ParticipantStatus::Pending,
            ParticipantStatus::CheckedIn,
            ParticipantStatus::NoShow,
        ] {
            assert_eq!(ParticipantStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn reservation_status_terminality() {
        assert!(!ReservationStatus::Active.is_terminal());
        assert!(ReservationStatus::Used.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(ParticipantStatus::from_str("checked_in").is_err());
        assert!(ReservationStatus::from_str("active").is_err());
    }
}
