use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::Serialize;
use strum::EnumIter;

/// Sports a festival participant can sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter)]
pub enum Sport {
    Correr,
    Nadar,
    Gimnasio,
    Baile,
    Futbol,
    Basket,
    Ninguno,
}

impl Sport {
    /// Every selectable sport, in display order.
    pub const ALL: [Sport; 7] = [
        Self::Correr,
        Self::Nadar,
        Self::Gimnasio,
        Self::Baile,
        Self::Futbol,
        Self::Basket,
        Self::Ninguno,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correr => "Correr",
            Self::Nadar => "Nadar",
            Self::Gimnasio => "Gimnasio",
            Self::Baile => "Baile",
            Self::Futbol => "Futbol",
            Self::Basket => "Basket",
            Self::Ninguno => "Ninguno",
        }
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Correr" => Ok(Self::Correr),
            "Nadar" => Ok(Self::Nadar),
            "Gimnasio" => Ok(Self::Gimnasio),
            "Baile" => Ok(Self::Baile),
            "Futbol" => Ok(Self::Futbol),
            "Basket" => Ok(Self::Basket),
            "Ninguno" => Ok(Self::Ninguno),
            _ => Err(format!("Unknown sport: {s}")),
        }
    }
}

impl Display for Sport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SportListError {
    #[error("Debe seleccionar al menos un deporte")]
    Empty,
    #[error("Deportes inválidos seleccionados")]
    Unknown,
}

/// The registration form sends sports as free strings; reject anything
/// outside the fixed list and empty selections.
pub fn validate_sports(raw: &[String]) -> Result<(), SportListError> {
    if raw.is_empty() {
        return Err(SportListError::Empty);
    }
    if raw.iter().any(|s| Sport::from_str(s).is_err()) {
        return Err(SportListError::Unknown);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_sport_round_trips() {
        for sport in Sport::iter() {
            assert_eq!(Sport::from_str(sport.as_str()), Ok(sport));
        }
    }

    #[test]
    fn validation_rejects_empty_and_unknown() {
        assert_eq!(validate_sports(&[]), Err(SportListError::Empty));
        assert_eq!(
            validate_sports(&["Correr".into(), "Parkour".into()]),
            Err(SportListError::Unknown)
        );
        assert_eq!(validate_sports(&["Correr".into(), "Nadar".into()]), Ok(()));
    }

    #[test]
    fn sports_are_case_sensitive() {
        assert!(Sport::from_str("correr").is_err());
    }
}
