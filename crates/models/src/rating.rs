use serde::Serialize;

/// Post-visit interest rating collected per escape-room group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterestRating {
    NotInterested,
    SlightlyInterested,
    VeryInterested,
}

/// Label shown for reservations that were never rated.
pub const UNRATED_LABEL: &str = "Sin calificar";

impl InterestRating {
    pub fn value(self) -> i16 {
        match self {
            Self::NotInterested => 1,
            Self::SlightlyInterested => 2,
            Self::VeryInterested => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotInterested => "No interesado",
            Self::SlightlyInterested => "Poco interesado",
            Self::VeryInterested => "Bastante interesado",
        }
    }

    /// Label for an optional stored rating, falling back to [`UNRATED_LABEL`].
    pub fn label_for(stored: Option<i16>) -> &'static str {
        stored
            .and_then(|value| Self::try_from(value).ok())
            .map_or(UNRATED_LABEL, Self::label)
    }
}

impl TryFrom<i16> for InterestRating {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::NotInterested),
            2 => Ok(Self::SlightlyInterested),
            3 => Ok(Self::VeryInterested),
            other => Err(format!(
                "Calificación inválida. El valor debe ser 1 (No interesado), 2 (Poco interesado) o 3 (Bastante interesado). Valor recibido: {other}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range_is_one_to_three() {
        assert_eq!(InterestRating::try_from(1), Ok(InterestRating::NotInterested));
        assert_eq!(InterestRating::try_from(3), Ok(InterestRating::VeryInterested));
        assert!(InterestRating::try_from(0).is_err());
        assert!(InterestRating::try_from(4).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(InterestRating::label_for(Some(2)), "Poco interesado");
        assert_eq!(InterestRating::label_for(None), UNRATED_LABEL);
        assert_eq!(InterestRating::label_for(Some(9)), UNRATED_LABEL);
    }
}
