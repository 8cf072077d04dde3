use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// One checkpoint of the festival passport progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Entrada,
    Entrega,
    Completo,
    Sorteo,
}

impl ScanMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Entrega => "entrega",
            Self::Completo => "completo",
            Self::Sorteo => "sorteo",
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(Self::Entrada),
            "entrega" => Ok(Self::Entrega),
            "completo" => Ok(Self::Completo),
            "sorteo" => Ok(Self::Sorteo),
            _ => Err(format!("Unknown scan mode: {s}")),
        }
    }
}

impl Display for ScanMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Stable machine codes scanner clients branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanCode {
    InvalidQr,
    AlreadyEntered,
    NotEntered,
    AlreadyScanned,
    PassportNotDelivered,
    AlreadyParticipated,
}

impl ScanCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidQr => "INVALID_QR",
            Self::AlreadyEntered => "ALREADY_ENTERED",
            Self::NotEntered => "NOT_ENTERED",
            Self::AlreadyScanned => "ALREADY_SCANNED",
            Self::PassportNotDelivered => "PASSPORT_NOT_DELIVERED",
            Self::AlreadyParticipated => "ALREADY_PARTICIPATED",
        }
    }
}

/// A rejected scan attempt: machine code plus operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScanDenial {
    pub code: ScanCode,
    pub message: String,
}

impl ScanDenial {
    fn new(code: ScanCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// The four monotonic checkpoints of one participant's passport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub entrada: bool,
    pub entrega: bool,
    pub completo: bool,
    pub sorteo: bool,
}

impl ScanProgress {
    /// Decide whether `mode` may be stamped right now.
    ///
    /// `entrega` here is the strict variant: it requires a prior `entrada`.
    /// The combined-scanner behavior lives in [`Self::gate_entrega_combined`].
    pub fn gate(&self, mode: ScanMode) -> Result<(), ScanDenial> {
        match mode {
            ScanMode::Entrada => {
                if self.entrada {
                    return Err(ScanDenial::new(
                        ScanCode::AlreadyEntered,
                        "El participante ya registró su entrada",
                    ));
                }
                Ok(())
            }
            ScanMode::Entrega => {
                if !self.entrada {
                    return Err(ScanDenial::new(
                        ScanCode::NotEntered,
                        "El participante debe registrar entrada primero",
                    ));
                }
                if self.entrega {
                    return Err(ScanDenial::new(
                        ScanCode::AlreadyScanned,
                        "El pasaporte ya fue entregado",
                    ));
                }
                Ok(())
            }
            ScanMode::Completo => {
                if !self.entrega {
                    return Err(ScanDenial::new(
                        ScanCode::PassportNotDelivered,
                        "El pasaporte debe ser entregado primero",
                    ));
                }
                if self.completo {
                    return Err(ScanDenial::new(
                        ScanCode::AlreadyScanned,
                        "El pasaporte ya fue marcado como completo",
                    ));
                }
                Ok(())
            }
            ScanMode::Sorteo => {
                if !self.entrada {
                    return Err(ScanDenial::new(
                        ScanCode::NotEntered,
                        "El participante debe registrar entrada primero",
                    ));
                }
                if !self.entrega {
                    return Err(ScanDenial::new(
                        ScanCode::PassportNotDelivered,
                        "El participante debe recoger su pasaporte primero",
                    ));
                }
                if self.sorteo {
                    return Err(ScanDenial::new(
                        ScanCode::AlreadyParticipated,
                        "El participante ya está participando en el sorteo",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Combined-scanner `entrega`: stamps `entrada` as a side effect, so the
    /// only precondition is that `entrega` itself is still unset.
    pub fn gate_entrega_combined(&self) -> Result<(), ScanDenial> {
        if self.entrega {
            return Err(ScanDenial::new(
                ScanCode::AlreadyScanned,
                "El pasaporte ya fue entregado",
            ));
        }
        Ok(())
    }

    /// Sorteo needs entrada + entrega and must not have happened yet.
    pub fn eligible_for_sorteo(&self) -> bool {
        self.entrada && self.entrega && !self.sorteo
    }

    /// Operator hint shown by the pre-flight validation endpoint.
    pub fn can_scan_message(mode: ScanMode) -> &'static str {
        match mode {
            ScanMode::Entrada => "Puede registrar entrada",
            ScanMode::Entrega => "Puede entregar pasaporte",
            ScanMode::Completo => "Puede marcar como completo",
            ScanMode::Sorteo => "Puede registrar participación en el sorteo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrada_is_settable_once() {
        let mut progress = ScanProgress::default();
        assert!(progress.gate(ScanMode::Entrada).is_ok());
        progress.entrada = true;
        let denial = progress.gate(ScanMode::Entrada).unwrap_err();
        assert_eq!(denial.code, ScanCode::AlreadyEntered);
    }

    #[test]
    fn strict_entrega_requires_entrada() {
        let progress = ScanProgress::default();
        let denial = progress.gate(ScanMode::Entrega).unwrap_err();
        assert_eq!(denial.code, ScanCode::NotEntered);
    }

    #[test]
    fn combined_entrega_does_not_require_entrada() {
        let progress = ScanProgress::default();
        assert!(progress.gate_entrega_combined().is_ok());

        let done = ScanProgress {
            entrega: true,
            ..ScanProgress::default()
        };
        assert_eq!(
            done.gate_entrega_combined().unwrap_err().code,
            ScanCode::AlreadyScanned
        );
    }

    #[test]
    fn completo_requires_entrega() {
        let entered = ScanProgress {
            entrada: true,
            ..ScanProgress::default()
        };
        let denial = entered.gate(ScanMode::Completo).unwrap_err();
        assert_eq!(denial.code, ScanCode::PassportNotDelivered);

        let delivered = ScanProgress {
            entrada: true,
            entrega: true,
            ..ScanProgress::default()
        };
        assert!(delivered.gate(ScanMode::Completo).is_ok());
    }

    #[test]
    fn sorteo_requires_both_prerequisites() {
        let none = ScanProgress::default();
        assert_eq!(none.gate(ScanMode::Sorteo).unwrap_err().code, ScanCode::NotEntered);

        let entered = ScanProgress {
            entrada: true,
            ..ScanProgress::default()
        };
        assert_eq!(
            entered.gate(ScanMode::Sorteo).unwrap_err().code,
            ScanCode::PassportNotDelivered
        );

        let ready = ScanProgress {
            entrada: true,
            entrega: true,
            ..ScanProgress::default()
        };
        assert!(ready.gate(ScanMode::Sorteo).is_ok());
        assert!(ready.eligible_for_sorteo());

        let done = ScanProgress {
            entrada: true,
            entrega: true,
            sorteo: true,
            ..ScanProgress::default()
        };
        assert_eq!(
            done.gate(ScanMode::Sorteo).unwrap_err().code,
            ScanCode::AlreadyParticipated
        );
        assert!(!done.eligible_for_sorteo());
    }

    #[test]
    fn scan_mode_parses_lowercase_names() {
        assert_eq!(ScanMode::from_str("entrada"), Ok(ScanMode::Entrada));
        assert_eq!(ScanMode::from_str("sorteo"), Ok(ScanMode::Sorteo));
        assert!(ScanMode::from_str("ENTRADA").is_err());
    }
}
