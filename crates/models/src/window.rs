use chrono::NaiveDate;
use serde::Serialize;

/// Fallback schedule used when no timeslot configuration has been saved yet.
pub fn default_event_dates() -> Vec<NaiveDate> {
    [(2026, 2, 27), (2026, 2, 28), (2026, 3, 1)]
        .into_iter()
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

pub const DEFAULT_DURATION_MINUTES: u32 = 15;
pub const DEFAULT_START_HOUR: u32 = 8;
pub const DEFAULT_END_HOUR: u32 = 20;

/// The schedule the automatic registration window is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSchedule {
    pub event_dates: Vec<NaiveDate>,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WindowSchedule {
    fn default() -> Self {
        Self {
            event_dates: default_event_dates(),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Admin-set manual override; the most recent record wins over the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualOverride {
    pub is_open: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WindowStatus {
    Open,
    Closed {
        message: String,
        reason: Option<String>,
        next_opening: Option<String>,
    },
}

impl WindowStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

fn format_date_es(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Decide whether registration is currently open.
///
/// A manual override is authoritative regardless of date or time. Without
/// one, `today` must be one of the event dates and `hour` must fall inside
/// `[start_hour, end_hour)`. Comparisons are calendar-date only; the caller
/// supplies `today`/`hour` already converted to the event's local zone.
pub fn evaluate(
    today: NaiveDate,
    hour: u32,
    schedule: &WindowSchedule,
    manual: Option<&ManualOverride>,
) -> WindowStatus {
    if let Some(manual) = manual {
        if manual.is_open {
            return WindowStatus::Open;
        }
        return WindowStatus::Closed {
            message: "Registro cerrado manualmente".to_string(),
            reason: manual.reason.clone(),
            next_opening: None,
        };
    }

    if !schedule.event_dates.contains(&today) {
        let next = schedule
            .event_dates
            .iter()
            .copied()
            .filter(|date| *date >= today)
            .min()
            .or_else(|| schedule.event_dates.first().copied());

        return WindowStatus::Closed {
            message: "Registro cerrado. Solo disponible en las fechas del evento".to_string(),
            reason: None,
            next_opening: next
                .map(|date| format!("{} {}:00", format_date_es(date), schedule.start_hour)),
        };
    }

    if hour < schedule.start_hour || hour >= schedule.end_hour {
        let next_opening = if hour >= schedule.end_hour {
            format!("Mañana {}:00", schedule.start_hour)
        } else {
            format!("Hoy {}:00", schedule.start_hour)
        };
        return WindowStatus::Closed {
            message: format!(
                "Registro cerrado. Horario: {}:00 - {}:00",
                schedule.start_hour, schedule.end_hour
            ),
            reason: None,
            next_opening: Some(next_opening),
        };
    }

    WindowStatus::Open
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn manual_override_wins_over_schedule() {
        let schedule = WindowSchedule::default();
        let closed_day = date(2025, 6, 1);

        let open = ManualOverride {
            is_open: true,
            reason: None,
        };
        assert!(evaluate(closed_day, 3, &schedule, Some(&open)).is_open());

        let shut = ManualOverride {
            is_open: false,
            reason: Some("mantenimiento".into()),
        };
        let status = evaluate(date(2026, 2, 27), 10, &schedule, Some(&shut));
        match status {
            WindowStatus::Closed { reason, .. } => assert_eq!(reason.as_deref(), Some("mantenimiento")),
            WindowStatus::Open => panic!("override should close the window"),
        }
    }

    #[test]
    fn open_during_event_hours() {
        let schedule = WindowSchedule::default();
        assert!(evaluate(date(2026, 2, 27), 8, &schedule, None).is_open());
        assert!(evaluate(date(2026, 3, 1), 19, &schedule, None).is_open());
    }

    #[test]
    fn closed_outside_event_dates_hints_next_date() {
        let schedule = WindowSchedule::default();
        let status = evaluate(date(2026, 2, 26), 12, &schedule, None);
        match status {
            WindowStatus::Closed { next_opening, .. } => {
                assert_eq!(next_opening.as_deref(), Some("27/02/2026 8:00"));
            }
            WindowStatus::Open => panic!("should be closed before the event"),
        }
    }

    #[test]
    fn all_dates_past_falls_back_to_first_date() {
        let schedule = WindowSchedule::default();
        let status = evaluate(date(2026, 3, 2), 12, &schedule, None);
        match status {
            WindowStatus::Closed { next_opening, .. } => {
                assert_eq!(next_opening.as_deref(), Some("27/02/2026 8:00"));
            }
            WindowStatus::Open => panic!("should be closed after the event"),
        }
    }

    #[test]
    fn closed_outside_hours_hints_same_or_next_day() {
        let schedule = WindowSchedule::default();

        let early = evaluate(date(2026, 2, 27), 6, &schedule, None);
        match early {
            WindowStatus::Closed { next_opening, .. } => {
                assert_eq!(next_opening.as_deref(), Some("Hoy 8:00"));
            }
            WindowStatus::Open => panic!("should be closed before opening hour"),
        }

        let late = evaluate(date(2026, 2, 27), 20, &schedule, None);
        match late {
            WindowStatus::Closed { next_opening, .. } => {
                assert_eq!(next_opening.as_deref(), Some("Mañana 8:00"));
            }
            WindowStatus::Open => panic!("end hour is exclusive"),
        }
    }
}
