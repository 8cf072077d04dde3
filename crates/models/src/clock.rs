use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Clock pinned to the event's local zone.
///
/// Timestamps are stored as naive UTC; this type owns every conversion to
/// the local calendar so date/hour comparisons never depend on the host's
/// zone or on formatting tricks. Guayaquil has no DST, so a fixed offset is
/// exact.
#[derive(Debug, Clone, Copy)]
pub struct EventClock {
    name: &'static str,
    offset: FixedOffset,
}

impl EventClock {
    pub fn guayaquil() -> Self {
        Self {
            name: "America/Guayaquil",
            offset: FixedOffset::west_opt(5 * 3600).expect("UTC-5 is a valid offset"),
        }
    }

    pub fn zone_name(&self) -> &'static str {
        self.name
    }

    /// Current instant in the event zone.
    pub fn now_local(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Current instant as the naive UTC value persisted in the stores.
    pub fn now_utc(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    /// Today's calendar date in the event zone.
    pub fn today(&self) -> NaiveDate {
        self.now_local().date_naive()
    }

    /// Current hour (0–23) in the event zone.
    pub fn hour(&self) -> u32 {
        use chrono::Timelike;
        self.now_local().hour()
    }

    /// Minutes since local midnight, for "future slots today" filtering.
    pub fn minutes_into_day(&self) -> u32 {
        use chrono::Timelike;
        let now = self.now_local();
        now.hour() * 60 + now.minute()
    }

    /// Render a stored UTC timestamp as a local `dd/mm/yyyy HH:MM` label for
    /// operator-facing messages.
    pub fn format_local(&self, stored_utc: NaiveDateTime) -> String {
        let local = Utc
            .from_utc_datetime(&stored_utc)
            .with_timezone(&self.offset);
        local.format("%d/%m/%Y %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_stored_utc_in_local_zone() {
        let clock = EventClock::guayaquil();
        // 2026-02-27 13:30 UTC is 08:30 in Guayaquil.
        let stored = NaiveDate::from_ymd_opt(2026, 2, 27)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        assert_eq!(clock.format_local(stored), "27/02/2026 08:30");
    }

    #[test]
    fn utc_evening_can_be_previous_local_day() {
        let clock = EventClock::guayaquil();
        let stored = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        // 03:00 UTC on March 1st is still February 28th locally.
        assert_eq!(clock.format_local(stored), "28/02/2026 22:00");
    }

    #[test]
    fn zone_is_named() {
        assert_eq!(EventClock::guayaquil().zone_name(), "America/Guayaquil");
    }
}
