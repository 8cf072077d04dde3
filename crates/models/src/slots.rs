use chrono::NaiveDate;

/// One bookable slot produced by the generator, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTemplate {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// `HH:MM`, zero padded.
pub fn format_hhmm(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Parse a `HH:MM` label back to minutes since midnight.
pub fn parse_hhmm(label: &str) -> Option<u32> {
    let (hours, minutes) = label.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// How many slots fit in one operating day.
pub fn slots_per_day(duration_minutes: u32, start_hour: u32, end_hour: u32) -> u32 {
    if duration_minutes == 0 || end_hour <= start_hour {
        return 0;
    }
    (end_hour - start_hour) * 60 / duration_minutes
}

/// Emit back-to-back slots for every event date: starting at `start_hour`,
/// consecutive windows of `duration_minutes` with no gaps, stopping before a
/// slot would cross `end_hour`.
pub fn build_slots(
    event_dates: &[NaiveDate],
    duration_minutes: u32,
    start_hour: u32,
    end_hour: u32,
) -> Vec<SlotTemplate> {
    let mut slots = Vec::new();
    if duration_minutes == 0 {
        return slots;
    }

    let end_minute = end_hour * 60;
    for &date in event_dates {
        let mut current = start_hour * 60;
        while current + duration_minutes <= end_minute {
            slots.push(SlotTemplate {
                date,
                start_time: format_hhmm(current),
                end_time: format_hhmm(current + duration_minutes),
            });
            current += duration_minutes;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()
    }

    #[test]
    fn fifteen_minute_slots_over_twelve_hours() {
        let slots = build_slots(&[day()], 15, 8, 20);
        assert_eq!(slots.len(), 48);
        assert_eq!(slots_per_day(15, 8, 20), 48);

        assert_eq!(slots[0].start_time, "08:00");
        assert_eq!(slots[0].end_time, "08:15");
        assert_eq!(slots[1].start_time, "08:15");
        assert_eq!(slots.last().unwrap().start_time, "19:45");
        assert_eq!(slots.last().unwrap().end_time, "20:00");
    }

    #[test]
    fn partial_trailing_slot_is_dropped() {
        // 50-minute slots in a 2-hour window: only two fit.
        let slots = build_slots(&[day()], 50, 8, 10);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end_time, "09:40");
        assert_eq!(slots_per_day(50, 8, 10), 2);
    }

    #[test]
    fn slots_are_generated_per_date() {
        let other = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let slots = build_slots(&[day(), other], 60, 8, 10);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[2].date, other);
    }

    #[test]
    fn zero_duration_yields_nothing() {
        assert!(build_slots(&[day()], 0, 8, 20).is_empty());
        assert_eq!(slots_per_day(0, 8, 20), 0);
        assert_eq!(slots_per_day(15, 20, 8), 0);
    }

    #[test]
    fn hhmm_round_trip() {
        assert_eq!(format_hhmm(8 * 60 + 5), "08:05");
        assert_eq!(parse_hhmm("08:05"), Some(8 * 60 + 5));
        assert_eq!(parse_hhmm("19:45"), Some(19 * 60 + 45));
        assert_eq!(parse_hhmm("8"), None);
        assert_eq!(parse_hhmm("08:99"), None);
    }
}
