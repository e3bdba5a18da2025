use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::constants::{DURATIONS, FALLBACK_DURATION_MINUTES};

pub fn duration_to_minutes(label: &str) -> u32 {
    DURATIONS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, minutes)| *minutes)
        .unwrap_or(FALLBACK_DURATION_MINUTES)
}

pub fn parse_hhmm(value: &str) -> Option<(u32, u32)> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some((time.hour(), time.minute()))
}

/// Compact 12-hour label: "9a", "2:30p", "12a" for midnight.
pub fn format_short_time(value: &str) -> String {
    let Some((hour, minute)) = parse_hhmm(value) else {
        return String::new();
    };

    let suffix = if hour < 12 { 'a' } else { 'p' };
    let hour12 = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };

    if minute == 0 {
        format!("{}{}", hour12, suffix)
    } else {
        format!("{}:{:02}{}", hour12, minute, suffix)
    }
}

/// Sunday at or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn week_days(start: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take(7).collect()
}

pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Accepts only the canonical zero-padded form produced by [`date_key`].
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()?;
    (date_key(date) == key.trim()).then_some(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_weekday_offset(date: NaiveDate) -> u32 {
    first_of_month(date).weekday().num_days_from_sunday()
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta < 0 {
        date.checked_sub_months(months)
    } else {
        date.checked_add_months(months)
    };
    shifted.unwrap_or(date)
}

pub fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta < 0 {
        date.checked_sub_days(days)
    } else {
        date.checked_add_days(days)
    };
    shifted.unwrap_or(date)
}

pub fn hour_label(hour: u32) -> String {
    if hour == 0 {
        return String::new();
    }
    let display = if hour > 12 { hour - 12 } else { hour };
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    format!("{} {}", display, meridiem)
}

pub fn hour_start_time(hour: u32) -> String {
    format!("{:02}:00", hour)
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn month_title(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub fn day_title(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn weekday_abbrev(date: NaiveDate) -> String {
    date.format("%a").to_string().to_uppercase()
}

pub fn week_title(start: NaiveDate) -> String {
    let end = shift_days(start, 6);
    let start_month = start.format("%B").to_string();
    let end_month = end.format("%B").to_string();

    if start.year() == end.year() && start.month() == end.month() {
        format!("{} {}–{}, {}", start_month, start.day(), end.day(), start.year())
    } else if start.year() == end.year() {
        format!(
            "{} {} – {} {}, {}",
            start_month,
            start.day(),
            end_month,
            end.day(),
            start.year()
        )
    } else {
        format!(
            "{} {}, {} – {} {}, {}",
            start_month,
            start.day(),
            start.year(),
            end_month,
            end.day(),
            end.year()
        )
    }
}

pub fn display_offset_label(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.unsigned_abs();
    format!("GMT{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

pub fn reminder_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date_key(date)?;
    let (hour, minute) = parse_hhmm(time)?;
    date.and_hms_opt(hour, minute, 0)
}

pub fn clock_lines(now: NaiveDateTime) -> (String, String) {
    (
        now.format("%a %b %d %Y").to_string(),
        now.format("%-I:%M:%S %p").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_to_minutes_table() {
        assert_eq!(duration_to_minutes("15 min"), 15);
        assert_eq!(duration_to_minutes("30 min"), 30);
        assert_eq!(duration_to_minutes("45 min"), 45);
        assert_eq!(duration_to_minutes("1 hr"), 60);
        assert_eq!(duration_to_minutes("1.5 hr"), 90);
        assert_eq!(duration_to_minutes("2 hr"), 120);
        assert_eq!(duration_to_minutes("3 hr"), 180);
        assert_eq!(duration_to_minutes("All day"), 1440);
    }

    #[test]
    fn test_duration_to_minutes_unknown_defaults_to_hour() {
        assert_eq!(duration_to_minutes(""), 60);
        assert_eq!(duration_to_minutes("4 hr"), 60);
        assert_eq!(duration_to_minutes("all day"), 60);
    }

    #[test]
    fn test_format_short_time_omits_zero_minutes() {
        assert_eq!(format_short_time("09:00"), "9a");
        assert_eq!(format_short_time("00:00"), "12a");
        assert_eq!(format_short_time("12:00"), "12p");
        assert_eq!(format_short_time("23:00"), "11p");
    }

    #[test]
    fn test_format_short_time_pads_minutes() {
        assert_eq!(format_short_time("14:30"), "2:30p");
        assert_eq!(format_short_time("12:30"), "12:30p");
        assert_eq!(format_short_time("00:05"), "12:05a");
        assert_eq!(format_short_time("11:59"), "11:59a");
    }

    #[test]
    fn test_format_short_time_every_valid_input() {
        for hour in 0..24u32 {
            for minute in 0..60u32 {
                let label = format_short_time(&format!("{:02}:{:02}", hour, minute));
                let suffix = if hour < 12 { "a" } else { "p" };
                assert!(label.ends_with(suffix), "{label}");
                assert_eq!(label.contains(':'), minute != 0, "{label}");
            }
        }
    }

    #[test]
    fn test_format_short_time_empty_or_invalid() {
        assert_eq!(format_short_time(""), "");
        assert_eq!(format_short_time("noon"), "");
    }

    #[test]
    fn test_week_start_is_sunday_on_or_before() {
        let mut day = date(2023, 12, 20);
        for _ in 0..60 {
            let start = week_start(day);
            assert_eq!(start.weekday().num_days_from_sunday(), 0);
            assert!(start <= day);
            assert!((day - start).num_days() < 7);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_week_start_examples() {
        assert_eq!(week_start(date(2024, 6, 10)), date(2024, 6, 9));
        assert_eq!(week_start(date(2024, 6, 9)), date(2024, 6, 9));
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 29));
    }

    #[test]
    fn test_date_key_is_zero_padded() {
        assert_eq!(date_key(date(2024, 6, 1)), "2024-06-01");
        assert_eq!(date_key(date(987, 12, 31)), "0987-12-31");
    }

    #[test]
    fn test_parse_date_key_rejects_non_canonical() {
        assert_eq!(parse_date_key("2024-06-10"), Some(date(2024, 6, 10)));
        assert_eq!(parse_date_key("2024-6-10"), None);
        assert_eq!(parse_date_key("2024-02-30"), None);
        assert_eq!(parse_date_key(""), None);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_weekday_offset(date(2024, 6, 18)), 6);
        assert_eq!(days_in_month(date(2024, 6, 18)), 30);
        assert_eq!(days_in_month(date(2024, 2, 1)), 29);
        assert_eq!(days_in_month(date(2023, 12, 5)), 31);
    }

    #[test]
    fn test_shift_months_clamps_day() {
        assert_eq!(shift_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2024, 1, 15), -1), date(2023, 12, 15));
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour_label(0), "");
        assert_eq!(hour_label(1), "1 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(23), "11 PM");
        assert_eq!(hour_start_time(7), "07:00");
    }

    #[test]
    fn test_week_title_variants() {
        assert_eq!(week_title(date(2024, 6, 9)), "June 9–15, 2024");
        assert_eq!(week_title(date(2024, 6, 30)), "June 30 – July 6, 2024");
        assert_eq!(
            week_title(date(2024, 12, 29)),
            "December 29, 2024 – January 4, 2025"
        );
    }

    #[test]
    fn test_titles() {
        assert_eq!(month_title(date(2024, 6, 10)), "June 2024");
        assert_eq!(day_title(date(2024, 6, 10)), "June 10, 2024");
        assert_eq!(weekday_abbrev(date(2024, 6, 10)), "MON");
    }

    #[test]
    fn test_display_offset_label() {
        assert_eq!(display_offset_label(5 * 3600 + 30 * 60), "GMT+05:30");
        assert_eq!(display_offset_label(-4 * 3600), "GMT-04:00");
        assert_eq!(display_offset_label(0), "GMT+00:00");
    }

    #[test]
    fn test_reminder_datetime() {
        let at = reminder_datetime("2024-06-10", "08:45").unwrap();
        assert_eq!(at, date(2024, 6, 10).and_hms_opt(8, 45, 0).unwrap());
        assert!(reminder_datetime("2024-06-10", "").is_none());
        assert!(reminder_datetime("", "08:45").is_none());
    }
}
