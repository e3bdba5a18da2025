use chrono::{Datelike, NaiveDate};

use crate::{dates, domain::EventStore};

use super::{EventBlock, HourSlot, hour_slots, positioned_blocks};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGrid {
    pub title: String,
    pub offset_label: String,
    pub date: NaiveDate,
    pub date_key: String,
    pub abbrev: String,
    pub day_number: u32,
    pub is_today: bool,
    pub slots: Vec<HourSlot>,
    pub blocks: Vec<EventBlock>,
}

/// Every event with a start time is positioned, all-day ones included.
pub fn build_day_grid(
    store: &EventStore,
    date: NaiveDate,
    today: NaiveDate,
    offset_label: &str,
) -> DayGrid {
    let date_key = dates::date_key(date);
    DayGrid {
        title: dates::day_title(date),
        offset_label: offset_label.to_string(),
        abbrev: dates::weekday_abbrev(date),
        day_number: date.day(),
        is_today: date == today,
        slots: hour_slots(),
        blocks: positioned_blocks(store, &date_key, true),
        date,
        date_key,
    }
}
