use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::{constants::GRID_SETTINGS, dates, domain::EventStore};

use super::{EventBlock, EventChip, HourSlot, hour_slots, positioned_blocks};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekGrid {
    pub title: String,
    pub offset_label: String,
    pub days: Vec<WeekDayColumn>,
    pub now_line: Option<NowLine>,
    pub initial_scroll: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekDayColumn {
    pub date: NaiveDate,
    pub date_key: String,
    pub abbrev: String,
    pub day_number: u32,
    pub is_today: bool,
    pub all_day: Vec<EventChip>,
    pub slots: Vec<HourSlot>,
    pub blocks: Vec<EventBlock>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NowLine {
    pub day_index: usize,
    pub top: u32,
}

pub fn build_week_grid(
    store: &EventStore,
    reference: NaiveDate,
    now: NaiveDateTime,
    offset_label: &str,
) -> WeekGrid {
    let start = dates::week_start(reference);
    let today = now.date();

    let days: Vec<WeekDayColumn> = dates::week_days(start)
        .into_iter()
        .map(|date| {
            let date_key = dates::date_key(date);
            let all_day = store
                .events_on(&date_key)
                .iter()
                .enumerate()
                .filter(|(_, stored)| stored.event.is_all_day())
                .map(|(index, stored)| EventChip::from_stored(&date_key, index, stored))
                .collect();
            let blocks = positioned_blocks(store, &date_key, false);

            WeekDayColumn {
                abbrev: dates::weekday_abbrev(date),
                day_number: date.day(),
                is_today: date == today,
                all_day,
                slots: hour_slots(),
                blocks,
                date,
                date_key,
            }
        })
        .collect();

    let now_line = days
        .iter()
        .position(|column| column.is_today)
        .map(|day_index| NowLine {
            day_index,
            top: dates::minutes_since_midnight(now.time()),
        });

    WeekGrid {
        title: dates::week_title(start),
        offset_label: offset_label.to_string(),
        days,
        now_line,
        initial_scroll: GRID_SETTINGS.initial_scroll_px,
    }
}
