//! UI-free view models for every calendar view.
//!
//! Builders here read the [`EventStore`] and return plain data: chips, hour
//! slots and pixel-positioned blocks. The terminal front-end and the CLI only
//! draw these; none of the layout rules live in widget code.

use chrono::NaiveDate;

use crate::{
    constants::GRID_SETTINGS,
    dates,
    domain::{Event, EventId, EventStore, StoredEvent},
};

pub mod day;
pub mod mini;
pub mod month;
pub mod summary;
pub mod week;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        }
    }

    /// Reference date after one navigation step.
    pub fn step(self, reference: NaiveDate, forward: bool) -> NaiveDate {
        let sign = if forward { 1 } else { -1 };
        match self {
            ViewMode::Month => dates::shift_months(reference, sign),
            ViewMode::Week => dates::shift_days(reference, 7 * sign as i64),
            ViewMode::Day => dates::shift_days(reference, sign as i64),
        }
    }

    pub fn visible_dates(self, reference: NaiveDate) -> Vec<NaiveDate> {
        match self {
            ViewMode::Month => {
                let first = dates::first_of_month(reference);
                first
                    .iter_days()
                    .take(dates::days_in_month(reference) as usize)
                    .collect()
            }
            ViewMode::Week => dates::week_days(dates::week_start(reference)),
            ViewMode::Day => vec![reference],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventChip {
    pub id: EventId,
    pub date_key: String,
    pub index: usize,
    pub time_prefix: String,
    pub title: String,
    pub color: String,
    pub reminder: bool,
}

impl EventChip {
    pub fn from_stored(date_key: &str, index: usize, stored: &StoredEvent) -> Self {
        let short = dates::format_short_time(&stored.event.start_time);
        Self {
            id: stored.id,
            date_key: date_key.to_string(),
            index,
            time_prefix: if short.is_empty() {
                short
            } else {
                format!("{} ", short)
            },
            title: stored.event.title.clone(),
            color: stored.event.color.clone(),
            reminder: stored.event.reminder,
        }
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.time_prefix, self.title)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBlock {
    pub id: EventId,
    pub date_key: String,
    pub index: usize,
    pub title: String,
    pub start_time: String,
    pub color: String,
    pub top: u32,
    pub height: u32,
}

impl EventBlock {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: u32,
    pub label: String,
    pub start_time: String,
}

/// One pixel per minute from midnight; height floored for visibility.
pub fn block_geometry(event: &Event) -> Option<(u32, u32)> {
    let top = event.start_minutes()?;
    let height = event.duration_minutes().max(GRID_SETTINGS.min_block_height);
    Some((top, height))
}

pub(crate) fn positioned_blocks(
    store: &EventStore,
    date_key: &str,
    include_all_day: bool,
) -> Vec<EventBlock> {
    store
        .events_on(date_key)
        .iter()
        .enumerate()
        .filter(|(_, stored)| include_all_day || !stored.event.is_all_day())
        .filter_map(|(index, stored)| {
            let (top, height) = block_geometry(&stored.event)?;
            Some(EventBlock {
                id: stored.id,
                date_key: date_key.to_string(),
                index,
                title: stored.event.title.clone(),
                start_time: stored.event.start_time.clone(),
                color: stored.event.color.clone(),
                top,
                height,
            })
        })
        .collect()
}

pub(crate) fn hour_slots() -> Vec<HourSlot> {
    (0..GRID_SETTINGS.hours_per_day)
        .map(|hour| HourSlot {
            hour,
            label: dates::hour_label(hour),
            start_time: dates::hour_start_time(hour),
        })
        .collect()
}
