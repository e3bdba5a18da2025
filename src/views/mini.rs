use chrono::{Datelike, NaiveDate};

use crate::{constants::MINI_DAY_NAMES, dates};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiniMonth {
    pub title: String,
    pub day_names: [&'static str; 7],
    pub cells: Vec<MiniDay>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniDay {
    pub day: u32,
    /// Set only for days of the shown month; filler days carry `None`.
    pub date: Option<NaiveDate>,
    pub is_today: bool,
}

pub fn build_mini_month(reference: NaiveDate, today: NaiveDate) -> MiniMonth {
    let first = dates::first_of_month(reference);
    let leading = dates::first_weekday_offset(reference);
    let last_day = dates::days_in_month(reference);
    let prev_last_day = first.pred_opt().map(|d| d.day()).unwrap_or(31);

    let mut cells: Vec<MiniDay> = (0..leading)
        .map(|i| MiniDay {
            day: prev_last_day - leading + 1 + i,
            date: None,
            is_today: false,
        })
        .collect();

    cells.extend(first.iter_days().take(last_day as usize).map(|date| MiniDay {
        day: date.day(),
        date: Some(date),
        is_today: date == today,
    }));

    let total = leading + last_day;
    let trailing = if total % 7 == 0 { 0 } else { 7 - total % 7 };
    cells.extend((1..=trailing).map(|day| MiniDay {
        day,
        date: None,
        is_today: false,
    }));

    MiniMonth {
        title: dates::month_title(reference),
        day_names: MINI_DAY_NAMES,
        cells,
    }
}
