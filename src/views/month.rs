use chrono::{Datelike, NaiveDate};

use crate::{constants::WEEKDAY_HEADERS, dates, domain::EventStore};

use super::EventChip;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub title: String,
    pub weekday_headers: [&'static str; 7],
    pub leading_blanks: usize,
    pub days: Vec<MonthDayCell>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthDayCell {
    pub date: NaiveDate,
    pub date_key: String,
    pub day: u32,
    pub is_today: bool,
    pub chips: Vec<EventChip>,
}

impl MonthGrid {
    /// Grid position (blanks included) of a day in this month.
    pub fn cell_position(&self, date: NaiveDate) -> Option<usize> {
        self.days
            .iter()
            .position(|cell| cell.date == date)
            .map(|idx| idx + self.leading_blanks)
    }

    pub fn week_rows(&self) -> usize {
        (self.leading_blanks + self.days.len()).div_ceil(7)
    }
}

pub fn build_month_grid(store: &EventStore, reference: NaiveDate, today: NaiveDate) -> MonthGrid {
    let first = dates::first_of_month(reference);
    let days = first
        .iter_days()
        .take(dates::days_in_month(reference) as usize)
        .map(|date| {
            let date_key = dates::date_key(date);
            let chips = store
                .events_on(&date_key)
                .iter()
                .enumerate()
                .map(|(index, stored)| EventChip::from_stored(&date_key, index, stored))
                .collect();
            MonthDayCell {
                date,
                day: date.day(),
                is_today: date == today,
                date_key,
                chips,
            }
        })
        .collect();

    MonthGrid {
        title: dates::month_title(reference),
        weekday_headers: WEEKDAY_HEADERS,
        leading_blanks: dates::first_weekday_offset(reference) as usize,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_store() -> EventStore {
        let mut store = EventStore::new();
        let mut lunch = Event::new("Lunch", "2024-06-10");
        lunch.start_time = "12:30".to_string();
        lunch.color = "#43a047".to_string();
        store.upsert("2024-06-10", None, lunch).unwrap();

        let mut call = Event::new("Call mom", "2024-06-10");
        call.reminder = true;
        store.upsert("2024-06-10", None, call).unwrap();
        store
    }

    #[test]
    fn test_june_2024_layout() {
        let grid = build_month_grid(&EventStore::new(), date(2024, 6, 18), date(2024, 1, 1));

        assert_eq!(grid.title, "June 2024");
        assert_eq!(grid.weekday_headers[0], "Sun");
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.days.len(), 30);
        assert_eq!(grid.days[0].date_key, "2024-06-01");
        assert_eq!(grid.week_rows(), 6);
        assert!(grid.days.iter().all(|cell| !cell.is_today));
    }

    #[test]
    fn test_lunch_chip_label() {
        let grid = build_month_grid(&june_store(), date(2024, 6, 1), date(2024, 6, 10));

        let cell = &grid.days[9];
        assert_eq!(cell.date, date(2024, 6, 10));
        assert!(cell.is_today);
        assert_eq!(cell.chips.len(), 2);
        assert_eq!(cell.chips[0].label(), "12:30p Lunch");
        assert!(!cell.chips[0].reminder);
        assert_eq!(cell.chips[1].label(), "Call mom");
        assert!(cell.chips[1].reminder);
        assert_eq!(cell.chips[1].index, 1);
    }

    #[test]
    fn test_cell_position_includes_blanks() {
        let grid = build_month_grid(&EventStore::new(), date(2024, 6, 1), date(2024, 6, 1));
        assert_eq!(grid.cell_position(date(2024, 6, 1)), Some(6));
        assert_eq!(grid.cell_position(date(2024, 7, 1)), None);
    }

    #[test]
    fn test_rerender_is_identical() {
        let store = june_store();
        let first = build_month_grid(&store, date(2024, 6, 1), date(2024, 6, 10));
        let second = build_month_grid(&store, date(2024, 6, 1), date(2024, 6, 10));
        assert_eq!(first, second);
    }
}
