use chrono::NaiveDate;

use crate::{
    constants::SUMMARY_SETTINGS,
    dates,
    domain::{Category, EventStore},
};

use super::ViewMode;

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySummary {
    pub entries: Vec<CategoryCount>,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    /// Segments keep equal width; empty ones are faded, not dropped.
    pub opacity: f32,
}

pub fn summarize_dates(store: &EventStore, visible: &[NaiveDate]) -> CategorySummary {
    let mut counts = [0usize; 4];
    for date in visible {
        for stored in store.events_on(&dates::date_key(*date)) {
            counts[stored.event.category().index()] += 1;
        }
    }

    let entries = Category::ALL
        .into_iter()
        .map(|category| {
            let count = counts[category.index()];
            CategoryCount {
                category,
                count,
                opacity: if count > 0 {
                    1.0
                } else {
                    SUMMARY_SETTINGS.empty_segment_opacity
                },
            }
        })
        .collect();

    CategorySummary {
        entries,
        total: counts.iter().sum(),
    }
}

pub fn summarize_view(store: &EventStore, mode: ViewMode, reference: NaiveDate) -> CategorySummary {
    summarize_dates(store, &mode.visible_dates(reference))
}
