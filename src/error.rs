use thiserror::Error;

use crate::constants::DURATION_LABELS;

const CATEGORY_HINT: &str = "Emergency, Holiday, Reminder, Event or a #rrggbb color";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Please enter an event title.")]
    EmptyTitle,

    #[error("Please select a date.")]
    MissingDate,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error(
        "Invalid duration '{0}', expected one of {labels}",
        labels = DURATION_LABELS.join(", ")
    )]
    InvalidDuration(String),

    #[error("Unknown category '{0}', expected {hint}", hint = CATEGORY_HINT)]
    UnknownCategory(String),

    #[error("Unsupported shell: {0}. Use bash, zsh, or fish.")]
    UnsupportedShell(String),

    #[error("No event at {date_key} index {index}")]
    EventNotFound { date_key: String, index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalendarError {
    pub fn not_found(date_key: &str, index: usize) -> Self {
        CalendarError::EventNotFound {
            date_key: date_key.to_string(),
            index,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalendarError::EmptyTitle
                | CalendarError::MissingDate
                | CalendarError::InvalidDate(_)
                | CalendarError::InvalidTime(_)
                | CalendarError::InvalidDuration(_)
                | CalendarError::UnknownCategory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
