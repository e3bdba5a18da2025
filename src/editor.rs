use chrono::NaiveDateTime;
use log::info;

use crate::{
    constants::{CATEGORIES, DEFAULT_COLOR, DEFAULT_DURATION, DURATION_LABELS},
    dates,
    domain::{Calendar, Category, Event, EventId, EventStore, StoredEvent},
    error::{CalendarError, Result},
    reminders::{Notifier, ReminderScheduler},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSlot {
    pub date_key: String,
    pub index: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Date,
    StartTime,
    Duration,
    Notes,
    Color,
    Reminder,
    ReminderDate,
    ReminderTime,
}

impl EditorField {
    pub const ALL: [EditorField; 9] = [
        EditorField::Title,
        EditorField::Date,
        EditorField::StartTime,
        EditorField::Duration,
        EditorField::Notes,
        EditorField::Color,
        EditorField::Reminder,
        EditorField::ReminderDate,
        EditorField::ReminderTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorField::Title => "Title",
            EditorField::Date => "Date",
            EditorField::StartTime => "Start",
            EditorField::Duration => "Duration",
            EditorField::Notes => "Notes",
            EditorField::Color => "Category",
            EditorField::Reminder => "Reminder",
            EditorField::ReminderDate => "Remind on",
            EditorField::ReminderTime => "Remind at",
        }
    }

    fn position(self) -> usize {
        EditorField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        EditorField::ALL[(self.position() + 1) % EditorField::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = EditorField::ALL.len();
        EditorField::ALL[(self.position() + len - 1) % len]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorForm {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub duration: String,
    pub notes: String,
    pub color: String,
    pub reminder: bool,
    pub reminder_date: String,
    pub reminder_time: String,
}

impl EditorForm {
    pub fn for_create(date_key: &str, start_time: Option<&str>) -> Self {
        Self {
            title: String::new(),
            date: date_key.to_string(),
            start_time: start_time.unwrap_or_default().to_string(),
            duration: DEFAULT_DURATION.to_string(),
            notes: String::new(),
            color: DEFAULT_COLOR.to_string(),
            reminder: false,
            reminder_date: String::new(),
            reminder_time: String::new(),
        }
    }

    pub fn from_event(event: &Event, date_key: &str) -> Self {
        let or = |value: &str, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            title: event.title.clone(),
            date: or(&event.date, date_key),
            start_time: event.start_time.clone(),
            duration: or(&event.duration, DEFAULT_DURATION),
            notes: event.notes.clone(),
            color: or(&event.color, DEFAULT_COLOR),
            reminder: event.reminder,
            reminder_date: event.reminder_date.clone(),
            reminder_time: event.reminder_time.clone(),
        }
    }

    pub fn to_event(&self) -> Result<Event> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CalendarError::EmptyTitle);
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(CalendarError::MissingDate);
        }
        if dates::parse_date_key(date).is_none() {
            return Err(CalendarError::InvalidDate(date.to_string()));
        }

        let start_time = self.start_time.trim();
        if !start_time.is_empty() && dates::parse_hhmm(start_time).is_none() {
            return Err(CalendarError::InvalidTime(start_time.to_string()));
        }

        if !DURATION_LABELS.contains(&self.duration.as_str()) {
            return Err(CalendarError::InvalidDuration(self.duration.clone()));
        }

        let reminder_date = self.reminder_date.trim();
        if !reminder_date.is_empty() && dates::parse_date_key(reminder_date).is_none() {
            return Err(CalendarError::InvalidDate(reminder_date.to_string()));
        }
        let reminder_time = self.reminder_time.trim();
        if !reminder_time.is_empty() && dates::parse_hhmm(reminder_time).is_none() {
            return Err(CalendarError::InvalidTime(reminder_time.to_string()));
        }

        Ok(Event {
            title: title.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            duration: self.duration.clone(),
            notes: self.notes.clone(),
            color: self.color.clone(),
            reminder: self.reminder,
            reminder_date: reminder_date.to_string(),
            reminder_time: reminder_time.to_string(),
        })
    }

    pub fn text_mut(&mut self, field: EditorField) -> Option<&mut String> {
        match field {
            EditorField::Title => Some(&mut self.title),
            EditorField::Date => Some(&mut self.date),
            EditorField::StartTime => Some(&mut self.start_time),
            EditorField::Notes => Some(&mut self.notes),
            EditorField::ReminderDate => Some(&mut self.reminder_date),
            EditorField::ReminderTime => Some(&mut self.reminder_time),
            EditorField::Duration | EditorField::Color | EditorField::Reminder => None,
        }
    }

    pub fn display_value(&self, field: EditorField) -> String {
        match field {
            EditorField::Title => self.title.clone(),
            EditorField::Date => self.date.clone(),
            EditorField::StartTime => self.start_time.clone(),
            EditorField::Duration => self.duration.clone(),
            EditorField::Notes => self.notes.clone(),
            EditorField::Color => Category::from_color(&self.color).label().to_string(),
            EditorField::Reminder => String::from(if self.reminder { "on" } else { "off" }),
            EditorField::ReminderDate => self.reminder_date.clone(),
            EditorField::ReminderTime => self.reminder_time.clone(),
        }
    }

    pub fn cycle_duration(&mut self, direction: isize) {
        self.duration = cycle(&DURATION_LABELS, &self.duration, direction).to_string();
    }

    pub fn cycle_color(&mut self, direction: isize) {
        let colors: Vec<&str> = CATEGORIES.iter().map(|info| info.hex).collect();
        self.color = cycle(&colors, &self.color, direction).to_string();
    }
}

fn cycle<'a>(options: &[&'a str], current: &str, direction: isize) -> &'a str {
    let len = options.len();
    let next = match options.iter().position(|option| *option == current) {
        Some(pos) if direction < 0 => (pos + len - 1) % len,
        Some(pos) => (pos + 1) % len,
        None => 0,
    };
    options[next]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedEvent {
    pub id: EventId,
    pub event: Event,
    pub reminder_armed: bool,
}

/// Form bound to one `(date_key, index)` slot; `None` index means create.
#[derive(Debug)]
pub struct EventEditor {
    slot: Option<EditorSlot>,
    pub form: EditorForm,
    pub focus: EditorField,
    pub error: Option<String>,
}

impl Default for EventEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEditor {
    pub fn new() -> Self {
        Self {
            slot: None,
            form: EditorForm::for_create("", None),
            focus: EditorField::Title,
            error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.slot.as_ref().is_some_and(|slot| slot.index.is_some())
    }

    /// Opens in edit mode when the slot still holds an event, else create mode.
    pub fn open(
        &mut self,
        store: &EventStore,
        date_key: &str,
        index: Option<usize>,
        start_time: Option<&str>,
    ) {
        let existing = index.and_then(|idx| store.get(date_key, idx).map(|stored| (idx, stored)));

        match existing {
            Some((idx, stored)) => {
                self.form = EditorForm::from_event(&stored.event, date_key);
                self.slot = Some(EditorSlot {
                    date_key: date_key.to_string(),
                    index: Some(idx),
                });
            }
            None => {
                self.form = EditorForm::for_create(date_key, start_time);
                self.slot = Some(EditorSlot {
                    date_key: date_key.to_string(),
                    index: None,
                });
            }
        }
        self.focus = EditorField::Title;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.slot = None;
        self.error = None;
    }

    pub fn save<N: Notifier>(
        &mut self,
        calendar: &mut Calendar,
        reminders: &mut ReminderScheduler<N>,
        now: NaiveDateTime,
    ) -> Result<SavedEvent> {
        let Some(slot) = self.slot.clone() else {
            return Err(CalendarError::MissingDate);
        };

        let event = self.form.to_event().inspect_err(|err| {
            self.error = Some(err.to_string());
        })?;

        let id = calendar
            .upsert(&slot.date_key, slot.index, event.clone())
            .inspect_err(|err| {
                self.error = Some(err.to_string());
            })?;

        let reminder_armed = reminders.sync_event(id, &event, now);
        info!(
            "event=editor_save mode={} id={} date={} reminder={}",
            if slot.index.is_some() { "edit" } else { "create" },
            id.0,
            event.date,
            reminder_armed
        );

        self.close();
        Ok(SavedEvent {
            id,
            event,
            reminder_armed,
        })
    }

    pub fn delete<N: Notifier>(
        &mut self,
        calendar: &mut Calendar,
        reminders: &mut ReminderScheduler<N>,
    ) -> Result<Option<StoredEvent>> {
        let Some(EditorSlot {
            date_key,
            index: Some(index),
        }) = self.slot.clone()
        else {
            return Ok(None);
        };

        let removed = calendar.remove(&date_key, index).inspect_err(|err| {
            self.error = Some(err.to_string());
        })?;
        reminders.cancel(removed.id);
        info!(
            "event=editor_delete id={} date={}",
            removed.id.0, date_key
        );

        self.close();
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::reminders::tests::RecordingNotifier;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn setup() -> (TempDir, Calendar, ReminderScheduler<RecordingNotifier>) {
        let dir = TempDir::new().unwrap();
        let calendar = Calendar::open(&dir.path().join("events.json"));
        (dir, calendar, ReminderScheduler::new(RecordingNotifier::default()))
    }

    #[test]
    fn test_create_mode_defaults() {
        let (_dir, calendar, _) = setup();
        let mut editor = EventEditor::new();

        editor.open(calendar.store(), "2024-06-10", None, Some("14:00"));

        assert!(editor.is_open());
        assert!(!editor.is_edit_mode());
        assert_eq!(editor.form.title, "");
        assert_eq!(editor.form.date, "2024-06-10");
        assert_eq!(editor.form.start_time, "14:00");
        assert_eq!(editor.form.duration, "1 hr");
        assert_eq!(editor.form.color, "#43a047");
        assert!(!editor.form.reminder);
    }

    #[test]
    fn test_save_creates_and_closes() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);
        editor.form.title = "  Lunch ".to_string();
        editor.form.start_time = "12:30".to_string();

        let saved = editor.save(&mut calendar, &mut reminders, now()).unwrap();

        assert!(!editor.is_open());
        assert_eq!(saved.event.title, "Lunch");
        assert_eq!(calendar.store().events_on("2024-06-10").len(), 1);
        assert_eq!(
            Calendar::open(calendar.blob_path()).store().to_map(),
            calendar.store().to_map()
        );
    }

    #[test]
    fn test_empty_title_aborts() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);
        editor.form.title = "   ".to_string();

        let err = editor.save(&mut calendar, &mut reminders, now()).unwrap_err();

        assert!(matches!(err, CalendarError::EmptyTitle));
        assert!(editor.is_open());
        assert_eq!(editor.error.as_deref(), Some("Please enter an event title."));
        assert!(calendar.store().is_empty());
    }

    #[test]
    fn test_missing_or_bad_date_aborts() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);
        editor.form.title = "Lunch".to_string();

        editor.form.date.clear();
        let err = editor.save(&mut calendar, &mut reminders, now()).unwrap_err();
        assert!(matches!(err, CalendarError::MissingDate));

        editor.form.date = "June 10".to_string();
        let err = editor.save(&mut calendar, &mut reminders, now()).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDate(_)));

        editor.form.date = "2024-06-10".to_string();
        editor.form.start_time = "25:00".to_string();
        let err = editor.save(&mut calendar, &mut reminders, now()).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidTime(_)));

        editor.form.start_time = "12:00".to_string();
        editor.form.duration = "4h".to_string();
        let err = editor.save(&mut calendar, &mut reminders, now()).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDuration(_)));
        assert!(err.is_validation());

        assert!(calendar.store().is_empty());
    }

    #[test]
    fn test_edit_with_date_change_relocates() {
        let (_dir, mut calendar, mut reminders) = setup();
        calendar
            .upsert("2024-06-10", None, Event::new("Review", "2024-06-10"))
            .unwrap();
        calendar
            .upsert("2024-06-20", None, Event::new("Other", "2024-06-20"))
            .unwrap();

        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", Some(0), None);
        assert!(editor.is_edit_mode());
        assert_eq!(editor.form.title, "Review");
        editor.form.date = "2024-06-20".to_string();
        editor.save(&mut calendar, &mut reminders, now()).unwrap();

        assert!(calendar.store().events_on("2024-06-10").is_empty());
        let moved = calendar.store().events_on("2024-06-20");
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[1].event.title, "Review");
    }

    #[test]
    fn test_open_missing_index_falls_back_to_create() {
        let (_dir, calendar, _) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", Some(3), None);
        assert!(editor.is_open());
        assert!(!editor.is_edit_mode());
    }

    #[test]
    fn test_save_arms_reminder_and_delete_cancels() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);
        editor.form.title = "Dentist".to_string();
        editor.form.reminder = true;
        editor.form.reminder_date = "2024-06-10".to_string();
        editor.form.reminder_time = "08:00".to_string();

        let saved = editor.save(&mut calendar, &mut reminders, now()).unwrap();
        assert!(saved.reminder_armed);
        assert_eq!(reminders.pending().len(), 1);

        editor.open(calendar.store(), "2024-06-10", Some(0), None);
        let removed = editor.delete(&mut calendar, &mut reminders).unwrap();

        assert_eq!(removed.map(|s| s.id), Some(saved.id));
        assert!(reminders.pending().is_empty());
        assert!(calendar.store().is_empty());
        assert!(!editor.is_open());
    }

    #[test]
    fn test_reminder_without_time_is_not_armed() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);
        editor.form.title = "Dentist".to_string();
        editor.form.reminder = true;
        editor.form.reminder_date = "2024-06-10".to_string();

        let saved = editor.save(&mut calendar, &mut reminders, now()).unwrap();
        assert!(!saved.reminder_armed);
        assert!(reminders.pending().is_empty());
    }

    #[test]
    fn test_delete_in_create_mode_is_noop() {
        let (_dir, mut calendar, mut reminders) = setup();
        let mut editor = EventEditor::new();
        editor.open(calendar.store(), "2024-06-10", None, None);

        assert!(editor.delete(&mut calendar, &mut reminders).unwrap().is_none());
        assert!(editor.is_open());
    }

    #[test]
    fn test_field_cycling() {
        let mut form = EditorForm::for_create("2024-06-10", None);
        form.cycle_duration(1);
        assert_eq!(form.duration, "1.5 hr");
        form.cycle_duration(-1);
        form.cycle_duration(-1);
        assert_eq!(form.duration, "45 min");

        form.cycle_color(1);
        assert_eq!(form.color, "#e53935");
        form.cycle_color(-1);
        assert_eq!(form.color, "#43a047");

        assert_eq!(EditorField::Title.prev(), EditorField::ReminderTime);
        assert_eq!(EditorField::ReminderTime.next(), EditorField::Title);
    }
}
