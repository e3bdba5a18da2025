use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ALL_DAY, CATEGORIES, DEFAULT_COLOR, DEFAULT_DURATION},
    dates,
    error::{CalendarError, Result},
    storage,
};

/// Persisted shape: date key -> events in display order.
pub type EventMap = BTreeMap<String, Vec<Event>>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl EventId {
    pub fn new(id: u64) -> Self {
        EventId(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default)]
    pub reminder_date: String,
    #[serde(default)]
    pub reminder_time: String,
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Event {
    pub fn new(title: &str, date: &str) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            start_time: String::new(),
            duration: default_duration(),
            notes: String::new(),
            color: default_color(),
            reminder: false,
            reminder_date: String::new(),
            reminder_time: String::new(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.duration == ALL_DAY
    }

    pub fn start_minutes(&self) -> Option<u32> {
        dates::parse_hhmm(&self.start_time).map(|(h, m)| h * 60 + m)
    }

    pub fn duration_minutes(&self) -> u32 {
        dates::duration_to_minutes(&self.duration)
    }

    pub fn category(&self) -> Category {
        Category::from_color(&self.color)
    }

    pub fn reminder_at(&self) -> Option<chrono::NaiveDateTime> {
        if !self.reminder {
            return None;
        }
        dates::reminder_datetime(&self.reminder_date, &self.reminder_time)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Emergency,
    Holiday,
    Reminder,
    Event,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Emergency,
        Category::Holiday,
        Category::Reminder,
        Category::Event,
    ];

    /// Colors outside the fixed set fold into `Event`.
    pub fn from_color(color: &str) -> Self {
        let color = color.trim();
        CATEGORIES
            .iter()
            .position(|info| info.hex.eq_ignore_ascii_case(color))
            .map(|idx| Category::ALL[idx])
            .unwrap_or(Category::Event)
    }

    pub fn index(self) -> usize {
        match self {
            Category::Emergency => 0,
            Category::Holiday => 1,
            Category::Reminder => 2,
            Category::Event => 3,
        }
    }

    pub fn hex(self) -> &'static str {
        CATEGORIES[self.index()].hex
    }

    pub fn label(self) -> &'static str {
        CATEGORIES[self.index()].label
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: EventId,
    pub event: Event,
}

/// Source of an in-flight drag, taken by the drop handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragToken {
    pub from_key: String,
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct EventStore {
    days: BTreeMap<String, Vec<StoredEvent>>,
    next_event_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: EventMap) -> Self {
        let mut store = Self::new();
        for (date_key, events) in map {
            for event in events {
                let id = store.allocate_id();
                store
                    .days
                    .entry(date_key.clone())
                    .or_default()
                    .push(StoredEvent { id, event });
            }
        }
        store
    }

    pub fn to_map(&self) -> EventMap {
        self.days
            .iter()
            .map(|(key, events)| {
                (
                    key.clone(),
                    events.iter().map(|stored| stored.event.clone()).collect(),
                )
            })
            .collect()
    }

    fn allocate_id(&mut self) -> EventId {
        self.next_event_id += 1;
        EventId::new(self.next_event_id)
    }

    pub fn events_on(&self, date_key: &str) -> &[StoredEvent] {
        self.days.get(date_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, date_key: &str, index: usize) -> Option<&StoredEvent> {
        self.days.get(date_key).and_then(|events| events.get(index))
    }

    pub fn date_keys(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredEvent)> {
        self.days
            .iter()
            .flat_map(|(key, events)| events.iter().map(move |stored| (key.as_str(), stored)))
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn append(&mut self, date_key: &str, stored: StoredEvent) {
        self.days
            .entry(date_key.to_string())
            .or_default()
            .push(stored);
    }

    fn take(&mut self, date_key: &str, index: usize) -> Result<StoredEvent> {
        let events = self
            .days
            .get_mut(date_key)
            .filter(|events| index < events.len())
            .ok_or_else(|| CalendarError::not_found(date_key, index))?;

        let removed = events.remove(index);
        if events.is_empty() {
            self.days.remove(date_key);
        }
        Ok(removed)
    }

    /// New events land on their own date; edits that change the date relocate
    /// to the end of the new date's sequence.
    pub fn upsert(
        &mut self,
        date_key: &str,
        index: Option<usize>,
        event: Event,
    ) -> Result<EventId> {
        let Some(index) = index else {
            let id = self.allocate_id();
            let target = event.date.clone();
            self.append(&target, StoredEvent { id, event });
            return Ok(id);
        };

        if event.date == date_key {
            let slot = self
                .days
                .get_mut(date_key)
                .and_then(|events| events.get_mut(index))
                .ok_or_else(|| CalendarError::not_found(date_key, index))?;
            slot.event = event;
            return Ok(slot.id);
        }

        let existing = self.take(date_key, index)?;
        let target = event.date.clone();
        self.append(
            &target,
            StoredEvent {
                id: existing.id,
                event,
            },
        );
        Ok(existing.id)
    }

    pub fn remove(&mut self, date_key: &str, index: usize) -> Result<StoredEvent> {
        self.take(date_key, index)
    }

    pub fn move_event(
        &mut self,
        from_key: &str,
        from_index: usize,
        to_key: &str,
    ) -> Result<EventId> {
        let mut stored = self.take(from_key, from_index)?;
        let id = stored.id;
        stored.event.date = to_key.to_string();
        self.append(to_key, stored);
        Ok(id)
    }
}

/// Owns the store and writes the blob after every mutation.
pub struct Calendar {
    store: EventStore,
    blob_path: PathBuf,
}

impl Calendar {
    pub fn open(blob_path: &Path) -> Self {
        let map = storage::load_events(blob_path);
        let store = EventStore::from_map(map);
        info!(
            "event=store_load status=ok days={} events={}",
            store.date_keys().count(),
            store.len()
        );
        Self {
            store,
            blob_path: blob_path.to_path_buf(),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn blob_path(&self) -> &Path {
        &self.blob_path
    }

    pub fn save(&self) -> Result<()> {
        let map = self.store.to_map();
        storage::save_events(&self.blob_path, &map).inspect_err(|err| {
            error!("event=store_save status=error error={}", err);
        })?;
        info!("event=store_save status=ok days={}", map.len());
        Ok(())
    }

    pub fn upsert(
        &mut self,
        date_key: &str,
        index: Option<usize>,
        event: Event,
    ) -> Result<EventId> {
        let id = self.store.upsert(date_key, index, event)?;
        self.save()?;
        Ok(id)
    }

    pub fn remove(&mut self, date_key: &str, index: usize) -> Result<StoredEvent> {
        let removed = self.store.remove(date_key, index)?;
        self.save()?;
        Ok(removed)
    }

    pub fn move_event(
        &mut self,
        from_key: &str,
        from_index: usize,
        to_key: &str,
    ) -> Result<EventId> {
        let id = self.store.move_event(from_key, from_index, to_key)?;
        self.save()?;
        Ok(id)
    }

    /// Drops a dragged chip onto `to_key`. Without a token this does nothing.
    pub fn drop_dragged(
        &mut self,
        token: Option<DragToken>,
        to_key: &str,
    ) -> Result<Option<EventId>> {
        let Some(token) = token else {
            return Ok(None);
        };
        self.move_event(&token.from_key, token.index, to_key).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn event(title: &str, date: &str) -> Event {
        Event::new(title, date)
    }

    fn assert_no_empty_keys(store: &EventStore) {
        for key in store.date_keys() {
            assert!(!store.events_on(key).is_empty(), "empty key {key}");
        }
    }

    #[test]
    fn test_event_id_new() {
        let id1 = EventId::new(1);
        assert_ne!(id1, EventId::new(2));
        assert_eq!(id1, EventId::new(1));
    }

    #[test]
    fn test_create_lunch_event() {
        let mut store = EventStore::new();
        let mut lunch = event("Lunch", "2024-06-10");
        lunch.start_time = "12:30".to_string();
        lunch.color = "#43a047".to_string();

        store.upsert("2024-06-10", None, lunch.clone()).unwrap();

        let map = store.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["2024-06-10"], vec![lunch]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = EventStore::new();
        store.upsert("2024-06-10", None, event("A", "2024-06-10")).unwrap();
        let id = store.upsert("2024-06-10", None, event("B", "2024-06-10")).unwrap();

        let replaced = store
            .upsert("2024-06-10", Some(1), event("B2", "2024-06-10"))
            .unwrap();

        assert_eq!(replaced, id);
        let titles: Vec<_> = store
            .events_on("2024-06-10")
            .iter()
            .map(|s| s.event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "B2"]);
    }

    #[test]
    fn test_upsert_date_change_relocates_to_end() {
        let mut store = EventStore::new();
        let id = store.upsert("2024-06-10", None, event("Move me", "2024-06-10")).unwrap();
        store.upsert("2024-06-20", None, event("Existing", "2024-06-20")).unwrap();

        let relocated = store
            .upsert("2024-06-10", Some(0), event("Move me", "2024-06-20"))
            .unwrap();

        assert_eq!(relocated, id);
        assert!(store.events_on("2024-06-10").is_empty());
        assert!(!store.date_keys().any(|k| k == "2024-06-10"));
        let moved = store.events_on("2024-06-20");
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[1].event.title, "Move me");
        assert_eq!(moved[1].id, id);
    }

    #[test]
    fn test_upsert_missing_index_is_error() {
        let mut store = EventStore::new();
        let err = store
            .upsert("2024-06-10", Some(0), event("Ghost", "2024-06-10"))
            .unwrap_err();
        assert!(matches!(err, CalendarError::EventNotFound { index: 0, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_only_event_drops_key() {
        let mut store = EventStore::new();
        store.upsert("2024-06-10", None, event("Solo", "2024-06-10")).unwrap();

        let removed = store.remove("2024-06-10", 0).unwrap();

        assert_eq!(removed.event.title, "Solo");
        assert!(store.is_empty());
        assert!(store.remove("2024-06-10", 0).is_err());
    }

    #[test]
    fn test_move_appends_to_destination() {
        let mut store = EventStore::new();
        store.upsert("2024-06-15", None, event("Already", "2024-06-15")).unwrap();
        let id = store.upsert("2024-06-10", None, event("Dragged", "2024-06-10")).unwrap();

        let moved = store.move_event("2024-06-10", 0, "2024-06-15").unwrap();

        assert_eq!(moved, id);
        assert!(!store.date_keys().any(|k| k == "2024-06-10"));
        let dest = store.events_on("2024-06-15");
        assert_eq!(dest.len(), 2);
        assert_eq!(dest[1].event.title, "Dragged");
        assert_eq!(dest[1].event.date, "2024-06-15");
    }

    #[test]
    fn test_no_empty_keys_after_mixed_operations() {
        let mut store = EventStore::new();
        let dates = ["2024-06-01", "2024-06-02", "2024-06-03"];
        for (i, date) in dates.iter().cycle().take(9).enumerate() {
            store.upsert(date, None, event(&format!("e{i}"), date)).unwrap();
        }
        assert_no_empty_keys(&store);

        store.move_event("2024-06-01", 0, "2024-06-02").unwrap();
        store.move_event("2024-06-01", 0, "2024-06-03").unwrap();
        store.move_event("2024-06-01", 0, "2024-06-04").unwrap();
        assert_no_empty_keys(&store);

        store
            .upsert("2024-06-02", Some(0), event("e1", "2024-06-05"))
            .unwrap();
        while store.remove("2024-06-03", 0).is_ok() {}
        assert_no_empty_keys(&store);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_category_folding() {
        assert_eq!(Category::from_color("#e53935"), Category::Emergency);
        assert_eq!(Category::from_color("#1A73E8"), Category::Holiday);
        assert_eq!(Category::from_color("#f9a825"), Category::Reminder);
        assert_eq!(Category::from_color("#43a047"), Category::Event);
        assert_eq!(Category::from_color("#123456"), Category::Event);
        assert_eq!(Category::from_color(""), Category::Event);
        assert_eq!(Category::by_name("holiday"), Some(Category::Holiday));
    }

    #[test]
    fn test_calendar_persists_every_mutation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");

        let mut calendar = Calendar::open(&path);
        assert!(calendar.store().is_empty());

        calendar
            .upsert("2024-06-10", None, event("Lunch", "2024-06-10"))
            .unwrap();
        assert_eq!(Calendar::open(&path).store().len(), 1);

        calendar.move_event("2024-06-10", 0, "2024-06-15").unwrap();
        let reloaded = Calendar::open(&path);
        assert_eq!(reloaded.store().events_on("2024-06-15").len(), 1);
        assert!(reloaded.store().events_on("2024-06-10").is_empty());

        calendar.remove("2024-06-15", 0).unwrap();
        assert!(Calendar::open(&path).store().is_empty());
    }

    #[test]
    fn test_drop_without_token_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        let mut calendar = Calendar::open(&path);
        calendar
            .upsert("2024-06-10", None, event("Stay", "2024-06-10"))
            .unwrap();

        let outcome = calendar.drop_dragged(None, "2024-06-15").unwrap();

        assert!(outcome.is_none());
        assert_eq!(calendar.store().events_on("2024-06-10").len(), 1);
    }

    #[test]
    fn test_drop_with_token_moves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        let mut calendar = Calendar::open(&path);
        calendar
            .upsert("2024-06-10", None, event("Go", "2024-06-10"))
            .unwrap();

        let token = DragToken {
            from_key: "2024-06-10".to_string(),
            index: 0,
        };
        let moved = calendar.drop_dragged(Some(token), "2024-06-15").unwrap();

        assert!(moved.is_some());
        assert_eq!(calendar.store().events_on("2024-06-15")[0].event.title, "Go");
    }
}
