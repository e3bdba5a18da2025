use chrono::NaiveDateTime;
use log::{debug, info};

use crate::domain::{Event, EventId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

pub trait Notifier {
    fn permission(&self) -> Permission;
    fn request_permission(&mut self);
    fn notify(&mut self, message: &str);
}

/// Delivers notifications to the log only; used by one-shot CLI runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) {}

    fn notify(&mut self, message: &str) {
        info!("event=reminder_fire message={}", message);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReminder {
    pub id: EventId,
    pub title: String,
    pub fire_at: NaiveDateTime,
}

pub fn reminder_message(title: &str) -> String {
    format!("🔔 Reminder: {}", title)
}

pub struct ReminderScheduler<N: Notifier> {
    pending: Vec<PendingReminder>,
    notifier: N,
}

impl<N: Notifier> ReminderScheduler<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            pending: Vec::new(),
            notifier,
        }
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn pending(&self) -> &[PendingReminder] {
        &self.pending
    }

    /// Arms a one-shot reminder, replacing any pending one for `id`.
    /// Returns false when the target time is not in the future.
    pub fn schedule(
        &mut self,
        id: EventId,
        title: &str,
        fire_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> bool {
        if self.notifier.permission() != Permission::Granted {
            self.notifier.request_permission();
        }

        self.cancel(id);
        if fire_at <= now {
            debug!("event=reminder_skip id={} reason=past", id.0);
            return false;
        }

        self.pending.push(PendingReminder {
            id,
            title: title.to_string(),
            fire_at,
        });
        self.pending.sort_by_key(|reminder| reminder.fire_at);
        info!(
            "event=reminder_schedule id={} delay_secs={}",
            id.0,
            (fire_at - now).num_seconds()
        );
        true
    }

    /// Reschedules from the event's current reminder fields.
    pub fn sync_event(&mut self, id: EventId, event: &Event, now: NaiveDateTime) -> bool {
        match event.reminder_at() {
            Some(fire_at) => self.schedule(id, &event.title, fire_at, now),
            None => {
                self.cancel(id);
                false
            }
        }
    }

    pub fn cancel(&mut self, id: EventId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|reminder| reminder.id != id);
        let cancelled = self.pending.len() != before;
        if cancelled {
            debug!("event=reminder_cancel id={}", id.0);
        }
        cancelled
    }

    /// Fires every reminder due at `now`, earliest first.
    pub fn fire_due(&mut self, now: NaiveDateTime) -> usize {
        let split = self.pending.partition_point(|reminder| reminder.fire_at <= now);
        let due: Vec<PendingReminder> = self.pending.drain(..split).collect();
        for reminder in &due {
            self.notifier.notify(&reminder_message(&reminder.title));
        }
        due.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub permission: Option<Permission>,
        pub requests: usize,
        pub messages: Vec<String>,
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            self.permission.unwrap_or(Permission::Default)
        }

        fn request_permission(&mut self) {
            self.requests += 1;
        }

        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_schedule_future_only() {
        let mut scheduler = ReminderScheduler::new(RecordingNotifier::default());

        assert!(scheduler.schedule(EventId::new(1), "Later", at(10, 0), at(9, 0)));
        assert!(!scheduler.schedule(EventId::new(2), "Past", at(8, 0), at(9, 0)));
        assert!(!scheduler.schedule(EventId::new(3), "Now", at(9, 0), at(9, 0)));

        assert_eq!(scheduler.pending().len(), 1);
        assert_eq!(scheduler.notifier_mut().requests, 3);
    }

    #[test]
    fn test_granted_permission_is_not_requested() {
        let notifier = RecordingNotifier {
            permission: Some(Permission::Granted),
            ..Default::default()
        };
        let mut scheduler = ReminderScheduler::new(notifier);
        scheduler.schedule(EventId::new(1), "Later", at(10, 0), at(9, 0));
        assert_eq!(scheduler.notifier_mut().requests, 0);
    }

    #[test]
    fn test_fire_due_in_order() {
        let mut scheduler = ReminderScheduler::new(RecordingNotifier::default());
        scheduler.schedule(EventId::new(1), "Second", at(11, 0), at(9, 0));
        scheduler.schedule(EventId::new(2), "First", at(10, 0), at(9, 0));
        scheduler.schedule(EventId::new(3), "Third", at(12, 0), at(9, 0));

        assert_eq!(scheduler.fire_due(at(9, 30)), 0);
        assert_eq!(scheduler.fire_due(at(11, 0)), 2);

        assert_eq!(
            scheduler.notifier_mut().messages,
            vec!["🔔 Reminder: First", "🔔 Reminder: Second"]
        );
        assert_eq!(scheduler.pending().len(), 1);
        assert_eq!(scheduler.fire_due(at(11, 0)), 0);
    }

    #[test]
    fn test_cancel_and_reschedule_by_id() {
        let mut scheduler = ReminderScheduler::new(RecordingNotifier::default());
        let id = EventId::new(7);
        scheduler.schedule(id, "Old title", at(10, 0), at(9, 0));
        scheduler.schedule(id, "New title", at(10, 30), at(9, 0));

        assert_eq!(scheduler.pending().len(), 1);
        assert_eq!(scheduler.pending()[0].title, "New title");

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.fire_due(at(23, 0)), 0);
        assert!(scheduler.notifier_mut().messages.is_empty());
    }

    #[test]
    fn test_sync_event_cancels_when_reminder_disabled() {
        let mut scheduler = ReminderScheduler::new(RecordingNotifier::default());
        let id = EventId::new(3);
        let mut event = Event::new("Dentist", "2024-06-10");
        event.reminder = true;
        event.reminder_date = "2024-06-10".to_string();
        event.reminder_time = "10:00".to_string();

        assert!(scheduler.sync_event(id, &event, at(9, 0)));
        event.reminder = false;
        assert!(!scheduler.sync_event(id, &event, at(9, 0)));
        assert!(scheduler.pending().is_empty());
    }
}
