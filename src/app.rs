use std::{
    io::{self, IsTerminal, Write},
    time::{Duration, Instant},
};

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::{
    config::Settings,
    constants::{GRID_SETTINGS, TIME_SETTINGS},
    dates,
    domain::{Calendar, DragToken},
    editor::EventEditor,
    error::CalendarError,
    reminders::{Notifier, Permission, ReminderScheduler},
    views::ViewMode,
};

mod editor_modal_view;
mod event_handlers;
mod grid_views;
mod render_views;
mod sidebar_view;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Main,
    Editor,
}

/// Queues reminder text for the status line. The bell only rings once
/// stdout has been confirmed to be a terminal.
#[derive(Debug, Default)]
struct TerminalNotifier {
    permission: Option<Permission>,
    inbox: Vec<String>,
}

impl TerminalNotifier {
    fn may_ring(&self) -> bool {
        self.permission == Some(Permission::Granted)
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        self.permission.unwrap_or(Permission::Default)
    }

    fn request_permission(&mut self) {
        let permission = if io::stdout().is_terminal() {
            Permission::Granted
        } else {
            Permission::Denied
        };
        info!("event=notify_permission status={:?}", permission);
        self.permission = Some(permission);
    }

    fn notify(&mut self, message: &str) {
        self.inbox.push(message.to_string());
    }
}

struct App {
    calendar: Calendar,
    reminders: ReminderScheduler<TerminalNotifier>,
    editor: EventEditor,
    view_mode: ViewMode,
    ui_mode: UiMode,
    now: NaiveDateTime,
    cursor: NaiveDate,
    selected_hour: u32,
    scroll_hour: u32,
    selected_chip: Option<usize>,
    drag: Option<DragToken>,
    mini_reference: NaiveDate,
    offset_label: String,
    status: Option<String>,
    render_needed: bool,
}

impl App {
    fn new(settings: &Settings) -> Self {
        let local = Local::now();
        let now = local.naive_local();
        let start_hour = GRID_SETTINGS.initial_scroll_px / GRID_SETTINGS.px_per_row;

        Self {
            calendar: Calendar::open(&settings.blob_path()),
            reminders: ReminderScheduler::new(TerminalNotifier::default()),
            editor: EventEditor::new(),
            view_mode: ViewMode::Month,
            ui_mode: UiMode::Main,
            now,
            cursor: now.date(),
            selected_hour: start_hour,
            scroll_hour: start_hour,
            selected_chip: None,
            drag: None,
            mini_reference: now.date(),
            offset_label: dates::display_offset_label(local.offset().local_minus_utc()),
            status: None,
            render_needed: true,
        }
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn cursor_key(&self) -> String {
        dates::date_key(self.cursor)
    }

    fn set_cursor(&mut self, date: NaiveDate) {
        self.cursor = date;
        self.mini_reference = date;
        self.selected_chip = None;
        self.render_needed = true;
    }

    fn set_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.selected_chip = None;
        self.render_needed = true;
    }

    fn in_editor(&self) -> bool {
        matches!(self.ui_mode, UiMode::Editor)
    }

    fn open_editor(&mut self, index: Option<usize>, start_time: Option<String>) {
        let date_key = self.cursor_key();
        self.editor.open(
            self.calendar.store(),
            &date_key,
            index,
            start_time.as_deref(),
        );
        self.ui_mode = UiMode::Editor;
        self.render_needed = true;
    }

    fn close_editor(&mut self) {
        self.editor.close();
        self.ui_mode = UiMode::Main;
        self.render_needed = true;
    }

    fn report_error(&mut self, err: &CalendarError) {
        self.status = Some(format!("Error: {}", err));
        self.render_needed = true;
    }

    /// The month's first day unless the cursor sits in the current month.
    fn quick_add_date(&self) -> NaiveDate {
        let today = self.today();
        if self.cursor.year() == today.year() && self.cursor.month() == today.month() {
            today
        } else {
            dates::first_of_month(self.cursor)
        }
    }

    fn mini_month_target(&self) -> NaiveDate {
        let first = dates::first_of_month(self.mini_reference);
        let day = self.cursor.day().min(dates::days_in_month(first));
        first.with_day(day).unwrap_or(first)
    }

    fn on_tick(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.reminders.fire_due(now);

        let notifier = self.reminders.notifier_mut();
        let fired: Vec<String> = notifier.inbox.drain(..).collect();
        let may_ring = notifier.may_ring();
        if let Some(last) = fired.last() {
            self.status = Some(last.clone());
            if may_ring {
                ring_bell();
            }
        }
        self.render_needed = true;
    }

    fn modal_rect_ratio(
        &self,
        terminal_size: Rect,
        numerator: u16,
        denominator: u16,
        min_height: u16,
    ) -> Rect {
        let target_width = terminal_size.width.saturating_mul(numerator) / denominator;
        let target_height =
            (terminal_size.height.saturating_mul(numerator) / denominator).max(min_height);

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

pub fn run_ui(settings: &Settings) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    info!("event=ui_start view={}", app.view_mode.label());

    let tick_rate = Duration::from_millis(TIME_SETTINGS.tick_ms);
    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);
    let render_rate = Duration::from_millis(1000 / TIME_SETTINGS.target_fps);
    let mut last_tick = Instant::now();
    let mut last_render = Instant::now();

    loop {
        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Local::now().naive_local());
            last_tick = Instant::now();
        }

        if last_render.elapsed() >= render_rate && app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
            last_render = Instant::now();
        }

        if event::poll(poll_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)
        {
            break;
        }
    }

    info!("event=ui_stop pending_reminders={}", app.reminders.pending().len());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use super::*;
    use crate::domain::Event as CalendarEvent;

    pub(super) fn app_at(dir: &TempDir, now: NaiveDateTime) -> App {
        let settings = Settings::resolve(Some(dir.path().to_path_buf()), Some("off".into()));
        let mut app = App::new(&settings);
        app.now = now;
        app.set_cursor(now.date());
        app
    }

    pub(super) fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn noon(day: u32) -> NaiveDateTime {
        june(day).and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_quick_add_date_uses_today_or_first() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at(&dir, noon(10));
        assert_eq!(app.quick_add_date(), june(10));

        app.set_cursor(NaiveDate::from_ymd_opt(2024, 8, 20).unwrap());
        assert_eq!(app.quick_add_date(), NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    }

    #[test]
    fn test_mini_month_target_clamps_day() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at(&dir, noon(10));
        app.set_cursor(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        app.mini_reference = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert_eq!(
            app.mini_month_target(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_tick_fires_reminder_into_status() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at(&dir, noon(10));
        let id = app
            .calendar
            .upsert("2024-06-10", None, CalendarEvent::new("Call", "2024-06-10"))
            .unwrap();
        assert!(app.reminders.schedule(
            id,
            "Call",
            june(10).and_hms_opt(12, 5, 0).unwrap(),
            noon(10)
        ));

        app.on_tick(june(10).and_hms_opt(12, 1, 0).unwrap());
        assert!(app.status.is_none());

        app.on_tick(june(10).and_hms_opt(12, 5, 0).unwrap());
        assert_eq!(app.status.as_deref(), Some("🔔 Reminder: Call"));
        assert!(app.reminders.pending().is_empty());
    }

    #[test]
    fn test_quit_key() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at(&dir, noon(10));
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
