use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    constants::GRID_SETTINGS,
    dates,
    domain::DragToken,
    editor::EditorField,
    views::ViewMode,
};

use super::{App, UiMode, ui_helpers};

impl App {
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.in_editor() {
            self.handle_editor_key(key);
            false
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focus = self.editor.focus;

        match key.code {
            KeyCode::Esc => self.close_editor(),
            KeyCode::Enter => self.save_editor(),
            KeyCode::Char('d') if ctrl => self.delete_from_editor(),
            KeyCode::Tab | KeyCode::Down => self.editor.focus = focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.editor.focus = focus.prev(),
            KeyCode::Left | KeyCode::Right => {
                let direction = if key.code == KeyCode::Left { -1 } else { 1 };
                match focus {
                    EditorField::Duration => self.editor.form.cycle_duration(direction),
                    EditorField::Color => self.editor.form.cycle_color(direction),
                    EditorField::Reminder => {
                        self.editor.form.reminder = !self.editor.form.reminder
                    }
                    _ => {}
                }
            }
            KeyCode::Char(' ') if focus == EditorField::Reminder => {
                self.editor.form.reminder = !self.editor.form.reminder;
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(text) = self.editor.form.text_mut(focus) {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.editor.form.text_mut(focus) {
                    text.pop();
                }
            }
            _ => {}
        }

        self.render_needed = true;
    }

    fn save_editor(&mut self) {
        let now = Local::now().naive_local();
        match self.editor.save(&mut self.calendar, &mut self.reminders, now) {
            Ok(saved) => {
                self.ui_mode = UiMode::Main;
                self.selected_chip = None;
                self.drag = None;
                self.status = Some(if saved.reminder_armed {
                    format!("Saved '{}' (reminder set)", saved.event.title)
                } else {
                    format!("Saved '{}'", saved.event.title)
                });
            }
            Err(err) if err.is_validation() => {}
            Err(err) => {
                self.close_editor();
                self.report_error(&err);
            }
        }
    }

    fn delete_from_editor(&mut self) {
        match self.editor.delete(&mut self.calendar, &mut self.reminders) {
            Ok(Some(removed)) => {
                self.ui_mode = UiMode::Main;
                self.selected_chip = None;
                self.drag = None;
                self.status = Some(format!("Deleted '{}'", removed.event.title));
            }
            Ok(None) => {}
            Err(err) => {
                self.close_editor();
                self.report_error(&err);
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let last_hour = GRID_SETTINGS.hours_per_day - 1;

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('m') => self.set_view(ViewMode::Month),
            KeyCode::Char('w') => self.set_view(ViewMode::Week),
            KeyCode::Char('d') => self.set_view(ViewMode::Day),
            KeyCode::Char('n') => self.set_cursor(self.view_mode.step(self.cursor, true)),
            KeyCode::Char('p') => self.set_cursor(self.view_mode.step(self.cursor, false)),
            KeyCode::Char('t') => self.set_cursor(self.today()),
            KeyCode::Left => self.set_cursor(dates::shift_days(self.cursor, -1)),
            KeyCode::Right => self.set_cursor(dates::shift_days(self.cursor, 1)),
            KeyCode::Up => match self.view_mode {
                ViewMode::Month => self.set_cursor(dates::shift_days(self.cursor, -7)),
                ViewMode::Week | ViewMode::Day => {
                    self.selected_hour = self.selected_hour.saturating_sub(1);
                    self.selected_chip = None;
                }
            },
            KeyCode::Down => match self.view_mode {
                ViewMode::Month => self.set_cursor(dates::shift_days(self.cursor, 7)),
                ViewMode::Week | ViewMode::Day => {
                    self.selected_hour = (self.selected_hour + 1).min(last_hour);
                    self.selected_chip = None;
                }
            },
            KeyCode::Tab | KeyCode::BackTab => {
                let count = self.calendar.store().events_on(&self.cursor_key()).len();
                let backwards = shift || key.code == KeyCode::BackTab;
                self.selected_chip = match self.selected_chip {
                    _ if count == 0 => None,
                    None if backwards => Some(count - 1),
                    None => Some(0),
                    Some(current) if backwards => Some(ui_helpers::wrap_prev_index(current, count)),
                    Some(current) => Some(ui_helpers::wrap_next_index(current, count)),
                };
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Char('a') => {
                self.set_cursor(self.quick_add_date());
                self.open_editor(None, None);
            }
            KeyCode::Char(' ') if self.view_mode == ViewMode::Month => self.pick_up_or_drop(),
            KeyCode::Esc => {
                self.selected_chip = None;
                self.drag = None;
                self.status = None;
            }
            KeyCode::Char('[') => {
                self.mini_reference = dates::shift_months(self.mini_reference, -1);
            }
            KeyCode::Char(']') => {
                self.mini_reference = dates::shift_months(self.mini_reference, 1);
            }
            KeyCode::Char('g') => {
                let target = self.mini_month_target();
                self.set_cursor(target);
                self.set_view(ViewMode::Day);
            }
            _ => {}
        }

        self.render_needed = true;
        false
    }

    /// Chip selected: edit it. Otherwise create on the cursor day, at the
    /// selected hour in the time grids.
    fn activate(&mut self) {
        if let Some(index) = self.selected_chip {
            self.open_editor(Some(index), None);
            return;
        }
        let start_time = match self.view_mode {
            ViewMode::Month => None,
            ViewMode::Week | ViewMode::Day => Some(dates::hour_start_time(self.selected_hour)),
        };
        self.open_editor(None, start_time);
    }

    fn pick_up_or_drop(&mut self) {
        let to_key = self.cursor_key();

        if self.drag.is_none()
            && let Some(index) = self.selected_chip
            && let Some(stored) = self.calendar.store().get(&to_key, index)
        {
            self.status = Some(format!(
                "Moving '{}': pick a day and press Space",
                stored.event.title
            ));
            self.drag = Some(DragToken {
                from_key: to_key,
                index,
            });
            return;
        }

        match self.calendar.drop_dragged(self.drag.take(), &to_key) {
            Ok(Some(_)) => {
                let count = self.calendar.store().events_on(&to_key).len();
                self.selected_chip = count.checked_sub(1);
                self.status = Some(format!("Moved to {}", to_key));
            }
            Ok(None) => {}
            Err(err) => self.report_error(&err),
        }
    }
}
