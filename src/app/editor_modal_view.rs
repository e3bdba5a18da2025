use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::editor::EditorField;

use super::{App, view_style};

const EDITOR_MIN_HEIGHT: u16 = 15;
const LABEL_WIDTH: usize = 10;

impl App {
    pub(super) fn render_editor_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect_ratio(terminal_size, 1, 2, EDITOR_MIN_HEIGHT);
        let form = &self.editor.form;
        let accent = view_style::event_color(&form.color);

        let mut lines: Vec<Line> = EditorField::ALL
            .iter()
            .map(|field| {
                let focused = *field == self.editor.focus;
                let muted = matches!(field, EditorField::ReminderDate | EditorField::ReminderTime)
                    && !form.reminder;

                let mut value = form.display_value(*field);
                let cycles = matches!(
                    field,
                    EditorField::Duration | EditorField::Color | EditorField::Reminder
                );
                if focused && cycles {
                    value = format!("◀ {} ▶", value);
                } else if focused {
                    value.push('▏');
                }

                let label_style = if focused {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let value_style = if muted {
                    Style::default().fg(Color::DarkGray)
                } else if focused {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let mut spans = vec![
                    Span::styled(
                        format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                        label_style,
                    ),
                    Span::raw(" "),
                ];
                if *field == EditorField::Color {
                    spans.push(Span::raw("● ").fg(accent));
                }
                spans.push(Span::styled(value, value_style));
                Line::from(spans)
            })
            .collect();

        lines.push(Line::from(""));
        if let Some(error) = &self.editor.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        let mut footer = String::from("Enter save  Esc cancel  Tab next");
        if self.editor.is_edit_mode() {
            footer.push_str("  Ctrl-D delete");
        }

        let title = if self.editor.is_edit_mode() {
            "Edit event"
        } else {
            "New event"
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title_bottom(
                Line::from(Span::styled(footer, Style::default().fg(Color::Gray)))
                    .alignment(Alignment::Center),
            )
            .border_style(Style::default().fg(accent));

        f.render_widget(Clear, modal_rect);
        f.render_widget(Paragraph::new(lines).block(block), modal_rect);
    }
}
