use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::views::{mini::build_mini_month, summary::summarize_view};

use super::{App, view_style};

const MINI_MONTH_HEIGHT: u16 = 10;
const SUMMARY_HEIGHT: u16 = 8;
const KEY_HELP: [(&str, &str); 7] = [
    ("space", "pick up / drop"),
    ("[ ]", "page mini month"),
    ("g", "open mini day"),
    ("esc", "clear selection"),
    ("^D", "delete (editor)"),
    ("←/→", "cycle (editor)"),
    ("a", "add event"),
];

impl App {
    pub(super) fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MINI_MONTH_HEIGHT),
                Constraint::Length(SUMMARY_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        self.render_mini_month(f, sections[0]);
        self.render_summary(f, sections[1]);

        let help: Vec<Line> = KEY_HELP
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{:>6} ", key), Style::default().fg(Color::Gray)),
                    Span::styled(*action, Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(help), sections[2]);
    }

    fn render_mini_month(&self, f: &mut Frame, area: Rect) {
        let mini = build_mini_month(self.mini_reference, self.today());

        let mut lines = vec![Line::from(
            mini.day_names
                .iter()
                .map(|name| Span::styled(format!("{:>2} ", name), Style::default().fg(Color::Gray)))
                .collect::<Vec<_>>(),
        )];

        for week in mini.cells.chunks(7) {
            let spans: Vec<Span> = week
                .iter()
                .map(|cell| {
                    let style = match cell.date {
                        None => Style::default().fg(Color::DarkGray),
                        Some(date) if date == self.cursor => {
                            view_style::cursor_style().add_modifier(Modifier::REVERSED)
                        }
                        Some(_) if cell.is_today => view_style::today_style(),
                        Some(_) => Style::default().fg(Color::White),
                    };
                    Span::styled(format!("{:>2} ", cell.day), style)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(mini.title).alignment(Alignment::Center))
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_summary(&self, f: &mut Frame, area: Rect) {
        let summary = summarize_view(self.calendar.store(), self.view_mode, self.cursor);

        let inner_width = area.width.saturating_sub(2) as usize;
        let segment_width = (inner_width / summary.entries.len().max(1)).max(1);
        let bar: Vec<Span> = summary
            .entries
            .iter()
            .map(|entry| {
                let base = view_style::category_color(entry.category);
                let color = view_style::fade(base, entry.opacity);
                Span::styled("█".repeat(segment_width), Style::default().fg(color))
            })
            .collect();

        let mut lines = vec![Line::from(bar)];
        lines.extend(summary.entries.iter().map(|entry| {
            let color = view_style::category_color(entry.category);
            let label_style = if entry.count > 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(format!("{:<10}", entry.category.label()), label_style),
                Span::styled(format!("{:>3}", entry.count), label_style),
            ])
        }));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(format!("This {}", self.view_mode.label())).alignment(Alignment::Left),
            )
            .title(Line::from(summary.total.to_string()).alignment(Alignment::Right))
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
