use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{dates, views::ViewMode};

use super::{App, view_style};

const SIDEBAR_WIDTH: u16 = 24;

impl App {
    pub(super) fn draw_frame(&mut self, f: &mut Frame) {
        let size = f.size();

        let view_title = match self.view_mode {
            ViewMode::Month => dates::month_title(self.cursor),
            ViewMode::Week => dates::week_title(dates::week_start(self.cursor)),
            ViewMode::Day => dates::day_title(self.cursor),
        };
        let (clock_date, clock_time) = dates::clock_lines(self.now);

        let border_color = self
            .selected_chip
            .and_then(|index| self.calendar.store().get(&self.cursor_key(), index))
            .map(|stored| view_style::event_color(&stored.event.color))
            .unwrap_or(Color::White);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    view_title,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(
                    format!("{}  {}", clock_date, clock_time),
                    Style::default().fg(Color::White),
                ))
                .alignment(Alignment::Center),
            )
            .title(
                Line::from(Span::styled(
                    format!("{} · {}", self.view_mode.label(), self.offset_label),
                    Style::default().fg(Color::Gray),
                ))
                .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(size);
        f.render_widget(block, size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(inner);
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(columns[1]);

        self.render_sidebar(f, columns[0]);
        match self.view_mode {
            ViewMode::Month => self.render_month(f, main[0]),
            ViewMode::Week => self.render_week(f, main[0]),
            ViewMode::Day => self.render_day(f, main[0]),
        }
        self.render_status(f, main[1]);

        if self.in_editor() {
            self.render_editor_modal(f, size);
        }
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.status, &self.drag) {
            (Some(status), _) => Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            )),
            (None, Some(token)) => Line::from(Span::styled(
                format!("Moving event {} from {}", token.index, token.from_key),
                Style::default().fg(Color::Yellow),
            )),
            (None, None) => Line::from(Span::styled(
                "m/w/d view  n/p page  t today  a add  Enter open  Tab select  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}
