use std::rc::Rc;

use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    constants::GRID_SETTINGS,
    dates,
    views::{
        EventBlock, EventChip, HourSlot,
        day::build_day_grid,
        month::{MonthDayCell, build_month_grid},
        week::build_week_grid,
    },
};

use super::{App, ui_helpers, view_style};

const GUTTER_WIDTH: u16 = 6;
const MAX_LANE_ROWS: usize = 3;

/// One day column of the week or day time grid.
struct TimeColumn {
    header: String,
    date_key: String,
    is_today: bool,
    is_cursor: bool,
    /// `None` hides the all-day lane.
    lane: Option<Vec<EventChip>>,
    blocks: Vec<EventBlock>,
}

fn split_even(area: Rect, direction: Direction, count: usize) -> Rc<[Rect]> {
    let count = count.max(1) as u32;
    Layout::default()
        .direction(direction)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area)
}

fn padded(text: &str, width: usize) -> String {
    let text = ui_helpers::truncate_label(text, width);
    format!("{:<width$}", text, width = width)
}

impl App {
    pub(super) fn render_month(&self, f: &mut Frame, area: Rect) {
        let grid = build_month_grid(self.calendar.store(), self.cursor, self.today());
        let rows = grid.week_rows();

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let header_cols = split_even(sections[0], Direction::Horizontal, 7);
        for (name, col) in grid.weekday_headers.iter().zip(header_cols.iter()) {
            f.render_widget(
                Paragraph::new(Span::styled(*name, Style::default().fg(Color::Gray)))
                    .alignment(Alignment::Center),
                *col,
            );
        }

        let row_areas = split_even(sections[1], Direction::Vertical, rows);
        let cell_areas: Vec<Rect> = row_areas
            .iter()
            .flat_map(|row_area| split_even(*row_area, Direction::Horizontal, 7).to_vec())
            .collect();

        for cell in &grid.days {
            if let Some(area) = grid
                .cell_position(cell.date)
                .and_then(|position| cell_areas.get(position))
            {
                self.render_month_cell(f, *area, cell);
            }
        }
    }

    fn render_month_cell(&self, f: &mut Frame, area: Rect, cell: &MonthDayCell) {
        let is_cursor = cell.date == self.cursor;
        let title_style = if is_cursor {
            view_style::cursor_style()
        } else if cell.is_today {
            view_style::today_style()
        } else {
            Style::default().fg(Color::Gray)
        };
        let border_color = if is_cursor {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(cell.day.to_string(), title_style))
            .border_style(Style::default().fg(border_color));

        let inner_width = area.width.saturating_sub(4) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let overflow = cell.chips.len() > inner_height;
        let shown = if overflow {
            inner_height.saturating_sub(1)
        } else {
            cell.chips.len()
        };

        let mut lines: Vec<Line> = cell
            .chips
            .iter()
            .take(shown)
            .map(|chip| self.chip_line(chip, is_cursor, inner_width))
            .collect();
        if overflow && inner_height > 0 {
            lines.push(Line::from(Span::styled(
                format!("+{} more", cell.chips.len() - shown),
                Style::default().fg(Color::DarkGray),
            )));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn chip_line(&self, chip: &EventChip, is_cursor: bool, width: usize) -> Line<'static> {
        let color = view_style::event_color(&chip.color);
        let selected = is_cursor && self.selected_chip == Some(chip.index);
        let dragged = self
            .drag
            .as_ref()
            .is_some_and(|token| token.from_key == chip.date_key && token.index == chip.index);

        let bell = if chip.reminder { " 🔔" } else { "" };
        let label = ui_helpers::truncate_label(&format!("{}{}", chip.label(), bell), width);

        let mut style = if selected {
            Style::default()
                .fg(view_style::text_color_for_bg(color))
                .bg(color)
        } else {
            Style::default().fg(Color::White)
        };
        if dragged {
            style = style.add_modifier(Modifier::DIM | Modifier::ITALIC);
        }

        Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(label, style),
        ])
    }

    pub(super) fn render_week(&mut self, f: &mut Frame, area: Rect) {
        let store = self.calendar.store();
        let grid = build_week_grid(store, self.cursor, self.now, &self.offset_label);
        let now_line = grid.now_line.as_ref().map(|line| (line.day_index, line.top));
        let slots = grid
            .days
            .first()
            .map(|day| day.slots.clone())
            .unwrap_or_default();

        let columns = grid
            .days
            .into_iter()
            .map(|day| TimeColumn {
                header: format!("{} {}", day.abbrev, day.day_number),
                is_cursor: day.date == self.cursor,
                is_today: day.is_today,
                date_key: day.date_key,
                lane: Some(day.all_day),
                blocks: day.blocks,
            })
            .collect();

        self.render_time_grid(f, area, &slots, columns, now_line);
    }

    pub(super) fn render_day(&mut self, f: &mut Frame, area: Rect) {
        let store = self.calendar.store();
        let grid = build_day_grid(store, self.cursor, self.today(), &self.offset_label);

        let slots = grid.slots;
        let column = TimeColumn {
            header: format!("{} {}", grid.abbrev, grid.day_number),
            is_cursor: true,
            is_today: grid.is_today,
            date_key: grid.date_key,
            lane: None,
            blocks: grid.blocks,
        };

        self.render_time_grid(f, area, &slots, vec![column], None);
    }

    fn render_time_grid(
        &mut self,
        f: &mut Frame,
        area: Rect,
        slots: &[HourSlot],
        columns: Vec<TimeColumn>,
        now_line: Option<(usize, u32)>,
    ) {
        let lane_rows = columns
            .iter()
            .filter_map(|column| column.lane.as_ref())
            .map(|lane| lane.len().clamp(1, MAX_LANE_ROWS))
            .max()
            .unwrap_or(0) as u16;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(lane_rows),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let visible_rows = rows[3].height as u32;
        self.scroll_hour =
            ui_helpers::scroll_to_keep_visible(self.scroll_hour, self.selected_hour, visible_rows);
        let hours: Vec<u32> = (self.scroll_hour..)
            .take(visible_rows as usize)
            .filter(|hour| *hour < GRID_SETTINGS.hours_per_day)
            .collect();

        let split_row = |row: Rect| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(GUTTER_WIDTH), Constraint::Min(0)])
                .split(row)
        };

        let gutter_lines: Vec<Line> = hours
            .iter()
            .map(|hour| {
                let label = slots
                    .get(*hour as usize)
                    .map(|slot| slot.label.as_str())
                    .unwrap_or_default();
                Line::from(Span::styled(
                    format!("{:>5} ", label),
                    Style::default().fg(Color::DarkGray),
                ))
            })
            .collect();
        let hour_row = split_row(rows[3]);
        f.render_widget(Paragraph::new(gutter_lines), hour_row[0]);
        if lane_rows > 0 {
            f.render_widget(
                Paragraph::new(Span::styled(" all", Style::default().fg(Color::DarkGray))),
                split_row(rows[1])[0],
            );
        }
        f.render_widget(
            Paragraph::new(Span::styled(
                "─".repeat(area.width as usize),
                Style::default().fg(Color::DarkGray),
            )),
            rows[2],
        );

        let header_cols = split_even(split_row(rows[0])[1], Direction::Horizontal, columns.len());
        let lane_cols = split_even(split_row(rows[1])[1], Direction::Horizontal, columns.len());
        let hour_cols = split_even(hour_row[1], Direction::Horizontal, columns.len());

        for (idx, column) in columns.iter().enumerate() {
            let header_style = if column.is_cursor {
                view_style::cursor_style()
            } else if column.is_today {
                view_style::today_style()
            } else {
                Style::default().fg(Color::Gray)
            };
            f.render_widget(
                Paragraph::new(Span::styled(column.header.clone(), header_style))
                    .alignment(Alignment::Center),
                header_cols[idx],
            );

            let lane_width = lane_cols[idx].width.saturating_sub(3) as usize;
            let lane_lines: Vec<Line> = column
                .lane
                .iter()
                .flatten()
                .take(lane_rows as usize)
                .map(|chip| self.chip_line(chip, column.is_cursor, lane_width))
                .collect();
            f.render_widget(Paragraph::new(lane_lines), lane_cols[idx]);

            let now_top = now_line
                .filter(|(day_index, _)| *day_index == idx)
                .map(|(_, top)| top);
            let lines = self.hour_lines(column, &hours, now_top, hour_cols[idx].width as usize);
            f.render_widget(Paragraph::new(lines), hour_cols[idx]);
        }
    }

    fn hour_lines(
        &self,
        column: &TimeColumn,
        hours: &[u32],
        now_top: Option<u32>,
        width: usize,
    ) -> Vec<Line<'static>> {
        let now_row = now_top.map(ui_helpers::px_to_row);

        hours
            .iter()
            .map(|hour| {
                let covering: Vec<&EventBlock> = column
                    .blocks
                    .iter()
                    .filter(|block| {
                        let (first, last) = ui_helpers::block_rows(block.top, block.bottom());
                        first <= *hour && *hour <= last
                    })
                    .collect();
                let is_now = now_row == Some(*hour);
                let marker = if is_now {
                    Span::styled("▶", Style::default().fg(Color::Red))
                } else {
                    Span::raw(" ")
                };
                let body_width = width.saturating_sub(1);

                let Some(first) = covering.first() else {
                    let selected = column.is_cursor
                        && self.selected_chip.is_none()
                        && *hour == self.selected_hour;
                    let (fill, style) = if is_now {
                        ("─", Style::default().fg(Color::Red))
                    } else if selected {
                        (" ", Style::default().bg(Color::DarkGray))
                    } else {
                        ("·", Style::default().fg(Color::Black))
                    };
                    return Line::from(vec![
                        marker,
                        Span::styled(fill.repeat(body_width), style),
                    ]);
                };

                let color = view_style::event_color(&first.color);
                let starts_here = ui_helpers::px_to_row(first.top) == *hour;
                let mut text = if starts_here {
                    format!("{} {}", dates::format_short_time(&first.start_time), first.title)
                } else {
                    String::from("│")
                };
                if covering.len() > 1 {
                    text = format!("{} +{}", text, covering.len() - 1);
                }

                let mut style = Style::default()
                    .fg(view_style::text_color_for_bg(color))
                    .bg(color);
                let selected = column.is_cursor
                    && covering.iter().any(|block| {
                        self.selected_chip == Some(block.index) && block.date_key == column.date_key
                    });
                if selected {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }

                Line::from(vec![marker, Span::styled(padded(&text, body_width), style)])
            })
            .collect()
    }
}
