use ratatui::style::{Color, Modifier, Style};

use crate::{constants::CATEGORIES, domain::Category};

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

/// `#rrggbb` to a terminal color; anything else uses its category color.
pub(super) fn event_color(hex: &str) -> Color {
    let parsed = hex
        .strip_prefix('#')
        .filter(|digits| digits.len() == 6)
        .and_then(|digits| u32::from_str_radix(digits, 16).ok());

    match parsed {
        Some(value) => Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8),
        None => category_color(Category::from_color(hex)),
    }
}

pub(super) fn category_color(category: Category) -> Color {
    CATEGORIES[category.index()].color
}

/// Blends toward black; `opacity` 1.0 keeps the color.
pub(super) fn fade(color: Color, opacity: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |channel: u8| (channel as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        _ if opacity < 1.0 => Color::DarkGray,
        other => other,
    }
}

pub(super) fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn today_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
