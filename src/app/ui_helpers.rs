use crate::constants::GRID_SETTINGS;

pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current + 1 >= len {
        0
    } else {
        current + 1
    }
}

/// Hour row a pixel offset falls into.
pub fn px_to_row(px: u32) -> u32 {
    px / GRID_SETTINGS.px_per_row
}

/// Rows `[first, last]` a block covers; a block ending exactly on a row
/// boundary does not spill into the next row.
pub fn block_rows(top: u32, bottom: u32) -> (u32, u32) {
    let first = px_to_row(top);
    let last = px_to_row(bottom.saturating_sub(1)).max(first);
    (first, last)
}

/// First visible hour keeping `selected` on screen.
pub fn scroll_to_keep_visible(scroll: u32, selected: u32, visible_rows: u32) -> u32 {
    let visible_rows = visible_rows.max(1);
    let max_scroll = GRID_SETTINGS.hours_per_day.saturating_sub(visible_rows);
    let scroll = if selected < scroll {
        selected
    } else if selected >= scroll + visible_rows {
        selected + 1 - visible_rows
    } else {
        scroll
    };
    scroll.min(max_scroll)
}

pub fn truncate_label(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
