use ratatui::style::Color;

pub const STORE_KEY: &str = "events";

pub const DEFAULT_COLOR: &str = "#43a047";
pub const DEFAULT_DURATION: &str = "1 hr";
pub const ALL_DAY: &str = "All day";

pub const DURATIONS: [(&str, u32); 8] = [
    ("15 min", 15),
    ("30 min", 30),
    ("45 min", 45),
    ("1 hr", 60),
    ("1.5 hr", 90),
    ("2 hr", 120),
    ("3 hr", 180),
    (ALL_DAY, 1440),
];

pub const DURATION_LABELS: [&str; 8] = duration_labels();

const fn duration_labels() -> [&'static str; 8] {
    let mut labels = [""; 8];
    let mut i = 0;
    while i < DURATIONS.len() {
        labels[i] = DURATIONS[i].0;
        i += 1;
    }
    labels
}

pub const FALLBACK_DURATION_MINUTES: u32 = 60;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const MINI_DAY_NAMES: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub const CATEGORIES: [CategoryInfo; 4] = [
    CategoryInfo {
        hex: "#e53935",
        label: "Emergency",
        color: Color::Rgb(0xe5, 0x39, 0x35),
    },
    CategoryInfo {
        hex: "#1a73e8",
        label: "Holiday",
        color: Color::Rgb(0x1a, 0x73, 0xe8),
    },
    CategoryInfo {
        hex: "#f9a825",
        label: "Reminder",
        color: Color::Rgb(0xf9, 0xa8, 0x25),
    },
    CategoryInfo {
        hex: DEFAULT_COLOR,
        label: "Event",
        color: Color::Rgb(0x43, 0xa0, 0x47),
    },
];

pub const GRID_SETTINGS: GridSettings = GridSettings {
    hours_per_day: 24,
    min_block_height: 18,
    initial_scroll_px: 8 * 60,
    px_per_row: 60,
};

pub const SUMMARY_SETTINGS: SummarySettings = SummarySettings {
    empty_segment_opacity: 0.08,
};

pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    tick_ms: 1000,
    poll_ms: 50,
    target_fps: 24,
};

pub const STORAGE_SETTINGS: StorageSettings = StorageSettings {
    max_backups: 10,
};

pub struct CategoryInfo {
    pub hex: &'static str,
    pub label: &'static str,
    pub color: Color,
}

pub struct GridSettings {
    pub hours_per_day: u32,
    pub min_block_height: u32,
    pub initial_scroll_px: u32,
    pub px_per_row: u32,
}

pub struct SummarySettings {
    pub empty_segment_opacity: f32,
}

pub struct TimeSettings {
    pub tick_ms: u64,
    pub poll_ms: u64,
    pub target_fps: u64,
}

pub struct StorageSettings {
    pub max_backups: usize,
}
