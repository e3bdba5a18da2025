use std::{io, path::PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum, builder::PossibleValuesParser};
use itertools::Itertools;

use crate::{
    config::Settings,
    constants::DURATION_LABELS,
    dates,
    domain::{Calendar, Category, Event},
    editor::EventEditor,
    error::{CalendarError, Result},
    reminders::{LogNotifier, ReminderScheduler},
    storage,
    views::{
        ViewMode,
        day::build_day_grid,
        month::build_month_grid,
        summary::summarize_view,
        week::build_week_grid,
    },
};

#[derive(Parser, Debug)]
#[command(name = "datebook")]
#[command(about = "Calendar with month, week and day views", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "DATEBOOK_DATA_DIR",
        help = "Directory holding events.json"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "DATEBOOK_LOG",
        help = "Log level (trace, debug, info, warn, error, off)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Open the interactive calendar (default)")]
    Ui,

    #[command(about = "Add an event")]
    Add {
        #[arg(long, help = "Event title")]
        title: String,

        #[arg(long, help = "Date as YYYY-MM-DD")]
        date: String,

        #[arg(long, help = "Start time as HH:MM")]
        time: Option<String>,

        #[arg(
            long,
            default_value = "1 hr",
            value_parser = PossibleValuesParser::new(DURATION_LABELS),
            help = "Duration label"
        )]
        duration: String,

        #[arg(long, short, help = "Category name or #rrggbb color")]
        category: Option<String>,

        #[arg(long, default_value = "", help = "Free-form notes")]
        notes: String,

        #[arg(long, help = "Reminder as YYYY-MM-DDTHH:MM")]
        remind_at: Option<String>,
    },

    #[command(about = "Print a month, week or day view")]
    List {
        #[arg(long, value_enum, default_value_t = ViewArg::Month)]
        view: ViewArg,

        #[arg(long, help = "Reference date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "Delete the event at INDEX on DATE")]
    Delete { date: String, index: usize },

    #[command(about = "Move the event at INDEX on FROM to the end of TO")]
    Move {
        from: String,
        index: usize,
        to: String,
    },

    #[command(about = "Count events per category for a view")]
    Summary {
        #[arg(long, value_enum, default_value_t = ViewArg::Month)]
        view: ViewArg,

        #[arg(long, help = "Reference date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "Export events")]
    Export {
        #[arg(long, value_enum, help = "Export format")]
        format: ExportFormat,

        #[arg(long, short, help = "Output path")]
        out: Option<PathBuf>,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Month,
    Week,
    Day,
}

impl From<ViewArg> for ViewMode {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Month => ViewMode::Month,
            ViewArg::Week => ViewMode::Week,
            ViewArg::Day => ViewMode::Day,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExportFormat {
    Json,
    Ics,
}

pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub duration: String,
    pub category: Option<String>,
    pub notes: String,
    pub remind_at: Option<String>,
}

fn resolve_color(category: Option<&str>) -> Result<Option<String>> {
    let Some(value) = category.map(str::trim) else {
        return Ok(None);
    };
    if let Some(category) = Category::by_name(value) {
        return Ok(Some(category.hex().to_string()));
    }
    let is_hex = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        return Ok(Some(value.to_ascii_lowercase()));
    }
    Err(CalendarError::UnknownCategory(value.to_string()))
}

fn reference_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(value) => dates::parse_date_key(value)
            .ok_or_else(|| CalendarError::InvalidDate(value.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn add_event(
    calendar: &mut Calendar,
    new_event: NewEvent,
    now: NaiveDateTime,
) -> Result<Event> {
    let color = resolve_color(new_event.category.as_deref())?;

    let mut editor = EventEditor::new();
    editor.open(calendar.store(), &new_event.date, None, new_event.time.as_deref());
    editor.form.title = new_event.title;
    editor.form.duration = new_event.duration;
    editor.form.notes = new_event.notes;
    if let Some(color) = color {
        editor.form.color = color;
    }
    if let Some(remind_at) = new_event.remind_at {
        let (date, time) = remind_at
            .split_once('T')
            .ok_or_else(|| CalendarError::InvalidDate(remind_at.clone()))?;
        editor.form.reminder = true;
        editor.form.reminder_date = date.to_string();
        editor.form.reminder_time = time.to_string();
    }

    let mut reminders = ReminderScheduler::new(LogNotifier);
    let saved = editor.save(calendar, &mut reminders, now)?;
    Ok(saved.event)
}

pub fn render_listing(
    calendar: &Calendar,
    mode: ViewMode,
    reference: NaiveDate,
    now: NaiveDateTime,
) -> String {
    let store = calendar.store();
    let offset = dates::display_offset_label(Local::now().offset().local_minus_utc());
    let mut out = String::new();

    match mode {
        ViewMode::Month => {
            let grid = build_month_grid(store, reference, now.date());
            out.push_str(&format!("{}\n", grid.title));
            for cell in grid.days.iter().filter(|cell| !cell.chips.is_empty()) {
                let marker = if cell.is_today { " (today)" } else { "" };
                out.push_str(&format!("{}{}\n", cell.date_key, marker));
                for chip in &cell.chips {
                    let bell = if chip.reminder { " 🔔" } else { "" };
                    out.push_str(&format!("  [{}] {}{}\n", chip.index, chip.label(), bell));
                }
            }
        }
        ViewMode::Week => {
            let grid = build_week_grid(store, reference, now, &offset);
            out.push_str(&format!("{}  {}\n", grid.title, grid.offset_label));
            for column in &grid.days {
                out.push_str(&format!("{} {}\n", column.abbrev, column.day_number));
                for chip in &column.all_day {
                    out.push_str(&format!("  [{}] all day  {}\n", chip.index, chip.title));
                }
                for block in &column.blocks {
                    out.push_str(&format!(
                        "  [{}] {} {}m  {}\n",
                        block.index, block.start_time, block.height, block.title
                    ));
                }
            }
        }
        ViewMode::Day => {
            let grid = build_day_grid(store, reference, now.date(), &offset);
            out.push_str(&format!("{}  {}\n", grid.title, grid.offset_label));
            for block in &grid.blocks {
                out.push_str(&format!(
                    "  [{}] {} {}m  {}\n",
                    block.index, block.start_time, block.height, block.title
                ));
            }
            let untimed = store
                .events_on(&grid.date_key)
                .iter()
                .enumerate()
                .filter(|(_, stored)| stored.event.start_minutes().is_none())
                .map(|(index, stored)| format!("  [{}] {}", index, stored.event.title))
                .join("\n");
            if !untimed.is_empty() {
                out.push_str(&untimed);
                out.push('\n');
            }
        }
    }

    out
}

pub fn render_summary(calendar: &Calendar, mode: ViewMode, reference: NaiveDate) -> String {
    let summary = summarize_view(calendar.store(), mode, reference);
    let lines = summary
        .entries
        .iter()
        .map(|entry| format!("{:12} {}", entry.category.label(), entry.count))
        .join("\n");
    format!("{}\n{:12} {}\n", lines, "TOTAL", summary.total)
}

pub fn render_ics(calendar: &Calendar) -> String {
    let mut ics = String::new();
    ics.push_str("BEGIN:VCALENDAR\r\n");
    ics.push_str("VERSION:2.0\r\n");
    ics.push_str("PRODID:-//datebook//calendar//EN\r\n");

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    for (date_key, stored) in calendar.store().iter() {
        let Some(date) = dates::parse_date_key(date_key) else {
            continue;
        };
        let event = &stored.event;

        ics.push_str("BEGIN:VEVENT\r\n");
        ics.push_str(&format!("UID:datebook-{}-{}\r\n", date_key, stored.id.0));
        ics.push_str(&format!("DTSTAMP:{}\r\n", stamp));

        match event.start_minutes().filter(|_| !event.is_all_day()) {
            Some(minutes) => {
                let start = date.and_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default();
                let end = start + TimeDelta::minutes(event.duration_minutes() as i64);
                ics.push_str(&format!("DTSTART:{}\r\n", start.format("%Y%m%dT%H%M%S")));
                ics.push_str(&format!("DTEND:{}\r\n", end.format("%Y%m%dT%H%M%S")));
            }
            None => {
                let next = dates::shift_days(date, 1);
                ics.push_str(&format!("DTSTART;VALUE=DATE:{}\r\n", date.format("%Y%m%d")));
                ics.push_str(&format!("DTEND;VALUE=DATE:{}\r\n", next.format("%Y%m%d")));
            }
        }

        ics.push_str(&format!("SUMMARY:{}\r\n", ics_text(&event.title)));
        if !event.notes.is_empty() {
            ics.push_str(&format!("DESCRIPTION:{}\r\n", ics_text(&event.notes)));
        }
        ics.push_str(&format!("CATEGORIES:{}\r\n", event.category().label()));
        if let Some(at) = event.reminder_at() {
            let before = (start_of(event, date) - at).num_minutes();
            ics.push_str("BEGIN:VALARM\r\n");
            ics.push_str("ACTION:DISPLAY\r\n");
            ics.push_str(&format!("DESCRIPTION:{}\r\n", ics_text(&event.title)));
            ics.push_str(&format!("TRIGGER:-PT{}M\r\n", before.max(0)));
            ics.push_str("END:VALARM\r\n");
        }
        ics.push_str("END:VEVENT\r\n");
    }

    ics.push_str("END:VCALENDAR\r\n");
    ics
}

/// Escapes a value for an iCalendar TEXT property.
fn ics_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

fn start_of(event: &Event, date: NaiveDate) -> NaiveDateTime {
    let minutes = event.start_minutes().unwrap_or(0);
    date.and_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default()
}

pub fn export_data(
    calendar: &Calendar,
    format: ExportFormat,
    out_path: Option<PathBuf>,
) -> Result<()> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&calendar.store().to_map())?,
        ExportFormat::Ics => render_ics(calendar),
    };

    if let Some(path) = out_path {
        storage::write_text_file(&path, &content)?;
        println!("Exported to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<()> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CalendarError::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), "datebook", &mut io::stdout());
    Ok(())
}

fn run_command(settings: &Settings, command: Command) -> Result<()> {
    if let Command::Ui = command {
        return Ok(crate::app::run_ui(settings)?);
    }

    let now = Local::now().naive_local();
    let mut calendar = Calendar::open(&settings.blob_path());

    match command {
        Command::Ui => {}
        Command::Add {
            title,
            date,
            time,
            duration,
            category,
            notes,
            remind_at,
        } => {
            let event = add_event(
                &mut calendar,
                NewEvent {
                    title,
                    date,
                    time,
                    duration,
                    category,
                    notes,
                    remind_at,
                },
                now,
            )?;
            println!("Added '{}' on {}", event.title, event.date);
        }
        Command::List { view, date } => {
            let reference = reference_date(date.as_deref())?;
            print!("{}", render_listing(&calendar, view.into(), reference, now));
        }
        Command::Delete { date, index } => {
            let removed = calendar.remove(&date, index)?;
            println!("Deleted '{}' from {}", removed.event.title, date);
        }
        Command::Move { from, index, to } => {
            if dates::parse_date_key(&to).is_none() {
                return Err(CalendarError::InvalidDate(to));
            }
            calendar.move_event(&from, index, &to)?;
            println!("Moved event {} from {} to {}", index, from, to);
        }
        Command::Summary { view, date } => {
            let reference = reference_date(date.as_deref())?;
            print!("{}", render_summary(&calendar, view.into(), reference));
        }
        Command::Export { format, out } => {
            export_data(&calendar, format, out)?;
        }
        Command::Completions { shell } => print_completions(&shell)?,
    }
    Ok(())
}

pub fn run_cli() {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.data_dir, cli.log_level);

    if let Err(e) = crate::logging::init_logging(&settings.log_level, &settings.log_dir) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run_command(&settings, cli.command.unwrap_or(Command::Ui)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
