mod app;
mod cli;
mod config;
mod constants;
mod dates;
mod domain;
mod editor;
mod error;
mod logging;
mod reminders;
mod storage;
mod views;

fn main() {
    cli::run_cli();
}
