mod calendar_views;
mod dialogs;
mod presentation;
mod runner;
mod sample_events;

pub use runner::run_tui;
