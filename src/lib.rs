pub mod api;
pub mod app;
pub mod calendar;
pub mod input;
pub mod metrics;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{AppState, Mode};
pub use calendar::{CalendarEvent, ContentType, EventStatus, Priority};

pub use input::{command_mode, normal_mode};
