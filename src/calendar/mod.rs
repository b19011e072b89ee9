pub mod drag;
pub mod editor;
pub mod event;
pub mod grid;
pub mod loader;
pub mod store;

pub use drag::{DragController, DragState, DropOutcome};
pub use editor::{EditorAction, EditorError, EditorField, EditorMode, EditorOutcome, EventEditor};
pub use event::{CalendarEvent, ContentType, EventStatus, Priority};
pub use grid::{month_grid, shift_month, GridCell, MonthGrid, DAYS_PER_WEEK, WEEKDAY_LABELS};
pub use loader::{load_calendar, LoadStatus};
pub use store::{DayPreview, EventFilter, EventStore, StatusCounts};
