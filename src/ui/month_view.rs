use chrono::NaiveDate;

use crate::app::AppState;
use crate::calendar::{month_grid, ContentType, EventStatus, GridCell, DAYS_PER_WEEK};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    pub days: Vec<DayCell>,
}

/// One event title as shown inside a day cell.
#[derive(Debug, Clone, PartialEq)]
pub struct EventChip {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub status: EventStatus,
    pub is_dragged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: Option<NaiveDate>,
    pub is_selected: bool,
    pub is_today: bool,
    pub is_drop_target: bool,
    pub chips: Vec<EventChip>,
    pub more_label: Option<String>,
}

impl DayCell {
    pub fn blank() -> Self {
        Self {
            date: None,
            is_selected: false,
            is_today: false,
            is_drop_target: false,
            chips: Vec::new(),
            more_label: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }
}

/// Lays out the selected month: leading blanks from the grid, one cell per
/// day with a capped preview of its filtered events, trailing blanks to fill
/// the last week.
pub fn calculate_layout(state: &AppState, today: NaiveDate) -> MonthLayout {
    let grid = month_grid(state.selected_date);
    let dragged = state.drag.dragged_id();

    let mut cells: Vec<DayCell> = grid
        .cells()
        .into_iter()
        .map(|cell| match cell {
            GridCell::Blank => DayCell::blank(),
            GridCell::Day(date) => {
                let preview = state.store.preview_for_date(date, &state.filter, state.max_events_per_day);
                let is_selected = date == state.selected_date;
                DayCell {
                    date: Some(date),
                    is_selected,
                    is_today: date == today,
                    is_drop_target: is_selected && dragged.is_some(),
                    more_label: preview.more_label(),
                    chips: preview
                        .shown
                        .iter()
                        .map(|event| EventChip {
                            id: event.id.clone(),
                            title: event.title.clone(),
                            content_type: event.content_type,
                            status: event.status,
                            is_dragged: dragged == Some(event.id.as_str()),
                        })
                        .collect(),
                }
            }
        })
        .collect();

    let width = DAYS_PER_WEEK as usize;
    while cells.len() % width != 0 {
        cells.push(DayCell::blank());
    }

    let weeks = cells.chunks(width).map(|days| Week { days: days.to_vec() }).collect();

    MonthLayout { year: grid.year, month: grid.month, weeks }
}
