use chrono::{Days, NaiveDate};
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::calendar::{month_grid, shift_month};

pub fn handle_key(key: KeyCode, state: &mut AppState) {
    match key {
        KeyCode::Char('h') | KeyCode::Left => move_days(state, -1),
        KeyCode::Char('l') | KeyCode::Right => move_days(state, 1),
        KeyCode::Char('j') | KeyCode::Down => {
            if has_events_on_selected_date(state) {
                state.move_event_selection_down();
            } else {
                move_days(state, 7);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if has_events_on_selected_date(state) {
                state.move_event_selection_up();
            } else {
                move_days(state, -7);
            }
        }
        KeyCode::Char('J') => move_days(state, 7),
        KeyCode::Char('K') => move_days(state, -7),
        KeyCode::Char('t') => state.select_date(chrono::Local::now().date_naive()),
        KeyCode::Char('g') => move_to_first_of_month(state),
        KeyCode::Char('G') => move_to_end_of_month(state),
        KeyCode::Char('{') => move_months(state, -1),
        KeyCode::Char('}') => move_months(state, 1),
        KeyCode::Char('a') => state.open_create_editor(String::new()),
        KeyCode::Char('E') | KeyCode::Enter => state.open_edit_editor(),
        KeyCode::Char('x') => state.request_delete(),
        KeyCode::Char('p') => state.start_drag(),
        KeyCode::Char(':') => enter_command_mode(state),
        KeyCode::Char('?') => show_help(state),
        KeyCode::Esc => state.message = None,
        _ => {}
    }
}

fn has_events_on_selected_date(state: &AppState) -> bool {
    !state.events_for_selected_date().is_empty()
}

/// Moves the selected day, also used while dragging.
pub fn move_days(state: &mut AppState, days: i64) {
    let moved = if days >= 0 {
        state.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        state.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    if let Some(date) = moved {
        state.select_date(date);
    }
}

pub fn move_months(state: &mut AppState, months: i32) {
    let date = shift_month(state.selected_date, months);
    state.select_date(date);
}

fn move_to_first_of_month(state: &mut AppState) {
    if let Some(first) = month_grid(state.selected_date).first_day() {
        state.select_date(first);
    }
}

fn move_to_end_of_month(state: &mut AppState) {
    let grid = month_grid(state.selected_date);
    if let Some(last) = NaiveDate::from_ymd_opt(grid.year, grid.month, grid.days_in_month) {
        state.select_date(last);
    }
}

fn enter_command_mode(state: &mut AppState) {
    state.mode = Mode::Command;
    state.command_buffer = ":".to_string();
}

fn show_help(state: &mut AppState) {
    state.show_help = true;
    state.help_scroll = 0;
}
