use crossterm::event::KeyCode;

use crate::app::AppState;
use crate::calendar::DropOutcome;
use crate::input::normal_mode::{move_days, move_months};

/// Keys while an event is picked up. Movement picks the drop target.
pub fn handle_key(key: KeyCode, state: &mut AppState) -> Option<DropOutcome> {
    match key {
        KeyCode::Char('h') | KeyCode::Left => move_days(state, -1),
        KeyCode::Char('l') | KeyCode::Right => move_days(state, 1),
        KeyCode::Char('j') | KeyCode::Down => move_days(state, 7),
        KeyCode::Char('k') | KeyCode::Up => move_days(state, -7),
        KeyCode::Char('{') => move_months(state, -1),
        KeyCode::Char('}') => move_months(state, 1),
        KeyCode::Enter | KeyCode::Char('p') => return state.drop_dragged(),
        KeyCode::Esc => state.cancel_drag(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Mode;
    use crate::calendar::{CalendarEvent, ContentType, EventStatus, Priority};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn dragging_state() -> AppState {
        let mut state = AppState::new();
        state.replace_events(vec![CalendarEvent {
            id: "launch".to_string(),
            title: "Product launch".to_string(),
            content_type: ContentType::Feature,
            status: EventStatus::Scheduled,
            author: "Desk".to_string(),
            category: "Technology".to_string(),
            scheduled_for: date(8).and_hms_opt(16, 20, 0).unwrap(),
            priority: Priority::High,
            description: None,
        }]);
        state.select_date(date(8));
        state.start_drag();
        state
    }

    #[test]
    fn j_moves_target_a_week_while_dragging() {
        let mut state = dragging_state();

        assert_eq!(handle_key(KeyCode::Char('j'), &mut state), None);

        assert_eq!(state.selected_date, date(15));
        assert_eq!(state.mode, Mode::Drag);
    }

    #[test]
    fn enter_drops_on_the_selected_day() {
        let mut state = dragging_state();
        handle_key(KeyCode::Char('l'), &mut state);
        handle_key(KeyCode::Char('l'), &mut state);

        let outcome = handle_key(KeyCode::Enter, &mut state).unwrap();

        assert_eq!(outcome.to, date(10).and_hms_opt(16, 20, 0).unwrap());
        assert_eq!(state.store.get("launch").unwrap().scheduled_for, outcome.to);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn esc_cancels_and_keeps_the_original_day() {
        let mut state = dragging_state();
        handle_key(KeyCode::Char('l'), &mut state);

        handle_key(KeyCode::Esc, &mut state);

        assert!(!state.drag.is_dragging());
        assert_eq!(state.store.get("launch").unwrap().scheduled_date(), date(8));
    }
}
