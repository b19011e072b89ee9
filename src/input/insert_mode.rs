use crossterm::event::KeyCode;

use crate::app::AppState;
use crate::calendar::EditorAction;

/// Keys while the editor dialog is open. Enter saves, F2 saves as scheduled,
/// F9 deletes (edit mode only) and Esc cancels.
pub fn handle_key(key: KeyCode, state: &mut AppState) {
    let action = match key {
        KeyCode::Enter => Some(EditorAction::Save),
        KeyCode::F(2) => Some(EditorAction::Schedule),
        KeyCode::F(9) => Some(EditorAction::Delete),
        KeyCode::Esc => Some(EditorAction::Cancel),
        _ => None,
    };
    if let Some(action) = action {
        state.apply_editor_action(action);
        return;
    }

    let Some(editor) = state.editor.as_mut() else {
        return;
    };

    match key {
        KeyCode::Tab | KeyCode::Down => editor.next_field(),
        KeyCode::BackTab | KeyCode::Up => editor.prev_field(),
        KeyCode::Left if editor.is_choice_field() => editor.cycle_value(false),
        KeyCode::Right if editor.is_choice_field() => editor.cycle_value(true),
        KeyCode::Backspace => editor.pop_char(),
        KeyCode::Char(c) => editor.push_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Mode;
    use crate::calendar::{ContentType, EditorField, EventStatus};
    use chrono::NaiveDate;

    fn setup_state_with_editor() -> AppState {
        let mut state = AppState::new();
        state.select_date(NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        state.open_create_editor("Test Story".to_string());
        state
    }

    #[test]
    fn tab_moves_to_next_field() {
        let mut state = setup_state_with_editor();
        assert_eq!(state.editor.as_ref().unwrap().active_field, EditorField::Title);

        handle_key(KeyCode::Tab, &mut state);

        assert_eq!(state.editor.as_ref().unwrap().active_field, EditorField::ContentType);
    }

    #[test]
    fn backtab_wraps_to_last_field() {
        let mut state = setup_state_with_editor();

        handle_key(KeyCode::BackTab, &mut state);

        assert_eq!(state.editor.as_ref().unwrap().active_field, EditorField::Description);
    }

    #[test]
    fn char_appends_to_title_field() {
        let mut state = setup_state_with_editor();
        state.editor.as_mut().unwrap().title.clear();

        handle_key(KeyCode::Char('H'), &mut state);
        handle_key(KeyCode::Char('i'), &mut state);

        assert_eq!(state.editor.as_ref().unwrap().title, "Hi");
    }

    #[test]
    fn backspace_removes_from_title() {
        let mut state = setup_state_with_editor();

        handle_key(KeyCode::Backspace, &mut state);

        assert_eq!(state.editor.as_ref().unwrap().title, "Test Stor");
    }

    #[test]
    fn arrows_cycle_choice_fields() {
        let mut state = setup_state_with_editor();
        state.editor.as_mut().unwrap().active_field = EditorField::ContentType;

        handle_key(KeyCode::Right, &mut state);

        assert_eq!(state.editor.as_ref().unwrap().content_type, ContentType::Breaking);
    }

    #[test]
    fn digits_replace_time_buffer() {
        let mut state = setup_state_with_editor();
        state.editor.as_mut().unwrap().active_field = EditorField::Time;

        for c in ['1', '4', '3', '0'] {
            handle_key(KeyCode::Char(c), &mut state);
        }

        let editor = state.editor.as_ref().unwrap();
        assert_eq!(editor.time_input, "1430");
        assert_eq!(editor.parse_time_input(), chrono::NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn esc_closes_without_changes() {
        let mut state = setup_state_with_editor();

        handle_key(KeyCode::Esc, &mut state);

        assert_eq!(state.mode, Mode::Normal);
        assert!(state.editor.is_none());
        assert!(state.store.is_empty());
    }

    #[test]
    fn f2_schedules_the_new_event() {
        let mut state = setup_state_with_editor();

        handle_key(KeyCode::F(2), &mut state);

        let event = state.store.iter().next().unwrap();
        assert_eq!(event.status, EventStatus::Scheduled);
        assert_eq!(event.scheduled_date(), NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
    }
}
