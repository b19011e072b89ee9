use chrono::{Local, NaiveDate};

use crate::calendar::{
    CalendarEvent, DragController, DropOutcome, EditorAction, EditorOutcome, EventEditor, EventFilter, EventStore,
    LoadStatus,
};
use crate::storage::config::Config;
use crate::storage::journal::Change;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    Drag,
    ConfirmDelete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct AppState {
    pub mode: Mode,
    pub selected_date: NaiveDate,
    pub store: EventStore,
    pub filter: EventFilter,
    pub drag: DragController,
    pub editor: Option<EventEditor>,
    pub delete_confirmation_event_id: Option<String>,
    pub load_status: LoadStatus,
    pub command_buffer: String,
    pub show_help: bool,
    pub help_scroll: usize,
    pub theme: Theme,
    pub selected_event_index: usize,
    pub message: Option<StatusMessage>,
    pub categories: Vec<String>,
    pub max_events_per_day: usize,
    pub upcoming_count: usize,
    pub time_format: String,
    pub show_pending: bool,
    unjournaled: Vec<Change>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            mode: Mode::Normal,
            selected_date: Local::now().date_naive(),
            store: EventStore::new(),
            filter: EventFilter::default(),
            drag: DragController::new(),
            editor: None,
            delete_confirmation_event_id: None,
            load_status: LoadStatus::Idle,
            command_buffer: String::new(),
            show_help: false,
            help_scroll: 0,
            theme: Theme::get_by_name(&config.ui.theme),
            selected_event_index: 0,
            message: None,
            categories: config.calendar.categories.clone(),
            max_events_per_day: config.calendar.max_events_per_day,
            upcoming_count: config.calendar.upcoming_count,
            time_format: config.ui.time_format.clone(),
            show_pending: false,
            unjournaled: Vec::new(),
        }
    }

    pub fn events_for_selected_date(&self) -> Vec<&CalendarEvent> {
        self.store.events_for_date(self.selected_date, &self.filter)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.events_for_selected_date().get(self.selected_event_index).copied()
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.reset_event_selection();
    }

    pub fn move_event_selection_down(&mut self) {
        let event_count = self.events_for_selected_date().len();
        if event_count > 0 && self.selected_event_index < event_count - 1 {
            self.selected_event_index += 1;
        }
    }

    pub fn move_event_selection_up(&mut self) {
        self.selected_event_index = self.selected_event_index.saturating_sub(1);
    }

    pub fn reset_event_selection(&mut self) {
        self.selected_event_index = 0;
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage { text: text.into(), is_error: false });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage { text: text.into(), is_error: true });
    }

    pub fn open_create_editor(&mut self, title: String) {
        self.editor = Some(EventEditor::create(self.selected_date, title));
        self.mode = Mode::Insert;
    }

    pub fn open_edit_editor(&mut self) {
        if let Some(event) = self.selected_event() {
            self.editor = Some(EventEditor::edit(event));
            self.mode = Mode::Insert;
        }
    }

    /// Runs an editor action. On success the dialog closes; on a validation
    /// error it stays open with the message shown.
    pub fn apply_editor_action(&mut self, action: EditorAction) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };

        if action == EditorAction::Delete {
            match editor.editing_id() {
                Some(id) => {
                    self.delete_confirmation_event_id = Some(id.to_string());
                    self.editor = None;
                    self.mode = Mode::ConfirmDelete;
                }
                None => self.set_error("Only an existing event can be deleted"),
            }
            return;
        }

        match editor.apply(action, &mut self.store) {
            Ok(outcome) => {
                match outcome {
                    EditorOutcome::Created(event) => {
                        self.set_info(format!("Scheduled '{}'", event.title));
                        self.selected_date = event.scheduled_date();
                        self.unjournaled.push(Change::Upsert(event));
                    }
                    EditorOutcome::Updated(event) => {
                        self.set_info(format!("Updated '{}'", event.title));
                        self.unjournaled.push(Change::Upsert(event));
                    }
                    EditorOutcome::Deleted(event) => {
                        self.set_info(format!("Deleted '{}'", event.title));
                        self.unjournaled.push(Change::Delete { event_id: event.id });
                    }
                    EditorOutcome::Cancelled => {}
                }
                self.editor = None;
                self.mode = Mode::Normal;
                self.reset_event_selection();
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(event) = self.selected_event() {
            self.delete_confirmation_event_id = Some(event.id.clone());
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.delete_confirmation_event_id.take() {
            match self.store.get(&id).map(EventEditor::edit) {
                Some(editor) => {
                    self.editor = Some(editor);
                    self.apply_delete();
                }
                None => self.set_error(format!("Event {} no longer exists", id)),
            }
        }
        self.mode = Mode::Normal;
    }

    fn apply_delete(&mut self) {
        if let Some(editor) = self.editor.take() {
            match editor.apply(EditorAction::Delete, &mut self.store) {
                Ok(EditorOutcome::Deleted(event)) => {
                    self.set_info(format!("Deleted '{}'", event.title));
                    self.unjournaled.push(Change::Delete { event_id: event.id });
                }
                Ok(_) => {}
                Err(e) => self.set_error(e.to_string()),
            }
        }
        self.reset_event_selection();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation_event_id = None;
        self.mode = Mode::Normal;
    }

    pub fn start_drag(&mut self) {
        let Some(event) = self.selected_event() else {
            self.set_error("No event selected to move");
            return;
        };
        let (id, title) = (event.id.clone(), event.title.clone());
        self.drag.start(id);
        self.mode = Mode::Drag;
        self.set_info(format!("Moving '{}': pick a day and press Enter", title));
    }

    pub fn drop_dragged(&mut self) -> Option<DropOutcome> {
        let outcome = self.drag.drop_on(self.selected_date, &mut self.store);
        self.mode = Mode::Normal;
        match &outcome {
            Some(drop) => {
                self.set_info(format!("Rescheduled to {}", drop.to.format("%Y-%m-%d %H:%M")));
                self.unjournaled.push(Change::Reschedule {
                    event_id: drop.event_id.clone(),
                    from: drop.from,
                    to: drop.to,
                });
            }
            None => self.set_error("Nothing to drop"),
        }
        self.reset_event_selection();
        outcome
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.mode = Mode::Normal;
        self.message = None;
    }

    /// Mutations made since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.unjournaled)
    }

    pub fn replace_events(&mut self, events: Vec<CalendarEvent>) {
        self.store.replace_all(events);
        self.reset_event_selection();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{ContentType, EventStatus, Priority};
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn create_event(id: &str, day: u32, hour: u32) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Story {}", id),
            content_type: ContentType::Article,
            status: EventStatus::Draft,
            author: "Desk".to_string(),
            category: "Politics".to_string(),
            scheduled_for: date(day).and_hms_opt(hour, 45, 0).unwrap(),
            priority: Priority::Medium,
            description: None,
        }
    }

    fn app_with_events() -> AppState {
        let mut app = AppState::new();
        app.replace_events(vec![create_event("a", 10, 9), create_event("b", 10, 14), create_event("c", 11, 8)]);
        app.select_date(date(10));
        app
    }

    #[test]
    fn new_app_starts_in_normal_mode() {
        let app = AppState::new();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.load_status, LoadStatus::Idle);
    }

    #[test]
    fn new_app_selects_today() {
        let app = AppState::new();
        assert_eq!(app.selected_date, Local::now().date_naive());
    }

    #[test]
    fn config_limits_are_copied_into_state() {
        let mut config = Config::default();
        config.calendar.max_events_per_day = 5;
        config.ui.theme = "nord".to_string();

        let app = AppState::with_config(&config);

        assert_eq!(app.max_events_per_day, 5);
        assert_eq!(app.theme.name, "nord");
    }

    #[test]
    fn event_selection_stays_in_bounds() {
        let mut app = app_with_events();

        app.move_event_selection_down();
        app.move_event_selection_down();
        assert_eq!(app.selected_event().unwrap().id, "b");

        app.move_event_selection_up();
        app.move_event_selection_up();
        assert_eq!(app.selected_event().unwrap().id, "a");
    }

    #[test]
    fn drag_and_drop_is_journaled() {
        let mut app = app_with_events();

        app.start_drag();
        assert_eq!(app.mode, Mode::Drag);
        app.selected_date = date(20);
        let outcome = app.drop_dragged().unwrap();

        assert_eq!(outcome.to, date(20).and_hms_opt(9, 45, 0).unwrap());
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.take_changes().len(), 1);
        assert!(app.take_changes().is_empty());
    }

    #[test]
    fn cancelled_drag_changes_nothing() {
        let mut app = app_with_events();

        app.start_drag();
        app.selected_date = date(20);
        app.cancel_drag();

        assert_eq!(app.store.get("a").unwrap().scheduled_for.date(), date(10));
        assert!(app.take_changes().is_empty());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with_events();

        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        assert_eq!(app.store.len(), 3);

        app.confirm_delete();

        assert_eq!(app.store.len(), 2);
        assert!(app.store.get("a").is_none());
        assert_eq!(app.take_changes(), vec![Change::Delete { event_id: "a".to_string() }]);
    }

    #[test]
    fn cancelled_delete_keeps_the_event() {
        let mut app = app_with_events();

        app.request_delete();
        app.cancel_delete();

        assert_eq!(app.store.len(), 3);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn editor_delete_routes_through_confirmation() {
        let mut app = app_with_events();
        app.open_edit_editor();

        app.apply_editor_action(EditorAction::Delete);

        assert_eq!(app.mode, Mode::ConfirmDelete);
        assert!(app.editor.is_none());
        assert_eq!(app.delete_confirmation_event_id.as_deref(), Some("a"));
    }

    #[test]
    fn saving_without_title_keeps_editor_open() {
        let mut app = app_with_events();
        app.open_create_editor(String::new());

        app.apply_editor_action(EditorAction::Save);

        assert_eq!(app.mode, Mode::Insert);
        assert!(app.editor.is_some());
        assert!(app.message.as_ref().unwrap().is_error);
    }

    #[test]
    fn scheduling_a_new_event_adds_it_to_the_store() {
        let mut app = app_with_events();
        app.open_create_editor("Budget preview".to_string());

        app.apply_editor_action(EditorAction::Schedule);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 4);
        let created = app.store.iter().find(|e| e.title == "Budget preview").unwrap();
        assert_eq!(created.status, EventStatus::Scheduled);
        assert!(matches!(app.take_changes().as_slice(), [Change::Upsert(_)]));
    }
}
