use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::event::{
    cycle, CalendarEvent, ContentType, EventStatus, Priority, DEFAULT_AUTHOR, DEFAULT_CATEGORY,
};
use crate::calendar::store::EventStore;

#[derive(Debug, Error, PartialEq)]
pub enum EditorError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Only an existing event can be deleted")]
    NothingToDelete,
    #[error("Event {0} no longer exists")]
    UnknownEvent(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Schedule,
    Delete,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    Created(CalendarEvent),
    Updated(CalendarEvent),
    Deleted(CalendarEvent),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    ContentType,
    Category,
    Date,
    Time,
    Priority,
    Status,
    Author,
    Description,
}

const FIELD_ORDER: [EditorField; 9] = [
    EditorField::Title,
    EditorField::ContentType,
    EditorField::Category,
    EditorField::Date,
    EditorField::Time,
    EditorField::Priority,
    EditorField::Status,
    EditorField::Author,
    EditorField::Description,
];

/// Form state behind the schedule/edit dialog.
#[derive(Debug, Clone)]
pub struct EventEditor {
    pub mode: EditorMode,
    pub title: String,
    pub content_type: ContentType,
    pub category: String,
    pub date_input: String,
    pub time_input: String,
    pub priority: Priority,
    pub status: EventStatus,
    pub author: String,
    pub description: String,
    pub active_field: EditorField,
    pub time_buffer_touched: bool,
    pub date_buffer_touched: bool,
}

impl EventEditor {
    pub fn create(date: NaiveDate, title: String) -> Self {
        let hour = Local::now().hour();
        Self {
            mode: EditorMode::Create,
            title,
            content_type: ContentType::Article,
            category: DEFAULT_CATEGORY.to_string(),
            date_input: date.format("%Y-%m-%d").to_string(),
            time_input: format!("{:02}:00", hour),
            priority: Priority::Medium,
            status: EventStatus::Draft,
            author: String::new(),
            description: String::new(),
            active_field: EditorField::Title,
            time_buffer_touched: false,
            date_buffer_touched: false,
        }
    }

    pub fn edit(event: &CalendarEvent) -> Self {
        Self {
            mode: EditorMode::Edit(event.id.clone()),
            title: event.title.clone(),
            content_type: event.content_type,
            category: event.category.clone(),
            date_input: event.scheduled_for.format("%Y-%m-%d").to_string(),
            time_input: event.scheduled_for.format("%H:%M").to_string(),
            priority: event.priority,
            status: event.status,
            author: event.author.clone(),
            description: event.description.clone().unwrap_or_default(),
            active_field: EditorField::Title,
            time_buffer_touched: false,
            date_buffer_touched: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            EditorMode::Edit(id) => Some(id),
            EditorMode::Create => None,
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = cycle(&FIELD_ORDER, self.active_field, true);
    }

    pub fn prev_field(&mut self) {
        self.active_field = cycle(&FIELD_ORDER, self.active_field, false);
    }

    /// Steps the value of an enumerated field. Text fields are left alone.
    pub fn cycle_value(&mut self, forward: bool) {
        match self.active_field {
            EditorField::ContentType => {
                self.content_type = cycle(&ContentType::ALL, self.content_type, forward);
            }
            EditorField::Priority => self.priority = cycle(&Priority::ALL, self.priority, forward),
            EditorField::Status => self.status = cycle(&EventStatus::ALL, self.status, forward),
            _ => {}
        }
    }

    pub fn is_choice_field(&self) -> bool {
        matches!(
            self.active_field,
            EditorField::ContentType | EditorField::Priority | EditorField::Status
        )
    }

    pub fn push_char(&mut self, c: char) {
        match self.active_field {
            EditorField::Title => self.title.push(c),
            EditorField::Category => self.category.push(c),
            EditorField::Author => self.author.push(c),
            EditorField::Description => self.description.push(c),
            EditorField::Date => {
                if c.is_ascii_digit() || c == '-' {
                    if !self.date_buffer_touched {
                        self.date_input.clear();
                        self.date_buffer_touched = true;
                    }
                    if self.date_input.len() < 10 {
                        self.date_input.push(c);
                    }
                }
            }
            EditorField::Time => {
                if c.is_ascii_digit() || c == ':' {
                    if !self.time_buffer_touched {
                        self.time_input.clear();
                        self.time_buffer_touched = true;
                    }
                    if self.time_input.len() < 5 {
                        self.time_input.push(c);
                    }
                }
            }
            EditorField::ContentType | EditorField::Priority | EditorField::Status => {
                if c == ' ' {
                    self.cycle_value(true);
                }
            }
        }
    }

    pub fn pop_char(&mut self) {
        match self.active_field {
            EditorField::Title => {
                self.title.pop();
            }
            EditorField::Category => {
                self.category.pop();
            }
            EditorField::Author => {
                self.author.pop();
            }
            EditorField::Description => {
                self.description.pop();
            }
            EditorField::Date => {
                self.date_input.pop();
                self.date_buffer_touched = true;
            }
            EditorField::Time => {
                self.time_input.pop();
                self.time_buffer_touched = true;
            }
            _ => {}
        }
    }

    /// Accepts `HH:MM`, `HHMM`, `HMM` or a bare hour; out of range values clamp.
    pub fn parse_time_input(&self) -> NaiveTime {
        let input = self.time_input.replace(':', "");
        let (hour, minute) = match input.parse::<u32>() {
            Ok(num) if input.len() == 3 || input.len() == 4 => (num / 100, num % 100),
            Ok(num) if !input.is_empty() && input.len() <= 2 => (num, 0),
            _ => (0, 0),
        };
        NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn parse_date_input(&self) -> Result<NaiveDate, EditorError> {
        NaiveDate::parse_from_str(self.date_input.trim(), "%Y-%m-%d")
            .map_err(|_| EditorError::InvalidDate(self.date_input.clone()))
    }

    fn build_event(&self, id: String, status: EventStatus) -> Result<CalendarEvent, EditorError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(EditorError::MissingTitle);
        }
        let date = self.parse_date_input()?;

        Ok(CalendarEvent {
            id,
            title: title.to_string(),
            content_type: self.content_type,
            status,
            author: non_empty_or(&self.author, DEFAULT_AUTHOR),
            category: non_empty_or(&self.category, DEFAULT_CATEGORY),
            scheduled_for: date.and_time(self.parse_time_input()),
            priority: self.priority,
            description: Some(self.description.trim().to_string()).filter(|d| !d.is_empty()),
        })
    }

    /// Applies an action to the store. The dialog closes after any `Ok`.
    pub fn apply(&self, action: EditorAction, store: &mut EventStore) -> Result<EditorOutcome, EditorError> {
        match action {
            EditorAction::Cancel => Ok(EditorOutcome::Cancelled),
            EditorAction::Delete => {
                let id = self.editing_id().ok_or(EditorError::NothingToDelete)?;
                let removed = store
                    .remove(id)
                    .ok_or_else(|| EditorError::UnknownEvent(id.to_string()))?;
                tracing::info!("Removed calendar event {}", removed.id);
                Ok(EditorOutcome::Deleted(removed))
            }
            EditorAction::Save | EditorAction::Schedule => {
                let status = if action == EditorAction::Schedule {
                    EventStatus::Scheduled
                } else {
                    self.status
                };
                match &self.mode {
                    EditorMode::Edit(id) => {
                        if store.get(id).is_none() {
                            return Err(EditorError::UnknownEvent(id.clone()));
                        }
                        let event = self.build_event(id.clone(), status)?;
                        store.upsert(event.clone());
                        Ok(EditorOutcome::Updated(event))
                    }
                    EditorMode::Create => {
                        let event = self.build_event(Uuid::new_v4().to_string(), status)?;
                        store.upsert(event.clone());
                        Ok(EditorOutcome::Created(event))
                    }
                }
            }
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn create_event(id: &str, scheduled_for: NaiveDateTime) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Story {}", id),
            content_type: ContentType::Feature,
            status: EventStatus::Review,
            author: "Ana Ruiz".to_string(),
            category: "Science".to_string(),
            scheduled_for,
            priority: Priority::High,
            description: Some("Deep dive".to_string()),
        }
    }

    fn store_with(ids: &[&str]) -> EventStore {
        let at = date(2025, 4, 1).and_hms_opt(8, 30, 0).unwrap();
        EventStore::from_events(ids.iter().map(|id| create_event(id, at)).collect())
    }

    #[test]
    fn edit_mode_prefills_fields() {
        let event = create_event("e1", date(2025, 4, 1).and_hms_opt(8, 30, 0).unwrap());
        let editor = EventEditor::edit(&event);

        assert_eq!(editor.mode, EditorMode::Edit("e1".to_string()));
        assert_eq!(editor.title, "Story e1");
        assert_eq!(editor.date_input, "2025-04-01");
        assert_eq!(editor.time_input, "08:30");
        assert_eq!(editor.priority, Priority::High);
    }

    #[test]
    fn create_mode_starts_blank_on_given_day() {
        let editor = EventEditor::create(date(2025, 4, 9), String::new());

        assert!(!editor.is_editing());
        assert_eq!(editor.date_input, "2025-04-09");
        assert_eq!(editor.status, EventStatus::Draft);
    }

    #[test]
    fn delete_removes_only_the_edited_event() {
        let mut store = store_with(&["a", "b", "c"]);
        let editor = EventEditor::edit(store.get("b").unwrap());

        let outcome = editor.apply(EditorAction::Delete, &mut store).unwrap();

        assert!(matches!(outcome, EditorOutcome::Deleted(ref e) if e.id == "b"));
        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_some());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn delete_in_create_mode_is_rejected() {
        let mut store = store_with(&["a"]);
        let editor = EventEditor::create(date(2025, 4, 9), "New".to_string());

        assert_eq!(editor.apply(EditorAction::Delete, &mut store), Err(EditorError::NothingToDelete));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_in_create_mode_appends_new_event() {
        let mut store = store_with(&["a"]);
        let mut editor = EventEditor::create(date(2025, 4, 9), "Budget explainer".to_string());
        editor.time_input = "1415".to_string();

        let outcome = editor.apply(EditorAction::Save, &mut store).unwrap();

        let EditorOutcome::Created(event) = outcome else {
            panic!("expected a created event");
        };
        assert_eq!(store.len(), 2);
        assert_eq!(event.scheduled_for, date(2025, 4, 9).and_hms_opt(14, 15, 0).unwrap());
        assert_eq!(event.author, DEFAULT_AUTHOR);
        assert_ne!(event.id, "a");
    }

    #[test]
    fn schedule_forces_scheduled_status() {
        let mut store = EventStore::new();
        let editor = EventEditor::create(date(2025, 4, 9), "Morning briefing".to_string());

        let outcome = editor.apply(EditorAction::Schedule, &mut store).unwrap();

        assert!(matches!(outcome, EditorOutcome::Created(ref e) if e.status == EventStatus::Scheduled));
    }

    #[test]
    fn save_in_edit_mode_updates_in_place() {
        let mut store = store_with(&["a", "b"]);
        let mut editor = EventEditor::edit(store.get("a").unwrap());
        editor.title = "Retitled".to_string();

        editor.apply(EditorAction::Save, &mut store).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().title, "Retitled");
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut store = EventStore::new();
        let editor = EventEditor::create(date(2025, 4, 9), "   ".to_string());

        assert_eq!(editor.apply(EditorAction::Save, &mut store), Err(EditorError::MissingTitle));
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_leaves_store_untouched() {
        let mut store = store_with(&["a"]);
        let editor = EventEditor::edit(store.get("a").unwrap());

        assert_eq!(editor.apply(EditorAction::Cancel, &mut store), Ok(EditorOutcome::Cancelled));
        assert_eq!(store.get("a").unwrap().title, "Story a");
    }

    #[test]
    fn time_input_clamps_out_of_range_values() {
        let mut editor = EventEditor::create(date(2025, 4, 9), "x".to_string());
        editor.time_input = "2575".to_string();
        assert_eq!(editor.parse_time_input(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());

        editor.time_input = "7".to_string();
        assert_eq!(editor.parse_time_input(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    }

    #[test]
    fn typing_in_choice_field_cycles_value() {
        let mut editor = EventEditor::create(date(2025, 4, 9), "x".to_string());
        editor.active_field = EditorField::Priority;

        editor.push_char(' ');

        assert_eq!(editor.priority, Priority::High);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut editor = EventEditor::create(date(2025, 4, 9), "x".to_string());
        editor.prev_field();
        assert_eq!(editor.active_field, EditorField::Description);
        editor.next_field();
        assert_eq!(editor.active_field, EditorField::Title);
    }
}
