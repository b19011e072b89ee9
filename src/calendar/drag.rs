use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::calendar::store::EventStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { event_id: String },
}

/// Result of dropping the dragged event on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub event_id: String,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DropOutcome {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { event_id } => Some(event_id),
            DragState::Idle => None,
        }
    }

    pub fn start(&mut self, event_id: impl Into<String>) {
        self.state = DragState::Dragging { event_id: event_id.into() };
    }

    /// Drag ended without a drop target.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Moves the dragged event to `target`, keeping its hour and minute.
    ///
    /// Always returns to idle. `None` when nothing was being dragged or the event
    /// no longer exists in the store.
    pub fn drop_on(&mut self, target: NaiveDate, store: &mut EventStore) -> Option<DropOutcome> {
        let DragState::Dragging { event_id } = std::mem::take(&mut self.state) else {
            return None;
        };

        let original = store.get(&event_id)?.scheduled_for;
        let to = target.and_hms_opt(original.hour(), original.minute(), 0)?;
        let from = store.reschedule(&event_id, to)?;

        tracing::info!("Rescheduled {} from {} to {}", event_id, from, to);
        Some(DropOutcome { event_id, from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::{CalendarEvent, ContentType, EventStatus, Priority};
    use proptest::prelude::*;

    fn create_store(id: &str, scheduled_for: NaiveDateTime) -> EventStore {
        EventStore::from_events(vec![CalendarEvent {
            id: id.to_string(),
            title: "Election night".to_string(),
            content_type: ContentType::Breaking,
            status: EventStatus::Scheduled,
            author: "Desk".to_string(),
            category: "Politics".to_string(),
            scheduled_for,
            priority: Priority::Urgent,
            description: None,
        }])
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn new_controller_is_idle() {
        let controller = DragController::new();
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn drop_preserves_time_of_day() {
        let mut store = create_store("e1", date(2025, 5, 2).and_hms_opt(14, 45, 30).unwrap());
        let mut controller = DragController::new();

        controller.start("e1");
        let outcome = controller.drop_on(date(2025, 5, 20), &mut store).unwrap();

        assert_eq!(outcome.to, date(2025, 5, 20).and_hms_opt(14, 45, 0).unwrap());
        assert_eq!(store.get("e1").unwrap().scheduled_for, outcome.to);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn drop_on_same_day_still_reports_update() {
        let original = date(2025, 5, 2).and_hms_opt(9, 5, 0).unwrap();
        let mut store = create_store("e1", original);
        let mut controller = DragController::new();

        controller.start("e1");
        let outcome = controller.drop_on(date(2025, 5, 2), &mut store).unwrap();

        assert_eq!(outcome.to, original);
        assert!(!outcome.moved());
    }

    #[test]
    fn drop_without_drag_is_ignored() {
        let original = date(2025, 5, 2).and_hms_opt(9, 5, 0).unwrap();
        let mut store = create_store("e1", original);
        let mut controller = DragController::new();

        assert!(controller.drop_on(date(2025, 5, 3), &mut store).is_none());
        assert_eq!(store.get("e1").unwrap().scheduled_for, original);
    }

    #[test]
    fn cancel_returns_to_idle_without_changes() {
        let original = date(2025, 5, 2).and_hms_opt(9, 5, 0).unwrap();
        let mut store = create_store("e1", original);
        let mut controller = DragController::new();

        controller.start("e1");
        controller.cancel();

        assert_eq!(controller.dragged_id(), None);
        assert!(controller.drop_on(date(2025, 5, 3), &mut store).is_none());
        assert_eq!(store.get("e1").unwrap().scheduled_for, original);
    }

    #[test]
    fn dropping_a_removed_event_returns_to_idle() {
        let mut store = create_store("e1", date(2025, 5, 2).and_hms_opt(9, 5, 0).unwrap());
        let mut controller = DragController::new();

        controller.start("e1");
        store.remove("e1");

        assert!(controller.drop_on(date(2025, 5, 3), &mut store).is_none());
        assert!(!controller.is_dragging());
    }

    proptest! {
        #[test]
        fn drop_changes_only_the_calendar_day(
            hour in 0u32..24, minute in 0u32..60,
            from_day in 1u32..=28, to_day in 1u32..=28, to_month in 1u32..=12,
        ) {
            let original = date(2025, 3, from_day).and_hms_opt(hour, minute, 0).unwrap();
            let mut store = create_store("e1", original);
            let mut controller = DragController::new();
            let target = date(2026, to_month, to_day);

            controller.start("e1");
            let outcome = controller.drop_on(target, &mut store).unwrap();

            prop_assert_eq!(outcome.from, original);
            prop_assert_eq!(outcome.to.date(), target);
            prop_assert_eq!(outcome.to.hour(), hour);
            prop_assert_eq!(outcome.to.minute(), minute);
        }
    }
}
