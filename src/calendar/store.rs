use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::calendar::event::{CalendarEvent, ContentType, EventStatus};

/// Category and content-type predicates. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub category: Option<String>,
    pub content_type: Option<ContentType>,
}

impl EventFilter {
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| event.category == category);
        let type_match = self
            .content_type
            .is_none_or(|content_type| event.content_type == content_type);
        category_match && type_match
    }

    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.content_type.is_some()
    }

    pub fn describe(&self) -> String {
        format!(
            "{} / {}",
            self.category.as_deref().unwrap_or("All Categories"),
            self.content_type.map(|t| t.label()).unwrap_or("All Types"),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub scheduled: usize,
    pub in_progress: usize,
    pub review: usize,
    pub published: usize,
    pub draft: usize,
}

/// What a day cell shows: the first `cap` events and how many were left out.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPreview<'a> {
    pub shown: Vec<&'a CalendarEvent>,
    pub hidden: usize,
}

impl<'a> DayPreview<'a> {
    pub fn new(events: Vec<&'a CalendarEvent>, cap: usize) -> Self {
        let hidden = events.len().saturating_sub(cap);
        let shown = events.into_iter().take(cap).collect();
        Self { shown, hidden }
    }

    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{} more", self.hidden))
    }
}

/// In-memory calendar events in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a listing. Later duplicates of an id are dropped.
    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(events.len());
        for event in events {
            if seen.insert(event.id.clone()) {
                unique.push(event);
            } else {
                tracing::warn!("Dropping duplicate calendar event id {}", event.id);
            }
        }
        Self { events: unique }
    }

    pub fn replace_all(&mut self, events: Vec<CalendarEvent>) {
        *self = Self::from_events(events);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Replaces the event with the same id in place, or appends it.
    pub fn upsert(&mut self, event: CalendarEvent) {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CalendarEvent> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Sets a new timestamp on one event. Returns the previous value.
    pub fn reschedule(&mut self, id: &str, scheduled_for: NaiveDateTime) -> Option<NaiveDateTime> {
        let event = self.events.iter_mut().find(|e| e.id == id)?;
        Some(std::mem::replace(&mut event.scheduled_for, scheduled_for))
    }

    pub fn events_for_date(&self, date: NaiveDate, filter: &EventFilter) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|event| event.is_on(date) && filter.matches(event))
            .collect()
    }

    pub fn preview_for_date(&self, date: NaiveDate, filter: &EventFilter, cap: usize) -> DayPreview<'_> {
        DayPreview::new(self.events_for_date(date, filter), cap)
    }

    pub fn upcoming(&self, now: NaiveDateTime, count: usize) -> Vec<&CalendarEvent> {
        let mut upcoming: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|event| event.scheduled_for >= now)
            .collect();
        upcoming.sort_by_key(|event| event.scheduled_for);
        upcoming.truncate(count);
        upcoming
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.events.iter().fold(StatusCounts::default(), |mut counts, event| {
            match event.status {
                EventStatus::Scheduled => counts.scheduled += 1,
                EventStatus::InProgress => counts.in_progress += 1,
                EventStatus::Review => counts.review += 1,
                EventStatus::Published => counts.published += 1,
                EventStatus::Draft => counts.draft += 1,
            }
            counts
        })
    }

    pub fn published_on(&self, date: NaiveDate) -> usize {
        self.events
            .iter()
            .filter(|event| event.status == EventStatus::Published && event.is_on(date))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::Priority;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn create_event(id: &str, day: NaiveDate, hour: u32, category: &str, content_type: ContentType) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Story {}", id),
            content_type,
            status: EventStatus::Draft,
            author: "Desk".to_string(),
            category: category.to_string(),
            scheduled_for: day.and_hms_opt(hour, 15, 0).unwrap(),
            priority: Priority::Medium,
            description: None,
        }
    }

    fn ids(events: &[&CalendarEvent]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn events_for_date_matches_by_calendar_day() {
        let day = date(2025, 6, 10);
        let store = EventStore::from_events(vec![
            create_event("a", day, 0, "Politics", ContentType::Article),
            create_event("b", day, 23, "Politics", ContentType::Article),
            create_event("c", date(2025, 7, 10), 9, "Politics", ContentType::Article),
            create_event("d", date(2024, 6, 10), 9, "Politics", ContentType::Article),
        ]);

        let events = store.events_for_date(day, &EventFilter::default());

        assert_eq!(ids(&events), vec!["a", "b"]);
    }

    #[test]
    fn category_filter_hides_matching_day() {
        let day = date(2025, 6, 10);
        let store = EventStore::from_events(vec![
            create_event("a", day, 9, "Politics", ContentType::Article),
            create_event("b", day, 10, "Sports", ContentType::Article),
        ]);
        let filter = EventFilter { category: Some("Sports".to_string()), content_type: None };

        assert_eq!(ids(&store.events_for_date(day, &filter)), vec!["b"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let day = date(2025, 6, 10);
        let store = EventStore::from_events(vec![
            create_event("a", day, 9, "Sports", ContentType::Article),
            create_event("b", day, 10, "Sports", ContentType::Breaking),
            create_event("c", day, 11, "Politics", ContentType::Breaking),
            create_event("d", date(2025, 6, 11), 11, "Sports", ContentType::Breaking),
        ]);
        let filter = EventFilter {
            category: Some("Sports".to_string()),
            content_type: Some(ContentType::Breaking),
        };

        assert_eq!(ids(&store.events_for_date(day, &filter)), vec!["b"]);
    }

    #[test]
    fn preview_caps_at_three_with_more_label() {
        let day = date(2025, 6, 10);
        let events = (0..5)
            .map(|i| create_event(&format!("e{}", i), day, 8 + i, "Politics", ContentType::Article))
            .collect();
        let store = EventStore::from_events(events);

        let preview = store.preview_for_date(day, &EventFilter::default(), 3);

        assert_eq!(preview.shown.len(), 3);
        assert_eq!(preview.more_label(), Some("+2 more".to_string()));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let day = date(2025, 6, 10);
        let store = EventStore::from_events(vec![
            create_event("a", day, 9, "Politics", ContentType::Article),
            create_event("a", day, 10, "Sports", ContentType::Article),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().category, "Politics");
    }

    #[test]
    fn remove_takes_exactly_one_entry() {
        let day = date(2025, 6, 10);
        let mut store = EventStore::from_events(vec![
            create_event("a", day, 9, "Politics", ContentType::Article),
            create_event("b", day, 10, "Politics", ContentType::Article),
            create_event("c", day, 11, "Politics", ContentType::Article),
        ]);

        let removed = store.remove("b");

        assert_eq!(removed.map(|e| e.id), Some("b".to_string()));
        assert_eq!(store.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(store.remove("b").is_none());
    }

    #[test]
    fn upcoming_sorts_and_truncates() {
        let now = date(2025, 6, 10).and_hms_opt(12, 0, 0).unwrap();
        let store = EventStore::from_events(vec![
            create_event("past", date(2025, 6, 9), 9, "Politics", ContentType::Article),
            create_event("later", date(2025, 6, 20), 9, "Politics", ContentType::Article),
            create_event("soon", date(2025, 6, 11), 9, "Politics", ContentType::Article),
            create_event("soonest", date(2025, 6, 10), 13, "Politics", ContentType::Article),
        ]);

        assert_eq!(ids(&store.upcoming(now, 2)), vec!["soonest", "soon"]);
    }

    #[test]
    fn status_counts_tally_each_status() {
        let day = date(2025, 6, 10);
        let mut review = create_event("r", day, 9, "Politics", ContentType::Article);
        review.status = EventStatus::Review;
        let mut published = create_event("p", day, 9, "Politics", ContentType::Article);
        published.status = EventStatus::Published;
        let store = EventStore::from_events(vec![
            review,
            published,
            create_event("d", day, 9, "Politics", ContentType::Article),
        ]);

        let counts = store.status_counts();

        assert_eq!(counts, StatusCounts { review: 1, published: 1, draft: 1, ..StatusCounts::default() });
        assert_eq!(store.published_on(day), 1);
        assert_eq!(store.published_on(date(2024, 6, 10)), 0);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let day = date(2025, 6, 10);
        let mut store = EventStore::from_events(vec![
            create_event("a", day, 9, "Politics", ContentType::Article),
            create_event("b", day, 10, "Politics", ContentType::Article),
        ]);
        let mut edited = store.get("a").unwrap().clone();
        edited.title = "Edited".to_string();

        store.upsert(edited);

        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().next().unwrap().title, "Edited");
    }
}
