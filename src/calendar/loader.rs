use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::api::articles::{Article, ArticleQuery, ContentSource};
use crate::calendar::event::{CalendarEvent, ContentType, EventStatus, Priority, DEFAULT_AUTHOR, DEFAULT_CATEGORY};
use crate::calendar::store::EventStore;

pub const UNTITLED: &str = "Untitled";
const LOAD_FAILED: &str = "Failed to load calendar events";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded(usize),
    Failed(String),
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed(_))
    }
}

/// Fetches the article listing and replaces the store with it.
/// On failure the store is emptied, never left partially filled.
pub async fn load_calendar(source: &dyn ContentSource, limit: u32, store: &mut EventStore) -> LoadStatus {
    match source.list_articles(&ArticleQuery::recent(limit)).await {
        Ok(articles) => {
            let total = articles.len();
            let events: Vec<CalendarEvent> = articles.iter().filter_map(to_calendar_event).collect();
            if events.len() < total {
                tracing::warn!("Skipped {} of {} articles without a usable timestamp", total - events.len(), total);
            }
            store.replace_all(events);
            tracing::info!("Calendar loaded with {} events", store.len());
            LoadStatus::Loaded(store.len())
        }
        Err(e) => {
            tracing::error!("{}: {}", LOAD_FAILED, e);
            store.clear();
            LoadStatus::Failed(format!("{}: {}", LOAD_FAILED, e))
        }
    }
}

/// Maps one listing entry. Articles with neither a publish nor a creation
/// timestamp that parses are dropped.
pub fn to_calendar_event(article: &Article) -> Option<CalendarEvent> {
    let scheduled_for = article
        .published_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| article.created_at.as_deref().and_then(parse_timestamp));
    let Some(scheduled_for) = scheduled_for else {
        tracing::warn!("Article {} has no parseable timestamp, skipping", article.id);
        return None;
    };

    Some(CalendarEvent {
        id: article.id.clone(),
        title: article
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        content_type: article.content_type.as_deref().and_then(ContentType::parse).unwrap_or_default(),
        status: map_status(article),
        author: article
            .author
            .as_ref()
            .and_then(|a| a.display_name())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string(),
        category: article
            .category
            .as_ref()
            .and_then(|c| c.display_name())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        scheduled_for,
        priority: article.priority.as_deref().and_then(Priority::parse).unwrap_or_default(),
        description: article
            .excerpt
            .as_deref()
            .or(article.summary.as_deref())
            .map(strip_html)
            .filter(|d| !d.is_empty()),
    })
}

fn map_status(article: &Article) -> EventStatus {
    if let Some(status) = article.status.as_deref().and_then(EventStatus::parse) {
        return status;
    }
    if article.is_published.unwrap_or(false) {
        EventStatus::Published
    } else {
        EventStatus::Draft
    }
}

/// Accepts RFC 3339 (converted to local wall-clock time), a naive
/// date-time, or a bare date at midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Plain single-line text from an HTML excerpt.
pub fn strip_html(html: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

    let text = html2text::from_read(html.as_bytes(), 1000);
    whitespace.replace_all(text.trim(), " ").into_owned()
}
