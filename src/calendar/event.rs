use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub status: EventStatus,
    pub author: String,
    pub category: String,
    pub scheduled_for: NaiveDateTime,
    pub priority: Priority,
    pub description: Option<String>,
}

pub const DEFAULT_AUTHOR: &str = "Staff Writer";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Article,
    Breaking,
    Feature,
    Opinion,
    Interview,
    Newsletter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Review,
    Published,
    #[default]
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Article,
        ContentType::Breaking,
        ContentType::Feature,
        ContentType::Opinion,
        ContentType::Interview,
        ContentType::Newsletter,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "article" => Some(Self::Article),
            "breaking" => Some(Self::Breaking),
            "feature" => Some(Self::Feature),
            "opinion" => Some(Self::Opinion),
            "interview" => Some(Self::Interview),
            "newsletter" => Some(Self::Newsletter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Breaking => "Breaking News",
            Self::Feature => "Feature",
            Self::Opinion => "Opinion",
            Self::Interview => "Interview",
            Self::Newsletter => "Newsletter",
        }
    }
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Draft,
        EventStatus::Scheduled,
        EventStatus::InProgress,
        EventStatus::Review,
        EventStatus::Published,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" => Some(Self::InProgress),
            "review" => Some(Self::Review),
            "published" => Some(Self::Published),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Review => "In Review",
            Self::Published => "Published",
            Self::Draft => "Draft",
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Low => "○",
            Self::Medium => "◐",
            Self::High => "●",
            Self::Urgent => "🔥",
        }
    }
}

impl CalendarEvent {
    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_for.date()
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.scheduled_date() == date
    }

    /// Scheduled time in `time_format`, or `%H:%M` when the pattern is invalid.
    pub fn time_label(&self, time_format: &str) -> String {
        let mut label = String::new();
        if write!(label, "{}", self.scheduled_for.format(time_format)).is_ok() {
            return label;
        }
        self.scheduled_for.format(DEFAULT_TIME_FORMAT).to_string()
    }
}

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// True when every specifier in `pattern` is one chrono understands.
pub fn is_valid_time_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Steps through a closed set of values, wrapping at both ends.
pub fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let Some(index) = all.iter().position(|v| *v == current) else {
        return current;
    };
    let len = all.len();
    let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
    all[next]
}
