use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::api::client::{segment, AdminClient};
use crate::api::de;
use crate::api::error::ApiError;
use crate::metrics::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    #[default]
    Active,
    Paused,
    Unsubscribed,
}

impl SubscriberStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "unsubscribed" => Some(Self::Unsubscribed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Unsubscribed => "unsubscribed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub subscribed_at: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: SubscriberStatus,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub emails_received: u32,
    #[serde(default)]
    pub last_email_opened: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub preferences: Preferences,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub source: String,
}

fn lenient_status<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<SubscriberStatus, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SubscriberStatus::parse).unwrap_or_default())
}

impl Subscriber {
    /// The backend tracks no open rate, so this is a rough bucket.
    pub fn engagement_rate(&self) -> Metric<u8> {
        let rate = if self.emails_received == 0 {
            0
        } else if self.last_email_opened.is_some() {
            75
        } else {
            25
        };
        Metric::Estimated(rate)
    }

    /// `Mar 4, 2025`, or the raw value when it is not a timestamp.
    pub fn subscribed_on(&self) -> String {
        DateTime::parse_from_rfc3339(&self.subscribed_at)
            .map(|dt| dt.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|_| self.subscribed_at.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubscriberStats {
    pub total: u64,
    pub active: u64,
    pub paused: u64,
    pub unsubscribed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20, total: 0, total_pages: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<SubscriberStatus>,
    pub search: Option<String>,
}

impl Default for SubscriberQuery {
    fn default() -> Self {
        Self { page: 1, limit: 20, status: None, search: None }
    }
}

impl SubscriberQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubscriberPage {
    #[serde(deserialize_with = "de::null_as_default")]
    pub subscribers: Vec<Subscriber>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub stats: SubscriberStats,
    #[serde(deserialize_with = "de::null_as_default")]
    pub pagination: Pagination,
}

impl SubscriberPage {
    /// Mirrors a successful status change locally. Returns false when the id
    /// is not on this page.
    pub fn set_status(&mut self, subscriber_id: &str, status: SubscriberStatus) -> bool {
        match self.subscribers.iter_mut().find(|s| s.id == subscriber_id) {
            Some(subscriber) => {
                subscriber.status = status;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: SubscriberStatus,
}

impl AdminClient {
    pub async fn subscribers(&self, query: &SubscriberQuery) -> Result<SubscriberPage, ApiError> {
        let url = self.admin_endpoint("/admin/subscribers");
        tracing::info!("Fetching subscribers page {} from {}", query.page, url);

        let request = self.authorized(self.http().get(&url).query(&query.params()))?;
        let mut page: SubscriberPage = self.send_json(request, "Failed to fetch subscribers").await?;
        page.pagination.page = query.page;
        page.pagination.limit = query.limit;
        Ok(page)
    }

    pub async fn set_subscriber_status(&self, subscriber_id: &str, status: SubscriberStatus) -> Result<(), ApiError> {
        let url = self.admin_endpoint(&format!("/admin/subscribers/{}", segment(subscriber_id)));
        tracing::info!("Setting subscriber {} to {}", subscriber_id, status.as_str());

        let request = self.authorized(self.http().patch(&url))?.json(&StatusUpdate { status });
        self.send_empty(request, "Failed to update subscriber").await
    }
}

/// Selected subscribers, or all of them when nothing is selected.
pub fn export_selection<'a>(all: &'a [Subscriber], selected_ids: &[String]) -> Vec<&'a Subscriber> {
    if selected_ids.is_empty() {
        all.iter().collect()
    } else {
        all.iter().filter(|s| selected_ids.contains(&s.id)).collect()
    }
}

pub fn export_csv(subscribers: &[&Subscriber]) -> String {
    let mut lines = vec!["Email,Name,Status,Subscribed Date,Emails Received,Source".to_string()];
    lines.extend(subscribers.iter().map(|sub| {
        [
            csv_field(&sub.email),
            csv_field(sub.name.as_deref().unwrap_or_default()),
            sub.status.as_str().to_string(),
            csv_field(&sub.subscribed_on()),
            sub.emails_received.to_string(),
            csv_field(&sub.source),
        ]
        .join(",")
    }));
    lines.join("\n")
}

pub fn export_json(subscribers: &[&Subscriber]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(subscribers)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn subscriber(id: &str, emails_received: u32, last_opened: Option<&str>) -> Subscriber {
        Subscriber {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: None,
            subscribed_at: "2025-03-04T10:00:00Z".to_string(),
            status: SubscriberStatus::Active,
            emails_received,
            last_email_opened: last_opened.map(String::from),
            preferences: Preferences::default(),
            source: "homepage".to_string(),
        }
    }

    #[test]
    fn engagement_is_always_an_estimate() {
        assert_eq!(subscriber("a", 0, None).engagement_rate(), Metric::Estimated(0));
        assert_eq!(subscriber("b", 4, None).engagement_rate(), Metric::Estimated(25));
        assert_eq!(subscriber("c", 4, Some("2025-03-05")).engagement_rate(), Metric::Estimated(75));
    }

    #[test]
    fn csv_has_header_and_formatted_date() {
        let sub = subscriber("a", 3, None);
        let csv = export_csv(&[&sub]);

        assert_eq!(
            csv,
            "Email,Name,Status,Subscribed Date,Emails Received,Source\na@example.com,,active,\"Mar 4, 2025\",3,homepage"
        );
    }

    #[test]
    fn csv_quotes_embedded_quotes() {
        assert_eq!(csv_field(r#"Ana "AJ" Ruiz"#), r#""Ana ""AJ"" Ruiz""#);
    }

    #[test]
    fn csv_quotes_line_breaks() {
        assert_eq!(csv_field("line\r\nbreak"), "\"line\r\nbreak\"");
        assert_eq!(csv_field("carriage\rreturn"), "\"carriage\rreturn\"");
    }

    #[test]
    fn export_uses_selection_when_present() {
        let all = vec![subscriber("a", 0, None), subscriber("b", 0, None)];

        assert_eq!(export_selection(&all, &[]).len(), 2);
        let selected = export_selection(&all, &["b".to_string()]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "b");
    }

    #[test]
    fn unparseable_subscription_date_is_shown_raw() {
        let mut sub = subscriber("a", 0, None);
        sub.subscribed_at = "last spring".to_string();
        assert_eq!(sub.subscribed_on(), "last spring");
    }

    #[test]
    fn page_defaults_when_sections_missing() {
        let page: SubscriberPage = serde_json::from_str(r#"{"subscribers": null}"#).unwrap();

        assert!(page.subscribers.is_empty());
        assert_eq!(page.stats, SubscriberStats::default());
        assert_eq!(page.pagination.limit, 20);
    }

    #[test]
    fn query_skips_empty_search_and_all_status() {
        let query = SubscriberQuery { search: Some(String::new()), ..SubscriberQuery::default() };

        assert_eq!(query.params(), vec![("page", "1".to_string()), ("limit", "20".to_string())]);
    }

    #[test]
    fn unknown_subscriber_status_defaults_to_active() {
        let sub: Subscriber = serde_json::from_str(r#"{"id": 3, "email": "x@example.com", "status": "BOUNCED"}"#).unwrap();

        assert_eq!(sub.id, "3");
        assert_eq!(sub.status, SubscriberStatus::Active);
        assert_eq!(sub.emails_received, 0);
    }

    #[test]
    fn local_status_update_only_touches_the_matching_subscriber() {
        let mut page = SubscriberPage {
            subscribers: vec![subscriber("a", 0, None), subscriber("b", 0, None)],
            ..SubscriberPage::default()
        };

        assert!(page.set_status("b", SubscriberStatus::Paused));
        assert!(!page.set_status("zz", SubscriberStatus::Paused));

        assert_eq!(page.subscribers[0].status, SubscriberStatus::Active);
        assert_eq!(page.subscribers[1].status, SubscriberStatus::Paused);
    }

    #[test]
    fn status_update_body_is_lower_case() {
        let body = serde_json::to_string(&StatusUpdate { status: SubscriberStatus::Paused }).unwrap();
        assert_eq!(body, r#"{"status":"paused"}"#);
    }
}
