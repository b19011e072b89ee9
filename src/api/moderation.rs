use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::{segment, AdminClient};
use crate::api::de;
use crate::api::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Spam,
}

impl CommentStatus {
    pub const ALL: [CommentStatus; 4] = [
        CommentStatus::Pending,
        CommentStatus::Approved,
        CommentStatus::Rejected,
        CommentStatus::Spam,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "spam" => Some(Self::Spam),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Spam => "Spam",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Spam,
}

impl ModerationAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "spam" => Some(Self::Spam),
            _ => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Spam => "spam",
        }
    }

    /// Spam has no endpoint of its own; it is a rejection with a reason.
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject | Self::Spam => "reject",
        }
    }

    fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Spam => Some("Marked as spam"),
            _ => None,
        }
    }

    pub fn resulting_status(&self) -> CommentStatus {
        match self {
            Self::Approve => CommentStatus::Approved,
            Self::Reject => CommentStatus::Rejected,
            Self::Spam => CommentStatus::Spam,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub email: String,
    pub content: String,
    pub article_title: String,
    pub article_id: Option<String>,
    pub status: CommentStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub ip_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    #[serde(deserialize_with = "de::id")]
    id: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    article: Option<RawArticleRef>,
    #[serde(default, deserialize_with = "de::optional_id")]
    article_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArticleRef {
    #[serde(default, deserialize_with = "de::optional_id")]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueueResponse {
    #[serde(default, deserialize_with = "de::null_as_default")]
    comments: Vec<RawComment>,
}

#[derive(Debug, Serialize)]
struct ActionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        let name = raw.user.as_ref().and_then(|u| u.name.clone()).filter(|n| !n.is_empty());
        let email = raw.user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default();
        let author = name
            .or_else(|| Some(email.clone()).filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "Anonymous".to_string());
        let status = raw.status.as_deref().map(|s| {
            CommentStatus::parse(s).unwrap_or_else(|| {
                tracing::warn!("Unknown comment status '{}' on {}, treating as pending", s, raw.id);
                CommentStatus::Pending
            })
        });

        Comment {
            author,
            email,
            content: raw.content.unwrap_or_default(),
            article_title: raw
                .article
                .as_ref()
                .and_then(|a| a.title.clone())
                .unwrap_or_else(|| "Unknown Article".to_string()),
            article_id: raw.article.and_then(|a| a.id).or(raw.article_id),
            status: status.unwrap_or_default(),
            submitted_at: raw
                .created_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            ip_address: raw.ip_address.unwrap_or_else(|| "Unknown".to_string()),
            id: raw.id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl AdminClient {
    pub async fn moderation_queue(&self) -> Result<Vec<Comment>, ApiError> {
        let url = self.content_endpoint("/api/admin/moderation/queue");
        tracing::info!("Fetching moderation queue from {}", url);

        let request = self.authorized(self.http().get(&url))?;
        let queue: QueueResponse = self.send_json(request, "Failed to fetch comments").await?;

        Ok(queue.comments.into_iter().map(Comment::from).collect())
    }

    pub async fn moderate(&self, comment_id: &str, action: ModerationAction) -> Result<(), ApiError> {
        let url = self.content_endpoint(&format!(
            "/api/admin/moderation/comments/{}/{}",
            segment(comment_id),
            action.endpoint()
        ));
        tracing::info!("Moderating comment {}: {}", comment_id, action.verb());

        let request = self
            .authorized(self.http().post(&url))?
            .json(&ActionBody { reason: action.reason() });
        self.send_empty(request, &format!("Failed to {} comment", action.verb())).await
    }

    /// Applies one action to several comments in turn. A missing token fails
    /// the whole batch up front; other failures are counted per comment.
    pub async fn moderate_many(&self, comment_ids: &[String], action: ModerationAction) -> Result<BulkOutcome, ApiError> {
        if !self.has_token() {
            return Err(ApiError::AuthenticationRequired);
        }

        let mut outcome = BulkOutcome::default();
        for id in comment_ids {
            match self.moderate(id, action).await {
                Ok(()) => outcome.succeeded += 1,
                Err(e) => {
                    tracing::warn!("Failed to {} comment {}: {}", action.verb(), id, e);
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }
}

/// Comments held locally, updated as moderation actions succeed.
#[derive(Debug, Clone, Default)]
pub struct ModerationQueue {
    comments: Vec<Comment>,
}

impl ModerationQueue {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn with_status(&self, status: CommentStatus) -> Vec<&Comment> {
        self.comments.iter().filter(|c| c.status == status).collect()
    }

    pub fn count(&self, status: CommentStatus) -> usize {
        self.comments.iter().filter(|c| c.status == status).count()
    }

    /// Records a successful action. Returns false when the id is unknown.
    pub fn apply(&mut self, comment_id: &str, action: ModerationAction) -> bool {
        match self.comments.iter_mut().find(|c| c.id == comment_id) {
            Some(comment) => {
                comment.status = action.resulting_status();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_comment(json: &str) -> Comment {
        let raw: RawComment = serde_json::from_str(json).unwrap();
        Comment::from(raw)
    }

    #[test]
    fn author_falls_back_to_email_then_anonymous() {
        let with_email = parse_comment(r#"{"id": "c1", "user": {"email": "r@example.com"}}"#);
        let anonymous = parse_comment(r#"{"id": "c2"}"#);

        assert_eq!(with_email.author, "r@example.com");
        assert_eq!(anonymous.author, "Anonymous");
        assert_eq!(anonymous.email, "");
    }

    #[test]
    fn missing_fields_get_display_defaults() {
        let comment = parse_comment(r#"{"id": "c1", "articleId": 7}"#);

        assert_eq!(comment.article_title, "Unknown Article");
        assert_eq!(comment.article_id, Some("7".to_string()));
        assert_eq!(comment.ip_address, "Unknown");
        assert_eq!(comment.status, CommentStatus::Pending);
    }

    #[test]
    fn status_is_lower_cased() {
        let comment = parse_comment(r#"{"id": "c1", "status": "APPROVED"}"#);
        assert_eq!(comment.status, CommentStatus::Approved);
    }

    #[test]
    fn unknown_status_becomes_pending() {
        let comment = parse_comment(r#"{"id": "c1", "status": "FLAGGED"}"#);
        assert_eq!(comment.status, CommentStatus::Pending);
    }

    #[test]
    fn spam_posts_to_reject_with_reason() {
        assert_eq!(ModerationAction::Spam.endpoint(), "reject");
        assert_eq!(ModerationAction::Spam.reason(), Some("Marked as spam"));
        assert_eq!(ModerationAction::Reject.reason(), None);
    }

    #[test]
    fn reason_is_omitted_from_body_when_absent() {
        let body = serde_json::to_string(&ActionBody { reason: None }).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn queue_apply_updates_local_status_and_counts() {
        let mut queue = ModerationQueue::new(vec![
            parse_comment(r#"{"id": "c1"}"#),
            parse_comment(r#"{"id": "c2"}"#),
        ]);

        assert!(queue.apply("c1", ModerationAction::Spam));
        assert!(!queue.apply("missing", ModerationAction::Approve));

        assert_eq!(queue.count(CommentStatus::Pending), 1);
        assert_eq!(queue.count(CommentStatus::Spam), 1);
        assert_eq!(queue.with_status(CommentStatus::Spam)[0].id, "c1");
    }
}
