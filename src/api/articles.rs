use async_trait::async_trait;
use serde::Deserialize;

use crate::api::client::AdminClient;
use crate::api::de;
use crate::api::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleQuery {
    pub limit: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl ArticleQuery {
    pub fn recent(limit: u32) -> Self {
        Self { limit, sort_by: None, order: None }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(sort_by) = &self.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order", order.as_str().to_string()));
        }
        params
    }
}

/// Article as the listing endpoint returns it. Every field but the id is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Name(String),
    Profile {
        #[serde(rename = "fullName", default)]
        full_name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Record {
        #[serde(default)]
        name: Option<String>,
    },
}

impl AuthorRef {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            AuthorRef::Name(name) => Some(name.as_str()),
            AuthorRef::Profile { full_name } => full_name.as_deref(),
        }
        .filter(|name| !name.trim().is_empty())
    }
}

impl CategoryRef {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            CategoryRef::Name(name) => Some(name.as_str()),
            CategoryRef::Record { name } => name.as_deref(),
        }
        .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ArticleListResponse {
    #[serde(default, deserialize_with = "de::null_as_default")]
    articles: Vec<Article>,
}

/// Source of the content listing behind the calendar.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, ApiError>;
}

#[async_trait]
impl ContentSource for AdminClient {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, ApiError> {
        let url = self.content_endpoint("/api/articles");
        tracing::info!("Fetching up to {} articles from {}", query.limit, url);

        let request = self.http().get(&url).query(&query.params());
        let listing: ArticleListResponse = self.send_json(request, "Failed to load articles").await?;

        tracing::info!("Fetched {} articles", listing.articles.len());
        Ok(listing.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_includes_optional_sort_params() {
        let query = ArticleQuery {
            limit: 10,
            sort_by: Some("publishedAt".to_string()),
            order: Some(SortOrder::Desc),
        };

        assert_eq!(
            query.params(),
            vec![
                ("limit", "10".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn author_may_be_a_string_or_a_profile() {
        let plain: Article = serde_json::from_str(r#"{"id": "1", "author": "Jo Lee"}"#).unwrap();
        let profile: Article = serde_json::from_str(r#"{"id": "2", "author": {"fullName": "Sam Park"}}"#).unwrap();

        assert_eq!(plain.author.unwrap().display_name(), Some("Jo Lee"));
        assert_eq!(profile.author.unwrap().display_name(), Some("Sam Park"));
    }

    #[test]
    fn numeric_ids_become_strings() {
        let article: Article = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(article.id, "42");
    }

    #[test]
    fn null_article_list_is_empty() {
        let listing: ArticleListResponse = serde_json::from_str(r#"{"articles": null}"#).unwrap();
        assert!(listing.articles.is_empty());
    }

    #[test]
    fn missing_article_list_is_empty() {
        let listing: ArticleListResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(listing.articles.is_empty());
    }

    #[test]
    fn category_record_without_name_has_no_display_name() {
        let article: Article = serde_json::from_str(r#"{"id": "1", "category": {"slug": "x"}}"#).unwrap();
        assert_eq!(article.category.unwrap().display_name(), None);
    }
}
