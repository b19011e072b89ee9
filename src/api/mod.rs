pub mod articles;
pub mod auth;
pub mod client;
pub mod de;
pub mod error;
pub mod moderation;
pub mod security;
pub mod subscribers;

pub use articles::{Article, ArticleQuery, ContentSource};
pub use client::AdminClient;
pub use error::ApiError;
