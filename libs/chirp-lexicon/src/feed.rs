use super::actor::ProfileViewBasic;
use chrono::{DateTime, Utc};

/// A bare post row, without embeds. Returned by inserts and author listings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A hydrated post as the ranking procedure returns it: author embedded,
/// aggregate counts attached, and per-viewer flags resolved for the viewer
/// the slice was ranked for.
///
/// Counts are server-computed aggregates; the client treats them as a cache
/// and never derives them locally. The `*_by_user` flags default to false on
/// rows fetched without a viewer (search, anonymous timelines).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PostView {
    pub id: String,
    pub author: ProfileViewBasic,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: usize,
    #[serde(default)]
    pub retweets_count: usize,
    #[serde(default)]
    pub bookmarks_count: usize,
    #[serde(default)]
    pub liked_by_user: bool,
    #[serde(default)]
    pub bookmarked_by_user: bool,
    #[serde(default)]
    pub retweeted_by_user: bool,
}

/// Insert shape for the posts table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewPost {
    pub author_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Insert shape for the reports table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewReport {
    pub post_id: String,
    pub reporter_id: String,
    pub reason: String,
}

/// A stored report row.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Report {
    pub id: String,
    pub post_id: String,
    pub reporter_id: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
