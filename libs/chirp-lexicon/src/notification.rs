use chrono::{DateTime, Utc};

/// Raw row from the likes table with the liker profile and the liked post
/// embedded. Embeds filtered away by the row-level query arrive as null.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LikeRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<LikeRowActor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<LikeRowSubject>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LikeRowActor {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LikeRowSubject {
    pub content: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationReason {
    Like,
}

/// A rendered notification line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotificationView {
    pub id: String,
    pub reason: NotificationReason,
    pub actor_username: String,
    pub post_excerpt: String,
    pub created_at: DateTime<Utc>,
}
