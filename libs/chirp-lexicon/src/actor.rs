use chrono::{DateTime, Utc};

/// A full profile row as the query layer returns it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The author columns embedded into post rows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileViewBasic {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Editable subset of a profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
