use chirp_lexicon::actor::{ProfileUpdate, ProfileView};
use chirp_lexicon::feed::Post;

use crate::error::ClientError;
use crate::platform::Platform;
use crate::session::Session;

pub const AVATAR_BUCKET: &str = "avatars";

const POST_COLUMNS: &str = "id,author_id,content,image_url,created_at";

pub async fn get_profile(
    platform: &Platform,
    viewer: Option<&Session>,
    user_id: &str,
) -> Result<ProfileView, ClientError> {
    let pairs = [
        ("select", "*".to_string()),
        ("id", format!("eq.{}", user_id)),
    ];
    platform.select_one("profiles", &pairs, viewer).await
}

/// Posts authored by one profile, newest first.
pub async fn author_posts(
    platform: &Platform,
    viewer: Option<&Session>,
    user_id: &str,
) -> Result<Vec<Post>, ClientError> {
    let pairs = [
        ("select", POST_COLUMNS.to_string()),
        ("author_id", format!("eq.{}", user_id)),
        ("order", "created_at.desc".to_string()),
    ];
    platform.select("posts", &pairs, viewer).await
}

/// Patch the viewer's own profile row. The username is required; the other
/// fields overwrite whatever is stored.
pub async fn update_profile(
    platform: &Platform,
    session: &Session,
    update: &ProfileUpdate,
) -> Result<ProfileView, ClientError> {
    let body = normalize(update)?;
    let pairs = [("id", format!("eq.{}", session.user_id))];
    let mut rows: Vec<ProfileView> = platform
        .update("profiles", &pairs, &body, Some(session))
        .await?;
    if rows.is_empty() {
        return Err(ClientError::NotFound);
    }
    Ok(rows.remove(0))
}

/// Write the viewer's profile row whether or not it exists yet (the settings
/// save path).
pub async fn upsert_profile(
    platform: &Platform,
    session: &Session,
    update: &ProfileUpdate,
) -> Result<ProfileView, ClientError> {
    let normalized = normalize(update)?;
    let body = serde_json::json!({
        "id": session.user_id,
        "username": normalized.username,
        "bio": normalized.bio,
        "avatar_url": normalized.avatar_url,
    });
    let mut rows: Vec<ProfileView> = platform.upsert("profiles", &body, Some(session)).await?;
    if rows.is_empty() {
        return Err(ClientError::NotFound);
    }
    Ok(rows.remove(0))
}

pub async fn search_profiles(
    platform: &Platform,
    viewer: Option<&Session>,
    query: &str,
    limit: usize,
) -> Result<Vec<ProfileView>, ClientError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(vec![]);
    }
    let pairs = [
        ("select", "*".to_string()),
        ("username", format!("ilike.*{}*", query)),
        ("limit", limit.to_string()),
    ];
    platform.select("profiles", &pairs, viewer).await
}

/// Store an avatar image and return its public URL, ready to be written
/// into the profile's `avatar_url`.
pub async fn upload_avatar(
    platform: &Platform,
    session: &Session,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, ClientError> {
    let extension = match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        other => {
            return Err(ClientError::InvalidInput(format!(
                "unsupported avatar content type: {}",
                other
            )))
        }
    };
    let path = format!("{}/avatar.{}", session.user_id, extension);
    platform
        .upload(AVATAR_BUCKET, &path, bytes, content_type, session)
        .await
}

fn normalize(update: &ProfileUpdate) -> Result<ProfileUpdate, ClientError> {
    let username = update.username.trim();
    if username.is_empty() {
        return Err(ClientError::InvalidInput(
            "username must not be blank".to_string(),
        ));
    }
    Ok(ProfileUpdate {
        username: username.to_string(),
        bio: update.bio.as_deref().map(|bio| bio.trim().to_string()),
        avatar_url: update
            .avatar_url
            .as_deref()
            .map(|avatar_url| avatar_url.trim().to_string()),
    })
}
