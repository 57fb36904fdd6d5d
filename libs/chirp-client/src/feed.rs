use std::sync::Arc;

use chirp_lexicon::feed::{NewPost, NewReport, Post, PostView, Report};
use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::interactions::{InteractionKind, ToggleBackend, ToggleController};
use crate::platform::Platform;
use crate::realtime::InteractionEvent;
use crate::session::Session;

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Columns for post rows fetched outside the ranking procedure. Viewer flags
/// are absent in these rows and default to false.
const POST_VIEW_COLUMNS: &str = "id,content,image_url,created_at,likes_count,retweets_count,bookmarks_count,author:profiles(id,username,avatar_url,is_verified)";

/// Fetch a slice of the viewer's ranked timeline from the server-side
/// ranking procedure. Rows arrive with aggregate counts and per-viewer
/// flags already resolved; the client never ranks or counts locally.
pub async fn fetch_timeline(
    platform: &Platform,
    viewer: Option<&Session>,
    limit: usize,
    cursor: Option<DateTime<Utc>>,
) -> Result<Vec<PostView>, ClientError> {
    let body = serde_json::json!({
        "viewer_id": viewer.map(|session| session.user_id.clone()),
        "page_size": limit,
        "before": cursor,
    });
    platform.rpc("feed_ranked", &body, viewer).await
}

/// Next-page cursor for a fetched slice: the timestamp of its oldest row.
pub fn next_cursor(posts: &[PostView]) -> Option<DateTime<Utc>> {
    posts.last().map(|post| post.created_at)
}

pub async fn publish_post(
    platform: &Platform,
    session: &Session,
    content: &str,
    image_url: Option<&str>,
) -> Result<Post, ClientError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ClientError::InvalidInput(
            "post content must not be blank".to_string(),
        ));
    }
    let record = NewPost {
        author_id: session.user_id.clone(),
        content: content.to_string(),
        image_url: image_url.map(str::to_string),
    };
    let mut rows: Vec<Post> = platform.insert("posts", &record, Some(session)).await?;
    if rows.is_empty() {
        return Err(ClientError::NotFound);
    }
    Ok(rows.remove(0))
}

/// File a report against a post. Reports are write-only from the client;
/// moderation happens platform-side.
pub async fn report_post(
    platform: &Platform,
    session: &Session,
    post_id: &str,
    reason: &str,
) -> Result<Report, ClientError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ClientError::InvalidInput(
            "report reason must not be blank".to_string(),
        ));
    }
    let record = NewReport {
        post_id: post_id.to_string(),
        reporter_id: session.user_id.clone(),
        reason: reason.to_string(),
    };
    let mut rows: Vec<Report> = platform.insert("reports", &record, Some(session)).await?;
    if rows.is_empty() {
        return Err(ClientError::NotFound);
    }
    Ok(rows.remove(0))
}

/// Full-text-ish search over post content, newest first.
pub async fn search_posts(
    platform: &Platform,
    viewer: Option<&Session>,
    query: &str,
    limit: usize,
) -> Result<Vec<PostView>, ClientError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(vec![]);
    }
    let pairs = [
        ("select", POST_VIEW_COLUMNS.to_string()),
        ("content", format!("ilike.*{}*", query)),
        ("order", "created_at.desc".to_string()),
        ("limit", limit.to_string()),
    ];
    platform.select("posts", &pairs, viewer).await
}

/// The three toggle controllers for one rendered post, seeded from its
/// snapshot fields. Dropped when the post leaves the rendered set.
pub struct PostInteractions<B> {
    post_id: String,
    pub like: ToggleController<B>,
    pub bookmark: ToggleController<B>,
    pub retweet: ToggleController<B>,
}

impl<B: ToggleBackend> PostInteractions<B> {
    pub fn seed(backend: Arc<B>, post: &PostView) -> Self {
        Self {
            post_id: post.id.clone(),
            like: ToggleController::new(
                backend.clone(),
                InteractionKind::Like,
                &post.id,
                post.liked_by_user,
                post.likes_count,
            ),
            bookmark: ToggleController::new(
                backend.clone(),
                InteractionKind::Bookmark,
                &post.id,
                post.bookmarked_by_user,
                post.bookmarks_count,
            ),
            retweet: ToggleController::new(
                backend,
                InteractionKind::Retweet,
                &post.id,
                post.retweeted_by_user,
                post.retweets_count,
            ),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn controller(&self, kind: InteractionKind) -> &ToggleController<B> {
        match kind {
            InteractionKind::Like => &self.like,
            InteractionKind::Bookmark => &self.bookmark,
            InteractionKind::Retweet => &self.retweet,
        }
    }

    /// Route an authoritative change-feed snapshot to its controller.
    /// Events for other posts are ignored.
    pub async fn apply_event(&self, event: &InteractionEvent) {
        if event.post_id != self.post_id {
            return;
        }
        self.controller(event.kind)
            .apply_snapshot(event.active, event.count)
            .await;
    }
}
