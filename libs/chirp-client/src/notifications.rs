use chirp_lexicon::notification::{LikeRow, NotificationReason, NotificationView};

use crate::error::ClientError;
use crate::platform::Platform;
use crate::session::Session;

const EXCERPT_CHARS: usize = 140;

/// Likes on posts authored by the viewer, newest first.
pub async fn fetch_notifications(
    platform: &Platform,
    session: &Session,
) -> Result<Vec<NotificationView>, ClientError> {
    let pairs = [
        (
            "select",
            "id,created_at,profiles(username,avatar_url),posts(content,author_id)".to_string(),
        ),
        ("posts.author_id", format!("eq.{}", session.user_id)),
        ("order", "created_at.desc".to_string()),
    ];
    let rows: Vec<LikeRow> = platform.select("likes", &pairs, Some(session)).await?;
    Ok(render_rows(rows))
}

/// Shape raw like rows for display. Rows whose embeds were filtered away by
/// row-level security arrive with null joins and are dropped.
pub fn render_rows(rows: Vec<LikeRow>) -> Vec<NotificationView> {
    rows.into_iter()
        .filter_map(|row| {
            let actor = row.profiles?;
            let subject = row.posts?;
            Some(NotificationView {
                id: row.id,
                reason: NotificationReason::Like,
                actor_username: actor.username,
                post_excerpt: excerpt(&subject.content),
                created_at: row.created_at,
            })
        })
        .collect()
}

fn excerpt(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    let mut clipped: String = content.chars().take(EXCERPT_CHARS).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_lexicon::notification::{LikeRowActor, LikeRowSubject};

    fn row(id: &str, username: Option<&str>, content: Option<&str>) -> LikeRow {
        LikeRow {
            id: id.to_string(),
            created_at: "2024-05-03T08:00:00Z".parse().unwrap(),
            profiles: username.map(|username| LikeRowActor {
                username: username.to_string(),
                avatar_url: None,
            }),
            posts: content.map(|content| LikeRowSubject {
                content: content.to_string(),
                author_id: "viewer".to_string(),
            }),
        }
    }

    #[test]
    fn test_render_rows_drops_filtered_embeds() {
        let rendered = render_rows(vec![
            row("l1", Some("ana"), Some("hola")),
            row("l2", None, Some("sin actor")),
            row("l3", Some("luis"), None),
        ]);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].id, "l1");
        assert_eq!(rendered[0].actor_username, "ana");
        assert_eq!(rendered[0].reason, NotificationReason::Like);
        assert_eq!(rendered[0].post_excerpt, "hola");
    }

    #[test]
    fn test_excerpt_clips_long_content() {
        let long = "x".repeat(200);
        let clipped = excerpt(&long);
        assert_eq!(clipped.chars().count(), EXCERPT_CHARS + 1);
        assert!(clipped.ends_with('…'));

        assert_eq!(excerpt("corto"), "corto");
    }
}
