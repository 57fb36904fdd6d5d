pub mod controller;

pub use controller::{ToggleController, ToggleOutcome};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::session::Session;

/// One toggleable relation between a viewer and a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Bookmark,
    Retweet,
}

impl InteractionKind {
    /// Server-side toggle procedure for this kind.
    pub fn rpc_function(&self) -> &'static str {
        match self {
            InteractionKind::Like => "toggle_like",
            InteractionKind::Bookmark => "toggle_bookmark",
            InteractionKind::Retweet => "toggle_retweet",
        }
    }

    /// Kinds that refuse an anonymous toggle before issuing a request.
    /// Like and retweet attempts are sent anyway and fail server-side.
    pub fn requires_session(&self) -> bool {
        matches!(self, InteractionKind::Bookmark)
    }
}

/// Boolean/count pair for one interaction kind on one post, plus the
/// in-flight guard. The count caches a server-computed aggregate and is
/// never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    pub active: bool,
    pub count: usize,
    pub pending: bool,
}

impl InteractionState {
    pub fn new(active: bool, count: usize) -> Self {
        Self {
            active,
            count,
            pending: false,
        }
    }
}

/// Wire response of a toggle procedure. Fields present in the response are
/// authoritative and overwrite the optimistic guess; an absent field leaves
/// the local value standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ToggleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// The one backend operation the controller needs: flip `kind` for
/// `entity_id` on behalf of the viewer and return the server-confirmed
/// state.
#[async_trait]
pub trait ToggleBackend: Send + Sync {
    async fn toggle(
        &self,
        kind: InteractionKind,
        entity_id: &str,
        viewer: Option<&Session>,
    ) -> Result<ToggleOutput, ClientError>;
}
