use event_emitter_rs::EventEmitter;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::interactions::InteractionKind;

/// An authoritative per-post interaction snapshot delivered by the
/// platform's change feed. Carries the same weight as a toggle response:
/// last write wins by arrival time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionEvent {
    pub post_id: String,
    pub kind: InteractionKind,
    pub active: bool,
    pub count: usize,
}

/// Event name the change-feed adapter publishes interaction snapshots under.
pub const INTERACTION_EVENT: &str = "interaction.snapshot";

// Use lazy_static! because the size of EventEmitter is not known at compile time
lazy_static! {
    pub static ref EVENT_EMITTER: RwLock<EventEmitter> = RwLock::new(EventEmitter::new());
}

/// Fan an interaction snapshot out to every registered listener.
pub async fn publish_interaction(event: InteractionEvent) {
    EVENT_EMITTER.write().await.emit(INTERACTION_EVENT, event);
}

/// Register a listener for interaction snapshots; returns the listener id.
pub async fn on_interaction<F>(listener: F) -> String
where
    F: Fn(InteractionEvent) + Send + Sync + 'static,
{
    EVENT_EMITTER.write().await.on(INTERACTION_EVENT, listener)
}

pub async fn remove_interaction_listener(id: &str) {
    EVENT_EMITTER.write().await.remove_listener(id);
}
