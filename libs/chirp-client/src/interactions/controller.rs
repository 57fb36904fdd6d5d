use std::sync::Arc;
use tokio::sync::RwLock;

use super::{InteractionKind, InteractionState, ToggleBackend};
use crate::session::Session;

/// What a `toggle` call did. Backend failures are absorbed into `Reverted`;
/// the caller never sees the error because there is no caller-side recovery
/// beyond toggling again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Request succeeded; state carries any server corrections.
    Confirmed { active: bool, count: usize },
    /// Request failed; state is back to the pre-toggle snapshot.
    Reverted,
    /// A previous toggle on this controller is still in flight; no-op.
    Busy,
    /// Anonymous viewer on a kind that requires a session; no-op.
    SignInRequired,
}

/// Owns the interaction state for one kind on one post and reconciles it
/// against the backend toggle procedure.
///
/// The state moves optimistically before the request is issued, so the
/// rendered flag and count respond immediately; the server response (or an
/// externally delivered snapshot) overwrites the guess when it arrives, and
/// a failed request restores the pre-toggle snapshot wholesale.
pub struct ToggleController<B> {
    kind: InteractionKind,
    entity_id: String,
    backend: Arc<B>,
    state: RwLock<InteractionState>,
}

impl<B: ToggleBackend> ToggleController<B> {
    /// Seed from the entity's server-supplied snapshot.
    pub fn new(
        backend: Arc<B>,
        kind: InteractionKind,
        entity_id: &str,
        active: bool,
        count: usize,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.to_string(),
            backend,
            state: RwLock::new(InteractionState::new(active, count)),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub async fn state(&self) -> InteractionState {
        *self.state.read().await
    }

    /// Flip the interaction, optimistically first, then against the backend.
    ///
    /// At most one request per controller is ever in flight: a call landing
    /// in the pending window returns `Busy` without touching state. The
    /// count moves with the flag (+1 on activate, -1 floored at zero on
    /// deactivate) and both are restored together on failure. Response
    /// fields override the optimistic guess field by field; the pending
    /// guard is released on both paths.
    pub async fn toggle(&self, viewer: Option<&Session>) -> ToggleOutcome {
        if viewer.is_none() && self.kind.requires_session() {
            return ToggleOutcome::SignInRequired;
        }

        let snapshot = {
            let mut state = self.state.write().await;
            if state.pending {
                return ToggleOutcome::Busy;
            }
            let snapshot = (state.active, state.count);
            if state.active {
                state.count = state.count.saturating_sub(1);
            } else {
                state.count += 1;
            }
            state.active = !state.active;
            state.pending = true;
            snapshot
        };

        let result = self.backend.toggle(self.kind, &self.entity_id, viewer).await;

        let mut state = self.state.write().await;
        state.pending = false;
        match result {
            Ok(output) => {
                if let Some(active) = output.active {
                    state.active = active;
                }
                if let Some(count) = output.count {
                    state.count = count;
                }
                ToggleOutcome::Confirmed {
                    active: state.active,
                    count: state.count,
                }
            }
            Err(error) => {
                eprintln!(
                    "@LOG: ERROR: toggle {:?} on {} failed: {}",
                    self.kind, self.entity_id, error
                );
                let (active, count) = snapshot;
                state.active = active;
                state.count = count;
                ToggleOutcome::Reverted
            }
        }
    }

    /// Overwrite with an authoritative snapshot delivered outside the
    /// request/response cycle (the platform's change feed). Same priority as
    /// a response: last write wins by arrival time. The pending guard is
    /// untouched; an in-flight request still reconciles when it lands.
    pub async fn apply_snapshot(&self, active: bool, count: usize) {
        let mut state = self.state.write().await;
        state.active = active;
        state.count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::interactions::ToggleOutput;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{oneshot, Mutex};

    /// One scripted backend response per expected request, consumed in order.
    /// Gated variants park the request on a oneshot until the test releases
    /// it, which is how the pending window is held open deterministically.
    enum Scripted {
        Ok(ToggleOutput),
        Fail,
        OkAfter(oneshot::Receiver<()>, ToggleOutput),
        FailAfter(oneshot::Receiver<()>),
    }

    struct SpyBackend {
        requests: AtomicUsize,
        script: Mutex<Vec<Scripted>>,
    }

    impl SpyBackend {
        fn new(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                requests: AtomicUsize::new(0),
                script: Mutex::new(script),
            })
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToggleBackend for SpyBackend {
        async fn toggle(
            &self,
            _kind: InteractionKind,
            _entity_id: &str,
            _viewer: Option<&Session>,
        ) -> Result<ToggleOutput, ClientError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let step = self.script.lock().await.remove(0);
            match step {
                Scripted::Ok(output) => Ok(output),
                Scripted::Fail => Err(ClientError::Http(500, "boom".to_string())),
                Scripted::OkAfter(gate, output) => {
                    let _ = gate.await;
                    Ok(output)
                }
                Scripted::FailAfter(gate) => {
                    let _ = gate.await;
                    Err(ClientError::Http(500, "boom".to_string()))
                }
            }
        }
    }

    fn confirmed(active: bool, count: usize) -> ToggleOutput {
        ToggleOutput {
            active: Some(active),
            count: Some(count),
        }
    }

    fn session() -> Session {
        Session::new("viewer-1", "token-1")
    }

    #[actix_rt::test]
    async fn test_successful_like() {
        let backend = SpyBackend::new(vec![Scripted::Ok(confirmed(true, 1))]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 0);
        let viewer = session();

        let outcome = controller.toggle(Some(&viewer)).await;

        assert_eq!(
            outcome,
            ToggleOutcome::Confirmed {
                active: true,
                count: 1
            }
        );
        let state = controller.state().await;
        assert!(state.active && state.count == 1 && !state.pending);
        assert_eq!(backend.requests(), 1);
    }

    #[actix_rt::test]
    async fn test_optimistic_state_then_server_correction() {
        // Server reports more likes than the optimistic guess (concurrent
        // viewers); the response wins.
        let (release, gate) = oneshot::channel();
        let backend = SpyBackend::new(vec![Scripted::OkAfter(gate, confirmed(true, 9))]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 5);
        let viewer = session();

        let (outcome, _) = tokio::join!(controller.toggle(Some(&viewer)), async {
            // Runs once the toggle is parked on the gate: the optimistic
            // flip must already be visible.
            let state = controller.state().await;
            assert!(state.active);
            assert_eq!(state.count, 6);
            assert!(state.pending);
            release.send(()).unwrap();
        });

        assert_eq!(
            outcome,
            ToggleOutcome::Confirmed {
                active: true,
                count: 9
            }
        );
        assert_eq!(controller.state().await.count, 9);
    }

    #[actix_rt::test]
    async fn test_failed_unlike_rolls_back() {
        let backend = SpyBackend::new(vec![Scripted::Fail]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", true, 3);
        let viewer = session();

        let outcome = controller.toggle(Some(&viewer)).await;

        assert_eq!(outcome, ToggleOutcome::Reverted);
        let state = controller.state().await;
        assert!(state.active);
        assert_eq!(state.count, 3);
        assert!(!state.pending);
    }

    #[actix_rt::test]
    async fn test_double_click_issues_one_request() {
        let (release, gate) = oneshot::channel();
        let backend = SpyBackend::new(vec![Scripted::OkAfter(gate, confirmed(true, 1))]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 0);
        let viewer = session();

        let (first, _) = tokio::join!(controller.toggle(Some(&viewer)), async {
            let second = controller.toggle(Some(&viewer)).await;
            assert_eq!(second, ToggleOutcome::Busy);
            // The ignored call left the optimistic state alone.
            let state = controller.state().await;
            assert!(state.active);
            assert_eq!(state.count, 1);
            release.send(()).unwrap();
        });

        assert_eq!(
            first,
            ToggleOutcome::Confirmed {
                active: true,
                count: 1
            }
        );
        assert_eq!(backend.requests(), 1);
    }

    #[actix_rt::test]
    async fn test_count_floors_at_zero_on_deactivate() {
        // Deactivating with a stale zero count must not underflow; the empty
        // response leaves the optimistic value standing.
        let backend = SpyBackend::new(vec![Scripted::Ok(ToggleOutput::default())]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", true, 0);
        let viewer = session();

        let outcome = controller.toggle(Some(&viewer)).await;

        assert_eq!(
            outcome,
            ToggleOutcome::Confirmed {
                active: false,
                count: 0
            }
        );
    }

    #[actix_rt::test]
    async fn test_partial_response_applies_field_by_field() {
        let backend = SpyBackend::new(vec![Scripted::Ok(ToggleOutput {
            active: None,
            count: Some(7),
        })]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Retweet, "p1", false, 2);
        let viewer = session();

        let outcome = controller.toggle(Some(&viewer)).await;

        // Optimistic flag stands, count corrected.
        assert_eq!(
            outcome,
            ToggleOutcome::Confirmed {
                active: true,
                count: 7
            }
        );
    }

    #[actix_rt::test]
    async fn test_bookmark_rejects_anonymous_viewer() {
        let backend = SpyBackend::new(vec![]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Bookmark, "p1", false, 0);

        let outcome = controller.toggle(None).await;

        assert_eq!(outcome, ToggleOutcome::SignInRequired);
        let state = controller.state().await;
        assert!(!state.active && state.count == 0 && !state.pending);
        assert_eq!(backend.requests(), 0);
    }

    #[actix_rt::test]
    async fn test_anonymous_like_attempts_and_rolls_back() {
        // Likes are not checked client-side; the server rejects and the
        // optimistic state reverts.
        let backend = SpyBackend::new(vec![Scripted::Fail]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 4);

        let outcome = controller.toggle(None).await;

        assert_eq!(outcome, ToggleOutcome::Reverted);
        let state = controller.state().await;
        assert!(!state.active);
        assert_eq!(state.count, 4);
        assert_eq!(backend.requests(), 1);
    }

    #[actix_rt::test]
    async fn test_controller_reusable_after_failure() {
        let backend = SpyBackend::new(vec![Scripted::Fail, Scripted::Ok(confirmed(true, 1))]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 0);
        let viewer = session();

        assert_eq!(controller.toggle(Some(&viewer)).await, ToggleOutcome::Reverted);
        assert_eq!(
            controller.toggle(Some(&viewer)).await,
            ToggleOutcome::Confirmed {
                active: true,
                count: 1
            }
        );
        assert_eq!(backend.requests(), 2);
    }

    #[actix_rt::test]
    async fn test_external_snapshot_overrides_local_state() {
        let backend = SpyBackend::new(vec![Scripted::Ok(confirmed(false, 11))]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 5);
        let viewer = session();

        controller.apply_snapshot(true, 12).await;
        let state = controller.state().await;
        assert!(state.active);
        assert_eq!(state.count, 12);

        // A later toggle reconciles against the response as usual.
        let outcome = controller.toggle(Some(&viewer)).await;
        assert_eq!(
            outcome,
            ToggleOutcome::Confirmed {
                active: false,
                count: 11
            }
        );
    }

    #[actix_rt::test]
    async fn test_rollback_after_midflight_snapshot_is_last_write() {
        // A change-feed snapshot lands while the request is in flight, then
        // the request fails. Both sources are last-write-wins by arrival, so
        // the rollback (arriving later) stands until the next push.
        let (release, gate) = oneshot::channel();
        let backend = SpyBackend::new(vec![Scripted::FailAfter(gate)]);
        let controller =
            ToggleController::new(backend.clone(), InteractionKind::Like, "p1", false, 0);
        let viewer = session();

        let (outcome, _) = tokio::join!(controller.toggle(Some(&viewer)), async {
            controller.apply_snapshot(true, 9).await;
            release.send(()).unwrap();
        });

        assert_eq!(outcome, ToggleOutcome::Reverted);
        let state = controller.state().await;
        assert!(!state.active);
        assert_eq!(state.count, 0);
    }
}
