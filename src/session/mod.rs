//! Conversation session manager.
//!
//! DESIGN
//! ======
//! `Session` is a cheap-to-clone handle around shared state: the
//! `SessionState` store, the transport, and the subscriber list. Every
//! mutation bumps the state revision, snapshots it under the write lock, and
//! publishes the snapshot to subscribers after the lock is released (the
//! render step). Operations that leave the state untouched publish nothing.
//!
//! `send_message` never holds the lock across the network await. While a
//! turn is pending the pending flag blocks a second turn, but switching,
//! deleting, clearing, copying and theme changes keep working.

pub mod state;

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clipboard::{COPY_RESET_DELAY, ClipboardError, ClipboardSink, ResetTimer};
use crate::config::RaslanConfig;
use crate::theme::Theme;
use crate::transport::{ChatRequest, ChatTransport, Message, Role};

pub use state::{Conversation, ConversationId, PendingTurn, SessionState, TurnOutcome};

/// Render callback invoked with a state snapshot after each mutation.
pub type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<SessionState>,
    transport: Arc<dyn ChatTransport>,
    model: String,
    max_tokens: u32,
    listeners: RwLock<Listeners>,
    copy_reset: Mutex<ResetTimer>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Session {
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, config: &RaslanConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionState::new()),
                transport,
                model: config.model.clone(),
                max_tokens: config.max_tokens,
                listeners: RwLock::new(Listeners::default()),
                copy_reset: Mutex::new(ResetTimer::default()),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Register a render callback. It is called after every mutation.
    pub async fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let mut listeners = self.inner.listeners.write().await;
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    pub async fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.write().await.entries.retain(|(entry, _)| *entry != id);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub async fn snapshot(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    pub async fn active_messages(&self) -> Vec<Message> {
        self.inner.state.read().await.active().messages.clone()
    }

    pub async fn is_pending(&self) -> bool {
        self.inner.state.read().await.is_pending()
    }

    // -------------------------------------------------------------------------
    // Turns
    // -------------------------------------------------------------------------

    /// Send `text` as a user turn in the active conversation and append the
    /// model's reply, or an error message when the call fails.
    pub async fn send_message(&self, text: &str) -> TurnOutcome {
        match self.begin_turn(text).await {
            Some(turn) => self.finish_turn(turn).await,
            None => TurnOutcome::Skipped,
        }
    }

    /// Start a turn with `text` and run the round trip on a spawned task.
    ///
    /// The pending flag is already set when this returns, so a submit that
    /// follows immediately is skipped instead of racing the first one.
    /// Returns `None` when the turn was skipped.
    pub async fn submit(&self, text: &str) -> Option<JoinHandle<TurnOutcome>> {
        let turn = self.begin_turn(text).await?;
        let session = self.clone();
        Some(tokio::spawn(async move { session.finish_turn(turn).await }))
    }

    async fn begin_turn(&self, text: &str) -> Option<PendingTurn> {
        let turn = self.update_if(|state| state.begin_turn(text), Option::is_some).await;
        if turn.is_none() {
            debug!("send skipped: blank input or turn pending");
        }
        turn
    }

    async fn finish_turn(&self, turn: PendingTurn) -> TurnOutcome {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: self.inner.max_tokens,
            messages: turn.history.clone(),
        };
        let result = self.inner.transport.send_chat(&request).await;
        if let Err(e) = &result {
            warn!(conversation = %turn.conversation_id, error = %e, "chat request failed");
        }

        let outcome = self.update(|state| state.complete_turn(&turn, result)).await;
        match outcome {
            TurnOutcome::Orphaned => {
                warn!(conversation = %turn.conversation_id, "conversation deleted before reply; reply dropped");
            }
            _ => info!(conversation = %turn.conversation_id, ?outcome, turns = turn.history.len() + 1, "turn finished"),
        }
        outcome
    }

    /// Send whatever is currently in the input buffer.
    pub async fn send_input(&self) -> TurnOutcome {
        let text = self.inner.state.read().await.input().to_owned();
        self.send_message(&text).await
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.set_input(text)).await;
    }

    // -------------------------------------------------------------------------
    // Conversation bookkeeping
    // -------------------------------------------------------------------------

    pub async fn new_conversation(&self) -> ConversationId {
        let id = self.update(SessionState::new_conversation).await;
        debug!(conversation = %id, "conversation created");
        id
    }

    /// Returns `true` if the conversation was removed.
    pub async fn delete_conversation(&self, id: ConversationId) -> bool {
        let removed = self.update_if(|state| state.delete_conversation(id), |removed| *removed).await;
        debug!(conversation = %id, removed, "delete conversation");
        removed
    }

    /// Returns `true` if `id` exists and is now active.
    pub async fn select_conversation(&self, id: ConversationId) -> bool {
        self.update_if(|state| state.select_conversation(id), |found| *found).await
    }

    pub async fn clear_active_conversation(&self) {
        self.update(SessionState::clear_active).await;
    }

    // -------------------------------------------------------------------------
    // Status, theme, clipboard
    // -------------------------------------------------------------------------

    /// Query proxy liveness and store the result as the status line.
    pub async fn check_health(&self) -> String {
        let status = match self.inner.transport.check_health().await {
            Ok(health) => health.status,
            Err(e) => {
                warn!(error = %e, "health check failed");
                format!("Error: {e}")
            }
        };
        let line = status.clone();
        self.update(|state| state.set_status(line)).await;
        status
    }

    pub async fn toggle_theme(&self) -> Theme {
        self.update(SessionState::toggle_theme).await
    }

    /// Copy an assistant message of the active conversation and show the
    /// copied marker for [`COPY_RESET_DELAY`].
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range, names a user message,
    /// or the clipboard write fails.
    pub async fn copy_message(&self, index: usize, clipboard: &dyn ClipboardSink) -> Result<(), ClipboardError> {
        let content = {
            let state = self.inner.state.read().await;
            let message = state
                .active()
                .messages
                .get(index)
                .ok_or(ClipboardError::NoSuchMessage(index))?;
            if message.role != Role::Assistant {
                return Err(ClipboardError::NotAssistant(index));
            }
            message.content.clone()
        };

        clipboard.write_text(&content)?;
        self.update(|state| state.set_copied_index(Some(index))).await;

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner
            .copy_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .schedule(COPY_RESET_DELAY, async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let session = Session { inner };
                session
                    .update_if(
                        |state| {
                            let current = state.copied_index() == Some(index);
                            if current {
                                state.set_copied_index(None);
                            }
                            current
                        },
                        |reset| *reset,
                    )
                    .await;
            });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Store plumbing
    // -------------------------------------------------------------------------

    async fn update<R>(&self, mutate: impl FnOnce(&mut SessionState) -> R) -> R {
        self.update_if(mutate, |_| true).await
    }

    /// Apply `mutate`; bump the revision and publish only when `changed`
    /// says the result reflects a state change.
    async fn update_if<R>(
        &self,
        mutate: impl FnOnce(&mut SessionState) -> R,
        changed: impl FnOnce(&R) -> bool,
    ) -> R {
        let (result, snapshot) = {
            let mut state = self.inner.state.write().await;
            let result = mutate(&mut state);
            if !changed(&result) {
                return result;
            }
            state.bump_revision();
            (result, state.clone())
        };
        self.publish(&snapshot).await;
        result
    }

    async fn publish(&self, snapshot: &SessionState) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .await
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}
