//! Session state container and its synchronous mutations.
//!
//! DESIGN
//! ======
//! `SessionState` owns every conversation plus transient UI state. All
//! mutations are plain `&mut self` methods so the bookkeeping rules can be
//! tested without a runtime; the async `Session` handle wraps it in a lock
//! and drives the network half of a turn.
//!
//! A turn is split in two: `begin_turn` records the user message and sets
//! the pending flag, `complete_turn` appends the reply (or error) to the
//! conversation the turn started in. The lock is not held in between.

use std::fmt;

use crate::theme::Theme;
use crate::transport::{ChatReply, Message, TransportError};

pub const PLACEHOLDER_NAME: &str = "New Chat";
pub const INITIAL_STATUS: &str = "Loading...";
const TITLE_CHARS: usize = 30;
const TITLE_ELLIPSIS: &str = "...";

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named, ordered thread of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    fn new(id: ConversationId) -> Self {
        Self { id, name: PLACEHOLDER_NAME.to_owned(), messages: Vec::new() }
    }

    #[must_use]
    pub fn has_placeholder_name(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }
}

/// Conversation title derived from the first user message.
#[must_use]
pub fn title_from(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_CHARS).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}

/// Assistant-visible text for a failed turn.
#[must_use]
pub fn error_reply(err: &TransportError) -> String {
    format!("Error: {err}. Make sure the Claude API is properly configured.")
}

// =============================================================================
// TURNS
// =============================================================================

/// A turn in flight: the user message is already recorded.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub conversation_id: ConversationId,
    pub user_text: String,
    /// Full ordered history sent to the model, ending with the user turn.
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, or another turn was already pending.
    Skipped,
    /// The assistant reply was appended.
    Completed,
    /// An error message was appended in place of the reply.
    Failed,
    /// The conversation was deleted before the reply arrived.
    Orphaned,
}

// =============================================================================
// SESSION STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct SessionState {
    conversations: Vec<Conversation>,
    active_id: ConversationId,
    last_id: u64,
    pending: bool,
    input: String,
    copied_index: Option<usize>,
    status: String,
    theme: Theme,
    revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// One empty placeholder conversation, active, with id 1.
    #[must_use]
    pub fn new() -> Self {
        let first = ConversationId(1);
        Self {
            conversations: vec![Conversation::new(first)],
            active_id: first,
            last_id: first.0,
            pending: false,
            input: String::new(),
            copied_index: None,
            status: INITIAL_STATUS.to_owned(),
            theme: Theme::default(),
            revision: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn active_id(&self) -> ConversationId {
        self.active_id
    }

    /// The active conversation. The collection is never empty and the
    /// active id always exists.
    #[must_use]
    pub fn active(&self) -> &Conversation {
        self.conversation(self.active_id).unwrap_or(&self.conversations[0])
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn copied_index(&self) -> Option<usize> {
        self.copied_index
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Incremented on every mutation published by `Session`.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }

    // -------------------------------------------------------------------------
    // Turn lifecycle
    // -------------------------------------------------------------------------

    /// Record the user message and mark the session pending.
    ///
    /// Returns `None` when `text` is blank or a turn is already pending.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() || self.pending {
            return None;
        }

        let conversation_id = self.active_id;
        let conversation = self.conversation_mut(conversation_id)?;
        conversation.messages.push(Message::user(text));
        let history = conversation.messages.clone();

        self.input.clear();
        self.pending = true;

        Some(PendingTurn { conversation_id, user_text: text.to_owned(), history })
    }

    /// Append the reply (or an error message) to the turn's conversation and
    /// clear the pending flag.
    pub fn complete_turn(&mut self, turn: &PendingTurn, result: Result<ChatReply, TransportError>) -> TurnOutcome {
        let outcome = match self.conversation_mut(turn.conversation_id) {
            None => TurnOutcome::Orphaned,
            Some(conversation) => match result {
                Ok(reply) => {
                    conversation.messages.push(Message::assistant(reply.content));
                    if conversation.has_placeholder_name() {
                        conversation.name = title_from(&turn.user_text);
                    }
                    TurnOutcome::Completed
                }
                Err(err) => {
                    conversation.messages.push(Message::assistant(error_reply(&err)));
                    TurnOutcome::Failed
                }
            },
        };
        self.pending = false;
        outcome
    }

    // -------------------------------------------------------------------------
    // Conversation bookkeeping
    // -------------------------------------------------------------------------

    /// Append an empty conversation and make it active.
    pub fn new_conversation(&mut self) -> ConversationId {
        let max_existing = self.conversations.iter().map(|c| c.id.0).max().unwrap_or(0);
        let id = ConversationId(max_existing.max(self.last_id) + 1);
        self.last_id = id.0;
        self.conversations.push(Conversation::new(id));
        self.active_id = id;
        self.copied_index = None;
        id
    }

    /// Remove a conversation. The last remaining one cannot be deleted.
    ///
    /// Returns `true` if a conversation was removed.
    pub fn delete_conversation(&mut self, id: ConversationId) -> bool {
        if self.conversations.len() <= 1 {
            return false;
        }
        let Some(pos) = self.conversations.iter().position(|c| c.id == id) else {
            return false;
        };
        self.conversations.remove(pos);
        if self.active_id == id {
            self.active_id = self.conversations[0].id;
            self.copied_index = None;
        }
        true
    }

    /// Switch the active conversation. Unknown ids are ignored.
    pub fn select_conversation(&mut self, id: ConversationId) -> bool {
        if self.conversation(id).is_none() {
            return false;
        }
        if self.active_id != id {
            self.active_id = id;
            self.copied_index = None;
        }
        true
    }

    /// Empty the active conversation and restore the placeholder name.
    pub fn clear_active(&mut self) {
        let id = self.active_id;
        if let Some(conversation) = self.conversation_mut(id) {
            conversation.messages.clear();
            conversation.name = PLACEHOLDER_NAME.to_owned();
        }
        self.copied_index = None;
    }

    // -------------------------------------------------------------------------
    // Transient UI state
    // -------------------------------------------------------------------------

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn set_copied_index(&mut self, index: Option<usize>) {
        self.copied_index = index;
    }

    fn conversation_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;
