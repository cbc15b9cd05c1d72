//! Terminal view: turns session snapshots into transcript output.
//!
//! The view remembers what it already printed and only writes the delta, so
//! it can be driven directly by a session subscription. Switching or
//! clearing the active conversation reprints it from the top.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::render::format_message;
use crate::session::{ConversationId, SessionState};
use crate::theme::Theme;
use crate::transport::{Message, Role};

pub struct TerminalView<W: Write> {
    out: W,
    last_revision: u64,
    conversation: Option<ConversationId>,
    rendered: usize,
    pending: bool,
    theme: Theme,
    status: String,
    copied: Option<usize>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_revision: 0,
            conversation: None,
            rendered: 0,
            pending: false,
            theme: Theme::default(),
            status: String::new(),
            copied: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print whatever changed since the last rendered snapshot. Stale
    /// snapshots (older revisions) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn render(&mut self, state: &SessionState) -> io::Result<()> {
        if self.conversation.is_some() && state.revision() <= self.last_revision {
            return Ok(());
        }
        self.last_revision = state.revision();
        let palette = state.theme().palette();

        if state.theme() != self.theme {
            self.theme = state.theme();
            writeln!(self.out, "{}theme: {}{}", palette.muted, self.theme.label(), palette.reset)?;
        }

        if state.status() != self.status {
            self.status = state.status().to_owned();
            writeln!(self.out, "{}status: {}{}", palette.muted, self.status, palette.reset)?;
        }

        let active = state.active();
        let switched = self.conversation != Some(active.id);
        if switched || active.messages.len() < self.rendered {
            writeln!(self.out, "{}── {} (#{}) ──{}", palette.accent, active.name, active.id, palette.reset)?;
            self.conversation = Some(active.id);
            self.rendered = 0;
        }

        for (index, message) in active.messages.iter().enumerate().skip(self.rendered) {
            write_message(&mut self.out, index, message, self.theme)?;
        }
        self.rendered = active.messages.len();

        if state.is_pending() && !self.pending {
            writeln!(self.out, "{}Raslan is thinking...{}", palette.muted, palette.reset)?;
        }
        self.pending = state.is_pending();

        if state.copied_index() != self.copied {
            self.copied = state.copied_index();
            if let Some(index) = self.copied {
                writeln!(self.out, "{}copied [{index}]{}", palette.muted, palette.reset)?;
            }
        }

        self.out.flush()
    }
}

fn write_message<W: Write>(out: &mut W, index: usize, message: &Message, theme: Theme) -> io::Result<()> {
    let palette = theme.palette();
    match message.role {
        Role::User => writeln!(out, "{}[{index}] you ›{} {}", palette.user, palette.reset, message.content),
        Role::Assistant => writeln!(
            out,
            "{}[{index}] raslan ›{} {}",
            palette.accent,
            palette.reset,
            format_message(&message.content, theme)
        ),
    }
}

/// Sidebar equivalent: one line per conversation, active one marked.
#[must_use]
pub fn format_conversation_list(state: &SessionState) -> String {
    let mut out = String::new();
    for conversation in state.conversations() {
        let marker = if conversation.id == state.active_id() { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} #{:<3} {} ({} messages)",
            conversation.id,
            conversation.name,
            conversation.messages.len()
        );
    }
    out
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
