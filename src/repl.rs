//! Interactive command parsing for the terminal front end.
//!
//! Plain lines are chat input. A trailing backslash continues the message on
//! the next line, the terminal stand-in for Shift+Enter. Lines starting with
//! `/` are session commands.

use crate::session::ConversationId;

pub const HELP: &str = "\
commands:
  /new             start a new conversation
  /list            list conversations
  /select <id>     switch to a conversation
  /delete <id>     delete a conversation (the last one is kept)
  /clear           clear the active conversation
  /copy <index>    copy an assistant reply to the clipboard
  /theme           toggle dark/light palette
  /health          check the backend proxy
  /help            show this help
  /quit            exit
end a line with \\ to continue the message on the next line";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    New,
    List,
    Select(ConversationId),
    Delete(ConversationId),
    Clear,
    Copy(usize),
    Theme,
    Health,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("/{command} expects a number, got {value:?}")]
    BadArgument { command: &'static str, value: String },
}

/// Parse one complete input. Blank input yields `None`.
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Some(ReplCommand::Send(line.to_owned())));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match name {
        "new" => ReplCommand::New,
        "list" | "ls" => ReplCommand::List,
        "select" | "s" => ReplCommand::Select(ConversationId(number("select", arg)?)),
        "delete" | "rm" => ReplCommand::Delete(ConversationId(number("delete", arg)?)),
        "clear" => ReplCommand::Clear,
        "copy" => ReplCommand::Copy(number("copy", arg)?),
        "theme" => ReplCommand::Theme,
        "health" => ReplCommand::Health,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(command: &'static str, arg: Option<&str>) -> Result<T, ParseError> {
    let raw = arg.ok_or(ParseError::MissingArgument(command))?;
    raw.parse::<T>()
        .map_err(|_| ParseError::BadArgument { command, value: raw.to_owned() })
}

/// Joins backslash-continued lines into one message.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    /// Feed one raw line. Returns the complete input once a line without a
    /// trailing backslash arrives.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(continued) = line.strip_suffix('\\') {
            self.pending.push_str(continued);
            self.pending.push('\n');
            return None;
        }
        self.pending.push_str(line);
        Some(std::mem::take(&mut self.pending))
    }

    #[must_use]
    pub fn is_continuing(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;
