use super::*;
use crate::transport::ChatReply;

fn rendered(view: TerminalView<Vec<u8>>) -> String {
    String::from_utf8(view.into_inner()).unwrap()
}

fn exchange(state: &mut SessionState, question: &str, answer: &str) {
    let turn = state.begin_turn(question).unwrap();
    state.bump_revision();
    state.complete_turn(&turn, Ok(ChatReply { content: answer.into() }));
    state.bump_revision();
}

#[test]
fn first_render_prints_header_and_status() {
    let state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());
    view.render(&state).unwrap();

    let out = rendered(view);
    assert!(out.contains("status: Loading..."));
    assert!(out.contains("── New Chat (#1) ──"));
}

#[test]
fn only_new_messages_are_printed() {
    let mut state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());
    view.render(&state).unwrap();

    exchange(&mut state, "first", "one");
    view.render(&state).unwrap();
    exchange(&mut state, "second", "two");
    view.render(&state).unwrap();

    let out = rendered(view);
    assert_eq!(out.matches("you ›").count(), 2);
    assert_eq!(out.matches("first").count(), 1);
    assert!(out.contains("[3] raslan ›"));
}

#[test]
fn stale_revision_is_ignored() {
    let mut state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());
    view.render(&state).unwrap();

    let stale = state.clone();
    exchange(&mut state, "fresh", "reply");
    view.render(&state).unwrap();
    view.render(&stale).unwrap();

    let out = rendered(view);
    assert_eq!(out.matches("── New Chat (#1) ──").count(), 1);
}

#[test]
fn pending_prints_thinking_once() {
    let mut state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());

    state.begin_turn("hello").unwrap();
    state.bump_revision();
    view.render(&state).unwrap();
    state.set_input("typing");
    state.bump_revision();
    view.render(&state).unwrap();

    assert_eq!(rendered(view).matches("Raslan is thinking...").count(), 1);
}

#[test]
fn switching_conversation_reprints_header() {
    let mut state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());
    exchange(&mut state, "keep", "kept");
    view.render(&state).unwrap();

    state.new_conversation();
    state.bump_revision();
    view.render(&state).unwrap();
    state.select_conversation(ConversationId(1));
    state.bump_revision();
    view.render(&state).unwrap();

    let out = rendered(view);
    assert!(out.contains("── New Chat (#2) ──"));
    assert_eq!(out.matches("── keep... (#1) ──").count(), 2);
    assert_eq!(out.matches("kept").count(), 2);
}

#[test]
fn theme_toggle_is_announced() {
    let mut state = SessionState::new();
    let mut view = TerminalView::new(Vec::new());
    view.render(&state).unwrap();

    state.toggle_theme();
    state.bump_revision();
    view.render(&state).unwrap();

    assert!(rendered(view).contains("theme: light"));
}

#[test]
fn conversation_list_marks_active() {
    let mut state = SessionState::new();
    exchange(&mut state, "named chat", "ok");
    state.new_conversation();

    let list = format_conversation_list(&state);
    let lines: Vec<&str> = list.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("  #1"));
    assert!(lines[0].contains("named chat... (2 messages)"));
    assert!(lines[1].starts_with("* #2"));
    assert!(lines[1].contains("New Chat (0 messages)"));
}
