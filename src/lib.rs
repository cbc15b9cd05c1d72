//! Ask Raslan: a terminal chat client for a hosted model behind an HTTP
//! proxy.
//!
//! `transport` talks to the proxy, `session` owns conversations and drives
//! each turn, `render` splits replies into text and code segments, and
//! `view` prints session snapshots to the terminal.

pub mod clipboard;
pub mod config;
pub mod render;
pub mod repl;
pub mod session;
pub mod theme;
pub mod transport;
pub mod view;
