//! Transport: the boundary to the backend proxy.
//!
//! DESIGN
//! ======
//! Two operations, liveness and chat, behind the `ChatTransport` trait.
//! `ProxyClient` is the reqwest implementation. One round trip per call:
//! no retries, no caching, no auth, no cancellation.

pub mod proxy;
pub mod types;

pub use proxy::ProxyClient;
pub use types::{ChatReply, ChatRequest, ChatTransport, HealthStatus, Message, Role, TransportError};
