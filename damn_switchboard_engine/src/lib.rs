//! damn_switchboard_engine
//!
//! Stateful layer around `damn_switchboard_core`.
//!
//! Responsibilities:
//! - normalize raw inbound messages (adapter)
//! - own the append-only message buffer and keep ids unique
//! - stamp decision ids and timestamps
//! - invoke the core decision pipeline
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no policy logic (lives in core)

pub mod adapter;
pub mod switchboard;

pub use adapter::{messages_from_inbox, normalize, IngestContext, RawMessage};

pub use switchboard::{utc_now, Switchboard};
