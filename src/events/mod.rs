//! # Events emitted by the sequencer.
//!
//! - [`Event`] a single structured record (kind, timestamp, optional metadata)
//! - [`EventKind`] what happened
//! - [`Level`] severity (`Info` or `Error`)
//!
//! Events are handed synchronously to the configured [`Sink`](crate::Sink).

mod event;

pub use event::{Event, EventKind, Level};
