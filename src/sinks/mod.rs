//! # Logging sinks for the sequencer.
//!
//! This module provides the [`Sink`] trait and built-in implementations
//! receiving the [`Event`]s of a sequence.
//!
//! ## Architecture
//! ```text
//! Emitters:                          Sink (one per sequence):
//!   Builder::build   ──┐
//!   signal watcher   ──┼──► publish(&dyn Sink, Event) ──► Sink::on_event(&Event)
//!   Sequence::start  ──┤      (inline, panic-isolated)        │
//!   step loop        ──┘                               ┌──────┴──────┐
//!                                                      ▼             ▼
//!                                                TracingSink     LogWriter / custom
//! ```
//!
//! ## Built-in sinks
//! - [`TracingSink`] forwards to the `tracing` macros (production default)
//! - `LogWriter` prints one line per event (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod sink;
mod trace;

use std::panic::{AssertUnwindSafe, catch_unwind};

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use sink::Sink;
pub use trace::TracingSink;

use crate::events::Event;

/// Hands `event` to `sink`, dropping it if the sink panics.
pub(crate) fn publish(sink: &dyn Sink, event: Event) {
    let _ = catch_unwind(AssertUnwindSafe(|| sink.on_event(&event)));
}
