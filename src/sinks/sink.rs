//! # Core sink trait
//!
//! `Sink` is the logging destination of a sequence. Unlike a fan-out
//! subscriber, it is called **inline** from the emitting task, so records
//! arrive in emission order and none are lost when the exit action
//! terminates the process right after `SequenceFinished`.
//!
//! ## Contract
//! - `on_event` must be safe to call concurrently (the signal watcher, the
//!   caller of `start` and the step loop all emit).
//! - It should return quickly; slow I/O delays the sequence itself.
//! - A panic inside `on_event` is caught and the event is dropped.
//!
//! ## Example (skeleton)
//! ```rust
//! use shutdown_sequencer::{Event, Sink};
//!
//! struct Audit;
//!
//! impl Sink for Audit {
//!     fn on_event(&self, ev: &Event) {
//!         eprintln!("audit: {ev}");
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use crate::events::Event;

/// Destination for structured sequencer events.
pub trait Sink: Send + Sync + 'static {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
