//! # shutdown-sequencer
//!
//! **shutdown-sequencer** drives a process through an ordered, bounded-latency
//! termination procedure.
//!
//! Components register cleanup steps; the sequence runs them once, in
//! registration order, under a single global deadline, and then always invokes
//! an exit action, whether the steps completed, the deadline expired or an
//! operator signal started it all.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   StepRef    │   │   StepRef    │   │   StepRef    │
//!     │ (flush db)   │   │ (drain http) │   │ (close logs) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Builder ──build()──► Arc<Sequence>                               │
//! │  - Config (delay, timeout)                                        │
//! │  - Sink (structured events)                                       │
//! │  - ExitAction (process exit by default)                           │
//! │  - append-only step list (add_step / add_steps)                   │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ start(code)                                      │ signal set
//!        ▼                                                  ▼
//! ┌───────────────────────────┐               ┌───────────────────────────┐
//! │  guard + done latch       │◄── start(0) ──│  signal watcher           │
//! │  delay, StepContext       │               │  (first delivery only)    │
//! └──────┬────────────────────┘               └───────────────────────────┘
//!        │ spawn
//!        ▼
//! ┌───────────────────────────┐
//! │  step loop                │──► Sink: StepStarting / StepSucceeded /
//! │  (sequential, post-step   │          StepFailed / RemainingAborted
//! │   deadline check)         │
//! └──────┬────────────────────┘
//!        │ cancel ctx (or deadline fires)
//!        ▼
//!   SequenceFinished ──► ExitAction(code)
//! ```
//!
//! ### Lifecycle
//! ```text
//! start(code)
//!   ├─► already done?  ─► RequestedAgain (error), no-op
//!   ├─► sleep(delay)
//!   ├─► deadline = now + timeout
//!   ├─► step loop:   for step in steps { run; log; if ctx done && more { abort } }
//!   ├─► wait min(step loop finished, deadline)
//!   └─► exit(code)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                       |
//! |-------------------|---------------------------------------------------------------|------------------------------------------|
//! | **Sequencing**    | Build, extend and start a shutdown sequence.                  | [`Builder`], [`Sequence`], [`ExitAction`]|
//! | **Steps**         | Define steps as trait impls or closures.                      | [`Step`], [`StepFn`], [`StepRef`]        |
//! | **Deadlines**     | Shared deadline/cancellation handed to every step.            | [`StepContext`]                          |
//! | **Signals**       | OS signals that trigger `start(0)`.                           | [`Signal`]                               |
//! | **Logging**       | Structured events delivered to a sink.                        | [`Sink`], [`Event`], [`TracingSink`]     |
//! | **Errors**        | Typed errors for building, configuration and steps.           | [`BuildError`], [`StepError`]            |
//! | **Configuration** | Timing settings, typed or from the environment.               | [`Config`]                               |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shutdown_sequencer::{Sequence, StepContext, StepFn, StepRef, TracingSink};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let drain: StepRef = StepFn::arc(|ctx: StepContext| async move {
//!         tokio::select! {
//!             _ = tokio::time::sleep(Duration::from_millis(10)) => {}
//!             _ = ctx.done() => {}
//!         }
//!         Ok(())
//!     });
//!
//!     let seq = Sequence::builder()
//!         .with_sink(Arc::new(TracingSink::new()))
//!         .with_timeout(Duration::from_secs(5))
//!         .with_step(drain)
//!         // Tests and embedders replace the default `std::process::exit`.
//!         .with_exit_action(|code| println!("exit({code})"))
//!         .build()?;
//!
//!     seq.start(0).await;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod signals;
mod sinks;
mod steps;

// ---- Public re-exports ----

pub use crate::core::{Builder, ExitAction, Sequence};
pub use config::{Config, ENV_DELAY_MS, ENV_TIMEOUT_MS};
pub use error::{BuildError, ConfigError, ContextError, StepError};
pub use events::{Event, EventKind, Level};
pub use signals::Signal;
pub use sinks::{Sink, TracingSink};
pub use steps::{Step, StepContext, StepFn, StepRef};

// Optional: expose a simple built-in stdout sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sinks::LogWriter;
