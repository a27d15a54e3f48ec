//! # LogWriter: simple event printer
//!
//! A minimal sink that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [created] delay=0ns timeout=60s signal="SIGINT,SIGTERM"
//! [signal] signal="SIGTERM"
//! [started] timeout=60s deadline=2024-05-01T12:01:00.25Z
//! [step-starting] step=0
//! [step-failed] step=0 err="connection refused"
//! [step-starting] step=1
//! [step-succeeded] step=1
//! [finished] code=0
//! ```

use crate::events::Event;
use crate::sinks::Sink;

/// Line-per-event stdout sink.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sink for LogWriter {
    fn on_event(&self, e: &Event) {
        println!("{e}");
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
