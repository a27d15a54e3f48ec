//! # TracingSink: forwards events to `tracing`
//!
//! Each [`Event`] becomes one `tracing` event at the matching level, with the
//! optional metadata attached as structured fields. Install any
//! `tracing-subscriber` layer to get them out of the process.

use std::time::Duration;

use tracing::{error, info};

use crate::events::{Event, Level};
use crate::sinks::Sink;

/// Sink that forwards every event to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Construct a new [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn on_event(&self, e: &Event) {
        let step = e.step;
        let signal = e.signal.as_deref();
        let error = e.error.as_deref();
        let delay_ms = e.delay.map(millis);
        let timeout_ms = e.timeout.map(millis);
        let deadline = e.deadline_rfc3339();
        let deadline = deadline.as_deref();
        let code = e.code;

        match e.kind.level() {
            Level::Info => info!(
                target: "shutdown_sequencer",
                seq = e.seq,
                step,
                signal,
                error,
                delay_ms,
                timeout_ms,
                deadline,
                code,
                "{}",
                e.kind.message()
            ),
            Level::Error => error!(
                target: "shutdown_sequencer",
                seq = e.seq,
                step,
                signal,
                error,
                delay_ms,
                timeout_ms,
                deadline,
                code,
                "{}",
                e.kind.message()
            ),
        }
    }

    fn name(&self) -> &'static str {
        "TracingSink"
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(event: Event) -> String {
        let out = Captured::default();
        let subscriber = {
            let out = out.clone();
            tracing_subscriber::fmt()
                .with_ansi(false)
                .without_time()
                .with_writer(move || out.clone())
                .finish()
        };
        tracing::subscriber::with_default(subscriber, || TracingSink::new().on_event(&event));
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_error_level_keeps_code() {
        let line = capture(Event::new(EventKind::RequestedAgain).with_code(7));
        assert!(line.contains("ERROR"), "{line}");
        assert!(line.contains("code=7"), "{line}");
        assert!(line.contains(EventKind::RequestedAgain.message()), "{line}");
    }

    #[test]
    fn test_info_level_carries_timing() {
        let line = capture(
            Event::new(EventKind::SequenceCreated)
                .with_delay(Duration::from_millis(250))
                .with_timeout(Duration::from_secs(60)),
        );
        assert!(line.contains("INFO"), "{line}");
        assert!(line.contains("delay_ms=250"), "{line}");
        assert!(line.contains("timeout_ms=60000"), "{line}");
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
