//! # Structured events emitted by a shutdown sequence.
//!
//! The [`EventKind`] enum classifies everything the sequencer reports:
//! - **Setup events**: the sequence was built
//! - **Trigger events**: signal received, delayed start, re-entrant request
//! - **Step events**: starting, succeeded, failed, remaining aborted
//! - **Terminal events**: sequence started / finished
//!
//! The [`Event`] struct carries additional metadata such as the step index,
//! the failure description and the deadline.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Within one sequence, step events precede `RemainingAborted`, which precedes
//! `SequenceFinished`, which precedes the exit action.
//!
//! ## Example
//! ```rust
//! use shutdown_sequencer::{Event, EventKind, Level};
//!
//! let ev = Event::new(EventKind::StepFailed)
//!     .with_step(2)
//!     .with_error("disk full");
//!
//! assert_eq!(ev.kind.level(), Level::Error);
//! assert_eq!(ev.step, Some(2));
//! assert_eq!(ev.error.as_deref(), Some("disk full"));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Error,
}

/// Classification of sequencer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Sequence was built.
    ///
    /// Sets:
    /// - `delay`, `timeout`: configured timing
    /// - `signal`: comma-joined names of the signal set (empty if none)
    SequenceCreated,

    /// A signal from the configured set arrived.
    ///
    /// Sets:
    /// - `signal`: canonical signal name
    SignalReceived,

    /// `start` was called after the sequence already completed (error level).
    RequestedAgain,

    /// `start` acquired the guard and is sleeping for the configured delay.
    ///
    /// Sets:
    /// - `delay`: the delay
    DelayedStart,

    /// The step loop is about to begin.
    ///
    /// Sets:
    /// - `deadline`: wall-clock deadline shared by all steps
    /// - `timeout`: configured timeout
    SequenceStarted,

    /// A step is being invoked.
    ///
    /// Sets:
    /// - `step`: zero-based index
    StepStarting,

    /// A step returned success.
    ///
    /// Sets:
    /// - `step`: zero-based index
    StepSucceeded,

    /// A step returned a failure or panicked (error level).
    ///
    /// Sets:
    /// - `step`: zero-based index
    /// - `error`: failure description
    StepFailed,

    /// The deadline passed and the remaining steps were skipped.
    ///
    /// Sets:
    /// - `step`: index of the first skipped step
    RemainingAborted,

    /// The sequence ended; the exit action is invoked next.
    ///
    /// Sets:
    /// - `code`: exit code passed to the exit action
    SequenceFinished,
}

impl EventKind {
    /// Severity of this kind.
    pub fn level(self) -> Level {
        match self {
            EventKind::RequestedAgain | EventKind::StepFailed => Level::Error,
            _ => Level::Info,
        }
    }

    /// Human-readable log message for this kind.
    pub fn message(self) -> &'static str {
        match self {
            EventKind::SequenceCreated => "Shutdown sequence created",
            EventKind::SignalReceived => "Shutdown sequence started by signal",
            EventKind::RequestedAgain => {
                "Shutdown has been requested again after it was already completed"
            }
            EventKind::DelayedStart => {
                "Shutdown has been requested and will start after the delay"
            }
            EventKind::SequenceStarted => "Shutdown sequence started",
            EventKind::StepStarting => "Starting shutdown step",
            EventKind::StepSucceeded => "Shutdown step succeeded",
            EventKind::StepFailed => "Shutdown step failed",
            EventKind::RemainingAborted => "Remaining shutdown steps aborted due to timeout",
            EventKind::SequenceFinished => "Shutdown sequence finished, exiting",
        }
    }

    /// Short stable label (kebab-case), used by the line writer.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::SequenceCreated => "created",
            EventKind::SignalReceived => "signal",
            EventKind::RequestedAgain => "requested-again",
            EventKind::DelayedStart => "delayed",
            EventKind::SequenceStarted => "started",
            EventKind::StepStarting => "step-starting",
            EventKind::StepSucceeded => "step-succeeded",
            EventKind::StepFailed => "step-failed",
            EventKind::RemainingAborted => "aborted",
            EventKind::SequenceFinished => "finished",
        }
    }
}

/// Sequencer event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Zero-based step index, if applicable.
    pub step: Option<usize>,
    /// Signal name(s), if applicable.
    pub signal: Option<Arc<str>>,
    /// Failure description.
    pub error: Option<Arc<str>>,
    /// Configured pre-run delay.
    pub delay: Option<Duration>,
    /// Configured timeout.
    pub timeout: Option<Duration>,
    /// Wall-clock deadline of the step loop.
    pub deadline: Option<SystemTime>,
    /// Exit code handed to the exit action.
    pub code: Option<i32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            step: None,
            signal: None,
            error: None,
            delay: None,
            timeout: None,
            deadline: None,
            code: None,
        }
    }

    /// Attaches a step index.
    #[inline]
    pub fn with_step(mut self, index: usize) -> Self {
        self.step = Some(index);
        self
    }

    /// Attaches a signal name.
    #[inline]
    pub fn with_signal(mut self, name: impl Into<Arc<str>>) -> Self {
        self.signal = Some(name.into());
        self
    }

    /// Attaches a failure description.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout = Some(d);
        self
    }

    #[inline]
    pub fn with_deadline(mut self, at: SystemTime) -> Self {
        self.deadline = Some(at);
        self
    }

    #[inline]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Formats the deadline as RFC 3339 (e.g. `2024-05-01T12:00:00.5Z`).
    pub fn deadline_rfc3339(&self) -> Option<String> {
        self.deadline.map(format_rfc3339)
    }
}

impl fmt::Display for Event {
    /// One `key=value` line, e.g. `[step-failed] step=1 err="disk full"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind.as_label())?;
        if let Some(step) = self.step {
            write!(f, " step={step}")?;
        }
        if let Some(signal) = &self.signal {
            write!(f, " signal={signal:?}")?;
        }
        if let Some(delay) = self.delay {
            write!(f, " delay={delay:?}")?;
        }
        if let Some(timeout) = self.timeout {
            write!(f, " timeout={timeout:?}")?;
        }
        if let Some(deadline) = self.deadline_rfc3339() {
            write!(f, " deadline={deadline}")?;
        }
        if let Some(code) = self.code {
            write!(f, " code={code}")?;
        }
        if let Some(error) = &self.error {
            write!(f, " err={error:?}")?;
        }
        Ok(())
    }
}

fn format_rfc3339(at: SystemTime) -> String {
    OffsetDateTime::from(at)
        .format(&Rfc3339)
        .unwrap_or_else(|_| format!("{at:?}"))
}
