//! # Deadline-carrying context handed to every step.
//!
//! A [`StepContext`] bundles three things:
//! - a read-only **deadline** (`start time + timeout`), shared by all steps of a run
//! - a **cancellation indicator** ([`StepContext::err`], [`StepContext::is_done`])
//! - a **wait handle** ([`StepContext::done`]) that completes on cancellation or deadline
//!
//! ```text
//!   Sequence::start ──► StepContext::with_deadline(now + timeout)
//!        │                 │ clone
//!        │                 ▼
//!        │            step loop ──► step.run(ctx.clone()) ──► ...
//!        │                 │
//!        │                 └─ on exit: cancel (Canceled, unless the deadline came first)
//!        └─ waits on ctx.done()
//! ```
//!
//! ## Rules
//! - Only the sequencer cancels a context; steps get read-only views
//!   (including [`StepContext::child_token`] for handing to other APIs).
//! - The first reason wins: once [`err`](StepContext::err) returns `Some`, it
//!   keeps returning the same value.
//! - Time is measured with [`tokio::time::Instant`], so paused test clocks apply.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// Stand-in deadline for timeouts too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Deadline and cancellation state for one run of a sequence.
///
/// Cheap to clone; all clones observe the same state.
#[derive(Clone, Debug)]
pub struct StepContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    deadline: Instant,
    token: CancellationToken,
    reason: OnceLock<ContextError>,
}

impl StepContext {
    /// Creates a context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(Inner {
                deadline,
                token: CancellationToken::new(),
                reason: OnceLock::new(),
            }),
        }
    }

    /// Creates a context that expires `timeout` from now.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use shutdown_sequencer::{ContextError, StepContext};
    ///
    /// let ctx = StepContext::with_timeout(Duration::ZERO);
    /// assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    /// ```
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self::with_deadline(deadline)
    }

    /// The instant after which no further step should run.
    pub fn deadline(&self) -> Instant {
        self.inner.deadline
    }

    /// Time left until the deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.inner
            .deadline
            .saturating_duration_since(Instant::now())
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(reason) = self.inner.reason.get() {
            return Some(*reason);
        }
        if Instant::now() >= self.inner.deadline {
            return Some(self.finish(ContextError::DeadlineExceeded));
        }
        None
    }

    /// `true` once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// `Err` once the context is done; handy with `?` inside steps.
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Waits until the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        tokio::select! {
            _ = self.inner.token.cancelled() => {
                self.err().unwrap_or(ContextError::Canceled)
            }
            _ = time::sleep_until(self.inner.deadline) => {
                self.finish(ContextError::DeadlineExceeded)
            }
        }
    }

    /// A token cancelled together with this context.
    ///
    /// Cancelling the child does not affect the context.
    pub fn child_token(&self) -> CancellationToken {
        self.inner.token.child_token()
    }

    /// Cancels the context; a no-op if it is already done.
    pub(crate) fn cancel(&self) {
        self.finish(ContextError::Canceled);
    }

    /// Returns a guard that cancels the context when dropped (also on unwind).
    pub(crate) fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }

    fn finish(&self, reason: ContextError) -> ContextError {
        let reason = *self.inner.reason.get_or_init(|| reason);
        self.inner.token.cancel();
        reason
    }
}

/// Cancels the wrapped context on drop.
pub(crate) struct CancelOnDrop(StepContext);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
