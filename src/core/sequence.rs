//! # Sequence: runs registered shutdown steps once, then exits.
//!
//! The [`Sequence`] owns the validated configuration, the append-only step
//! list, the single-entry guard and the done latch.
//!
//! ## Start protocol
//! ```text
//! start(code)
//!   ├─► lock guard (held until return; serializes concurrent starts)
//!   ├─► done?  ─► publish RequestedAgain (error), return
//!   ├─► delay > 0? ─► publish DelayedStart, sleep(delay)
//!   ├─► ctx = StepContext(now + timeout)        (cancelled on every return path)
//!   ├─► publish SequenceStarted{deadline}
//!   ├─► spawn run_steps(snapshot, ctx)          (not joined)
//!   ├─► await ctx.done()                        (steps finished OR deadline)
//!   ├─► done = true
//!   ├─► publish SequenceFinished{code}
//!   └─► exit(code)
//! ```
//!
//! When the deadline wins, the step loop keeps running in the background;
//! the exit action (process exit by default) is what reclaims it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shutdown_sequencer::{Sequence, StepFn, TracingSink};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let seq = Sequence::builder()
//!         .with_sink(Arc::new(TracingSink::new()))
//!         .with_timeout(Duration::from_secs(5))
//!         .with_exit_action(|code| println!("would exit with {code}"))
//!         .build()?;
//!
//!     seq.add_step(StepFn::arc(|_ctx| async {
//!         println!("closing listeners");
//!         Ok(())
//!     }));
//!
//!     seq.start(0).await;
//!     assert!(seq.is_done());
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::SystemTime;

use tokio::task::AbortHandle;
use tokio::time;

use crate::{
    config::Config,
    core::{Builder, ExitAction, runner::run_steps},
    events::{Event, EventKind},
    sinks::{Sink, publish},
    steps::{StepContext, StepRef},
};

/// Ordered, deadline-bounded shutdown procedure.
///
/// Built by [`Builder`]; shared as `Arc<Sequence>` between the application
/// and the signal watcher.
pub struct Sequence {
    cfg: Config,
    sink: Arc<dyn Sink>,
    exit: ExitAction,
    steps: Mutex<Vec<StepRef>>,
    guard: tokio::sync::Mutex<()>,
    done: AtomicBool,
    watcher: OnceLock<AbortHandle>,
}

impl Sequence {
    /// Shorthand for [`Builder::new`].
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn new_internal(
        cfg: Config,
        sink: Arc<dyn Sink>,
        exit: ExitAction,
        steps: Vec<StepRef>,
    ) -> Self {
        Self {
            cfg,
            sink,
            exit,
            steps: Mutex::new(steps),
            guard: tokio::sync::Mutex::new(()),
            done: AtomicBool::new(false),
            watcher: OnceLock::new(),
        }
    }

    /// Timing configuration this sequence was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Appends a step.
    ///
    /// Registration must finish before [`start`](Self::start) is triggered;
    /// steps added while a run is in progress are not part of that run.
    pub fn add_step(&self, step: StepRef) {
        self.lock_steps().push(step);
    }

    /// Appends several steps, preserving their order.
    pub fn add_steps(&self, steps: impl IntoIterator<Item = StepRef>) {
        self.lock_steps().extend(steps);
    }

    /// Number of registered steps.
    pub fn step_count(&self) -> usize {
        self.lock_steps().len()
    }

    /// `true` once a run has completed (the exit action was invoked).
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Runs the sequence and invokes the exit action with `code`.
    ///
    /// Only the first call runs; later calls publish
    /// [`EventKind::RequestedAgain`] and return without side effects.
    /// Step outcomes never influence `code`.
    pub async fn start(&self, code: i32) {
        let _guard = self.guard.lock().await;
        if self.is_done() {
            self.emit(Event::new(EventKind::RequestedAgain).with_code(code));
            return;
        }

        let delay = self.cfg.delay;
        if !delay.is_zero() {
            self.emit(Event::new(EventKind::DelayedStart).with_delay(delay));
            time::sleep(delay).await;
        }

        let timeout = self.cfg.timeout;
        let ctx = StepContext::with_timeout(timeout);
        let _cancel = ctx.cancel_on_drop();

        let mut started = Event::new(EventKind::SequenceStarted).with_timeout(timeout);
        if let Some(deadline) = SystemTime::now().checked_add(timeout) {
            started = started.with_deadline(deadline);
        }
        self.emit(started);

        tokio::spawn(run_steps(
            self.snapshot(),
            ctx.clone(),
            Arc::clone(&self.sink),
        ));
        ctx.done().await;

        self.done.store(true, Ordering::Release);
        self.emit(Event::new(EventKind::SequenceFinished).with_code(code));
        self.exit.call(code);
    }

    pub(crate) fn emit(&self, event: Event) {
        publish(&*self.sink, event);
    }

    pub(crate) fn attach_watcher(&self, handle: AbortHandle) {
        let _ = self.watcher.set(handle);
    }

    /// `true` while a signal watcher is waiting for the first delivery.
    ///
    /// Always `false` for an empty signal set.
    pub fn is_armed(&self) -> bool {
        self.watcher.get().is_some_and(|h| !h.is_finished())
    }

    fn snapshot(&self) -> Vec<StepRef> {
        self.lock_steps().clone()
    }

    fn lock_steps(&self) -> MutexGuard<'_, Vec<StepRef>> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
