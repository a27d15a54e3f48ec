//! # Step loop: run every step once, in order, under one deadline.
//!
//! Executes the snapshot of steps taken by [`Sequence::start`](crate::Sequence::start)
//! on a background task and reports each outcome to the sink.
//!
//! ## Event flow
//!
//! ```text
//! for each step (index i):
//!   publish StepStarting{i}
//!   step.run(ctx) ──► Ok      ──► publish StepSucceeded{i}
//!                 ──► Err(e)  ──► publish StepFailed{i, e}
//!                 ──► panic   ──► publish StepFailed{i, "step panicked: ..."}
//!   ctx done && steps left? ──► publish RemainingAborted{i + 1}, break
//!
//! on exit (also on unwind): cancel ctx ──► wakes Sequence::start
//! ```
//!
//! ## Rules
//! - Steps run **sequentially** in insertion order (never parallel)
//! - A failed step never stops the loop; only an expired (or cancelled) context does
//! - The deadline is checked **after** each step, so the first step always runs
//! - No abort event when the context expires during the last step

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures::FutureExt;

use crate::{
    error::StepError,
    events::{Event, EventKind},
    sinks::{Sink, publish},
    steps::{Step, StepContext, StepRef},
};

/// Runs `steps` in order and cancels `ctx` when done.
pub(crate) async fn run_steps(steps: Vec<StepRef>, ctx: StepContext, sink: Arc<dyn Sink>) {
    let _cancel = ctx.cancel_on_drop();
    let total = steps.len();

    for (index, step) in steps.iter().enumerate() {
        publish(&*sink, Event::new(EventKind::StepStarting).with_step(index));

        match run_one(step.as_ref(), ctx.clone()).await {
            Ok(()) => {
                publish(&*sink, Event::new(EventKind::StepSucceeded).with_step(index));
            }
            Err(err) => {
                publish(
                    &*sink,
                    Event::new(EventKind::StepFailed)
                        .with_step(index)
                        .with_error(err.to_string()),
                );
            }
        }

        let next = index + 1;
        if next < total && ctx.is_done() {
            publish(&*sink, Event::new(EventKind::RemainingAborted).with_step(next));
            break;
        }
    }
}

/// Runs one step, converting a panic into [`StepError::Panicked`].
pub(crate) async fn run_one(step: &dyn Step, ctx: StepContext) -> Result<(), StepError> {
    let fut = match catch_unwind(AssertUnwindSafe(|| step.run(ctx))) {
        Ok(fut) => fut,
        Err(payload) => return Err(panicked(payload)),
    };
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(panicked(payload)),
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> StepError {
    let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    };
    StepError::Panicked { info }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepFn;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Kinds(Mutex<Vec<(EventKind, Option<usize>)>>);

    impl Sink for Kinds {
        fn on_event(&self, e: &Event) {
            self.0.lock().unwrap().push((e.kind, e.step));
        }
    }

    impl Kinds {
        fn take(&self) -> Vec<(EventKind, Option<usize>)> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    fn ok_step() -> StepRef {
        StepFn::arc(|_ctx| async { Ok(()) })
    }

    fn explode() -> Result<(), StepError> {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panicking_step_is_reported_as_failure() {
        let step: StepRef = StepFn::arc(|_ctx| async { explode() });
        let err = run_one(step.as_ref(), StepContext::with_timeout(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "step panicked: kaboom");
    }

    #[tokio::test]
    async fn test_loop_cancels_context_when_finished() {
        let sink = Arc::new(Kinds::default());
        let ctx = StepContext::with_timeout(Duration::from_secs(60));
        run_steps(vec![ok_step(), ok_step()], ctx.clone(), sink.clone()).await;

        assert!(ctx.is_done());
        assert_eq!(
            sink.take(),
            vec![
                (EventKind::StepStarting, Some(0)),
                (EventKind::StepSucceeded, Some(0)),
                (EventKind::StepStarting, Some(1)),
                (EventKind::StepSucceeded, Some(1)),
            ]
        );
    }

    #[tokio::test]
    async fn test_expired_context_runs_first_step_then_aborts() {
        let sink = Arc::new(Kinds::default());
        let ctx = StepContext::with_timeout(Duration::ZERO);
        run_steps(vec![ok_step(), ok_step(), ok_step()], ctx, sink.clone()).await;

        assert_eq!(
            sink.take(),
            vec![
                (EventKind::StepStarting, Some(0)),
                (EventKind::StepSucceeded, Some(0)),
                (EventKind::RemainingAborted, Some(1)),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_abort_event_after_last_step() {
        let sink = Arc::new(Kinds::default());
        let ctx = StepContext::with_timeout(Duration::ZERO);
        run_steps(vec![ok_step()], ctx, sink.clone()).await;

        let kinds = sink.take();
        assert!(!kinds.iter().any(|(k, _)| *k == EventKind::RemainingAborted));
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_loop() {
        let sink = Arc::new(Kinds::default());
        let failing: StepRef = StepFn::arc(|_ctx| async { Err(StepError::fail("nope")) });
        let ctx = StepContext::with_timeout(Duration::from_secs(60));
        run_steps(vec![failing, ok_step()], ctx, sink.clone()).await;

        assert_eq!(
            sink.take(),
            vec![
                (EventKind::StepStarting, Some(0)),
                (EventKind::StepFailed, Some(0)),
                (EventKind::StepStarting, Some(1)),
                (EventKind::StepSucceeded, Some(1)),
            ]
        );
    }
}
