#![cfg(unix)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{ExitProbe, Recorder};
use nix::sys::signal::{self, Signal as RawSignal};
use shutdown_sequencer::{EventKind, Sequence, Signal, StepFn, StepRef};
use tokio::sync::Notify;

async fn wait_for_exit(exit: &ExitProbe) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while exit.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("exit action invoked");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn signal_starts_sequence_with_code_zero() {
    let rec = Recorder::new();
    let exit = ExitProbe::new();
    let ran = Arc::new(Notify::new());
    let runs = Arc::new(AtomicUsize::new(0));
    let step: StepRef = {
        let ran = ran.clone();
        let runs = runs.clone();
        StepFn::arc(move |_ctx| {
            let ran = ran.clone();
            let runs = runs.clone();
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                ran.notify_one();
                Ok(())
            }
        })
    };

    let seq = Sequence::builder()
        .with_sink(rec.clone())
        .with_signal(Signal::user_defined1())
        .with_step(step)
        .with_exit_action(exit.action())
        .build()
        .unwrap();

    signal::raise(RawSignal::SIGUSR1).unwrap();

    tokio::time::timeout(Duration::from_secs(5), ran.notified())
        .await
        .expect("step ran after SIGUSR1");
    wait_for_exit(&exit).await;

    assert_eq!(exit.code(), 0);
    assert!(seq.is_done());

    let received = rec.of_kind(EventKind::SignalReceived);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].signal.as_deref(), Some("SIGUSR1"));

    let created = rec.of_kind(EventKind::SequenceCreated);
    assert_eq!(created[0].signal.as_deref(), Some("SIGUSR1"));

    // The watcher is gone after the first delivery; a second one changes nothing.
    signal::raise(RawSignal::SIGUSR1).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(exit.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn explicit_start_wins_over_later_signal() {
    let rec = Recorder::new();
    let exit = ExitProbe::new();

    let seq = Sequence::builder()
        .with_sink(rec.clone())
        .with_signal(Signal::hangup())
        .with_exit_action(exit.action())
        .build()
        .unwrap();

    seq.start(42).await;
    signal::raise(RawSignal::SIGHUP).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(exit.code(), 42);
    assert_eq!(exit.calls(), 1);
    assert_eq!(rec.of_kind(EventKind::RequestedAgain).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn signal_still_triggers_after_handle_is_dropped() {
    let rec = Recorder::new();
    let exit = ExitProbe::new();

    let seq = Sequence::builder()
        .with_sink(rec.clone())
        .with_signal(Signal::user_defined2())
        .with_exit_action(exit.action())
        .build()
        .unwrap();
    assert!(seq.is_armed());
    drop(seq);

    signal::raise(RawSignal::SIGUSR2).unwrap();
    wait_for_exit(&exit).await;

    assert_eq!(exit.code(), 0);
    assert_eq!(exit.calls(), 1);
    assert_eq!(
        rec.kinds(),
        vec![
            EventKind::SequenceCreated,
            EventKind::SignalReceived,
            EventKind::SequenceStarted,
            EventKind::SequenceFinished,
        ]
    );
}
