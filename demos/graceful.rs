//! # Example: graceful
//!
//! A service that drains work and flushes state when it is asked to stop.
//!
//! Demonstrates how to:
//! - Read the timing settings from `SHUTDOWN_DELAY_MS` / `SHUTDOWN_TIMEOUT_MS`.
//! - Log every sequence event through [`TracingSink`] and `tracing-subscriber`.
//! - Trigger the sequence from `SIGINT`/`SIGTERM`, or from code after a while.
//! - Write a step that honors the shared deadline and one that ignores it.
//!
//! ## Flow
//! ```text
//! Sequence::builder()
//!     ├─► with_config(Config::from_env())
//!     ├─► with_signals([SIGINT, SIGTERM])
//!     ├─► with_step(drain)         (cooperative, stops at the deadline)
//!     └─► add_step(flush)          (registered after build)
//!
//! Ctrl-C  or  3s idle ──► start(code)
//!     ├─► drain: step 0
//!     ├─► flush: step 1
//!     └─► std::process::exit(code)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example graceful
//! SHUTDOWN_TIMEOUT_MS=500 RUST_LOG=info cargo run --example graceful
//! ```

use std::sync::Arc;
use std::time::Duration;

use shutdown_sequencer::{Config, Sequence, StepContext, StepError, StepFn, StepRef, TracingSink};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Route `tracing` output to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 2. Timing settings from the environment (delay 0s, timeout 60s by default)
    let cfg = Config::from_env()?;

    // 3. A step that drains in-flight work but gives up at the deadline
    let drain: StepRef = StepFn::arc(|ctx: StepContext| async move {
        for batch in 1..=5 {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(200)) => {
                    println!("[drain] batch {batch} done");
                }
                reason = ctx.done() => {
                    println!("[drain] stopped early: {reason}");
                    return Err(StepError::from(reason));
                }
            }
        }
        Ok(())
    });

    // 4. Build, listening for Ctrl-C and SIGTERM
    let mut builder = Sequence::builder()
        .with_sink(Arc::new(TracingSink::new()))
        .with_config(cfg)
        .with_step(drain);
    #[cfg(unix)]
    {
        use shutdown_sequencer::Signal;
        builder = builder.with_signals([Signal::interrupt(), Signal::terminate()]);
    }
    #[cfg(not(unix))]
    {
        builder = builder.with_signal(shutdown_sequencer::Signal::CtrlC);
    }
    let seq = builder.build()?;

    // 5. Components can register their own steps later on
    let flush: StepRef = StepFn::arc(|_ctx| async {
        println!("[flush] writing state");
        if std::env::var_os("FLUSH_FAILS").is_some() {
            return Err(StepError::fail("state volume is read-only"));
        }
        Ok(())
    });
    seq.add_step(flush);

    // 6. Serve until a signal arrives; shut down on our own after 3s of idling
    println!("running, press Ctrl-C to stop");
    tokio::time::sleep(Duration::from_secs(3)).await;
    seq.start(0).await;
    Ok(())
}
