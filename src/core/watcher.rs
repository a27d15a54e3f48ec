//! # Signal watcher: turn the first matching OS signal into `start(0)`.
//!
//! ```text
//! Builder::build
//!   └─► Listener::register(sig) for every sig   (synchronous, before build returns)
//!   └─► spawn watcher(Arc<Sequence>, listeners)
//!           └─► first delivery on any listener
//!                 └─ publish SignalReceived{name} ─► Sequence::start(0)
//! ```
//!
//! The watcher handles a single delivery and then ends: a sequence only runs
//! once. It owns a strong reference, so a sequence built only for its
//! signal set keeps working after the caller drops its handle.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::Sequence;
use crate::events::{Event, EventKind};
use crate::signals::{self, Listener};

/// Spawns the watcher for `seq` on `runtime`.
pub(crate) fn spawn(
    runtime: &Handle,
    seq: &Arc<Sequence>,
    mut listeners: Vec<Listener>,
) -> JoinHandle<()> {
    let seq = Arc::clone(seq);
    runtime.spawn(async move {
        let Some(signal) = signals::first(&mut listeners).await else {
            return;
        };
        seq.emit(Event::new(EventKind::SignalReceived).with_signal(signal.name()));
        seq.start(0).await;
    })
}
