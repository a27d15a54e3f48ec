#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shutdown_sequencer::{Event, EventKind, Sink};

/// Sink keeping every event in memory.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }
}

impl Sink for Recorder {
    fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

/// Exit action stand-in that remembers the last code and the number of calls.
#[derive(Clone, Default)]
pub struct ExitProbe {
    code: Arc<AtomicI32>,
    calls: Arc<AtomicUsize>,
}

impl ExitProbe {
    pub fn new() -> Self {
        let probe = Self::default();
        probe.code.store(-1, Ordering::SeqCst);
        probe
    }

    pub fn action(&self) -> impl Fn(i32) + Send + Sync + 'static {
        let probe = self.clone();
        move |code| {
            probe.code.store(code, Ordering::SeqCst);
            probe.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn code(&self) -> i32 {
        self.code.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
