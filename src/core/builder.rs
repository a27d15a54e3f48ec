use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::{
    config::Config,
    error::BuildError,
    events::{Event, EventKind},
    signals::{self, Listener, Signal},
    sinks::Sink,
    steps::StepRef,
};
use super::{exit::ExitAction, sequence::Sequence, watcher};

/// Builder for constructing a [`Sequence`].
///
/// Defaults: no sink (required), `delay = 0s`, `timeout = 60s`, no signals,
/// no steps, exit action = [`ExitAction::process_exit`].
#[derive(Clone, Default)]
pub struct Builder {
    sink: Option<Arc<dyn Sink>>,
    cfg: Config,
    signals: Vec<Signal>,
    steps: Vec<StepRef>,
    exit: ExitAction,
}

impl Builder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logging sink (required).
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the pause between a shutdown request and the first step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.cfg.delay = delay;
        self
    }

    /// Sets the upper bound on the whole step loop.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout = timeout;
        self
    }

    /// Replaces delay and timeout at once (e.g. from [`Config::from_env`]).
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Adds a signal that triggers `start(0)`. Duplicates are ignored.
    pub fn with_signal(mut self, signal: impl Into<Signal>) -> Self {
        let signal = signal.into();
        if !self.signals.contains(&signal) {
            self.signals.push(signal);
        }
        self
    }

    /// Adds several trigger signals.
    pub fn with_signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        for signal in signals {
            self = self.with_signal(signal);
        }
        self
    }

    /// Appends an initial step.
    pub fn with_step(mut self, step: StepRef) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends initial steps, preserving their order.
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = StepRef>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Replaces the process-exit default.
    pub fn with_exit_action(mut self, exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = ExitAction::new(exit);
        self
    }

    /// Validates the configuration and returns the sequence.
    ///
    /// This consumes the builder and:
    /// - checks that a sink is present
    /// - registers listeners for every configured signal (requires a tokio runtime
    ///   when the signal set is non-empty)
    /// - publishes [`EventKind::SequenceCreated`]
    /// - spawns the signal watcher (skipped for an empty signal set)
    pub fn build(self) -> Result<Arc<Sequence>, BuildError> {
        let sink = self.sink.ok_or(BuildError::MissingSink)?;
        let armed = register(&self.signals)?;

        let seq = Arc::new(Sequence::new_internal(
            self.cfg.clone(),
            sink,
            self.exit,
            self.steps,
        ));

        seq.emit(
            Event::new(EventKind::SequenceCreated)
                .with_delay(self.cfg.delay)
                .with_timeout(self.cfg.timeout)
                .with_signal(signals::join_names(&self.signals)),
        );

        if let Some((runtime, listeners)) = armed {
            let handle = watcher::spawn(&runtime, &seq, listeners);
            seq.attach_watcher(handle.abort_handle());
        }
        Ok(seq)
    }
}

/// Registers every signal up front so none is lost before the watcher runs.
fn register(signals: &[Signal]) -> Result<Option<(Handle, Vec<Listener>)>, BuildError> {
    if signals.is_empty() {
        return Ok(None);
    }
    let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime {
        signals: signals::join_names(signals),
    })?;

    let mut listeners = Vec::with_capacity(signals.len());
    for &signal in signals {
        let listener =
            Listener::register(signal).map_err(|source| BuildError::SignalRegistration {
                signal: signal.name(),
                source,
            })?;
        listeners.push(listener);
    }
    Ok(Some((runtime, listeners)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::TracingSink;

    #[test]
    fn test_missing_sink_is_rejected() {
        let err = Builder::new().build().err().unwrap();
        assert!(matches!(err, BuildError::MissingSink));
    }

    #[test]
    fn test_defaults() {
        let seq = Builder::new()
            .with_sink(Arc::new(TracingSink::new()))
            .with_exit_action(|_| {})
            .build()
            .unwrap();
        assert!(!seq.is_armed());
        assert_eq!(seq.config(), &Config::default());
        assert_eq!(seq.step_count(), 0);
        assert!(!seq.is_done());
    }

    #[cfg(unix)]
    #[test]
    fn test_signals_need_a_runtime() {
        let err = Builder::new()
            .with_sink(Arc::new(TracingSink::new()))
            .with_signal(Signal::terminate())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::NoRuntime { ref signals } if signals == "SIGTERM"));
    }

    #[cfg(unix)]
    #[test]
    fn test_duplicate_signals_are_ignored() {
        let b = Builder::new()
            .with_signal(Signal::terminate())
            .with_signals([Signal::terminate(), Signal::interrupt()]);
        assert_eq!(b.signals, vec![Signal::terminate(), Signal::interrupt()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_build_inside_runtime_arms_watcher() {
        let seq = Builder::new()
            .with_sink(Arc::new(TracingSink::new()))
            .with_signal(Signal::user_defined2())
            .with_exit_action(|_| {})
            .build()
            .unwrap();
        assert!(seq.is_armed());
    }
}
