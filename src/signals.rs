//! # OS signals that trigger a shutdown sequence.
//!
//! [`Signal`] is one element of a sequence's signal set. Listeners for the
//! whole set are registered **synchronously** while the sequence is built, so
//! a signal that arrives right after `build` returns is queued by the runtime
//! rather than lost.
//!
//! ## Platforms
//! **Unix:** any [`SignalKind`](tokio::signal::unix::SignalKind), named via
//! `nix` (`SIGTERM`, `SIGUSR1`, ...). [`Signal::CtrlC`] maps to `SIGINT`.
//!
//! **Windows:** only [`Signal::CtrlC`].

use std::fmt;
use std::io;

#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// A process signal that can start a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Ctrl-C in a terminal (`SIGINT` on unix).
    CtrlC,
    /// Arbitrary unix signal.
    #[cfg(unix)]
    Unix(SignalKind),
}

#[cfg(unix)]
impl Signal {
    /// `SIGINT`.
    pub fn interrupt() -> Self {
        Signal::Unix(SignalKind::interrupt())
    }

    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    pub fn terminate() -> Self {
        Signal::Unix(SignalKind::terminate())
    }

    /// `SIGQUIT`.
    pub fn quit() -> Self {
        Signal::Unix(SignalKind::quit())
    }

    /// `SIGHUP`.
    pub fn hangup() -> Self {
        Signal::Unix(SignalKind::hangup())
    }

    /// `SIGUSR1`.
    pub fn user_defined1() -> Self {
        Signal::Unix(SignalKind::user_defined1())
    }

    /// `SIGUSR2`.
    pub fn user_defined2() -> Self {
        Signal::Unix(SignalKind::user_defined2())
    }

    /// Signal by raw number.
    pub fn from_raw(signum: i32) -> Self {
        Signal::Unix(SignalKind::from_raw(signum))
    }

    fn kind(self) -> SignalKind {
        match self {
            Signal::CtrlC => SignalKind::interrupt(),
            Signal::Unix(kind) => kind,
        }
    }
}

#[cfg(unix)]
impl From<SignalKind> for Signal {
    fn from(kind: SignalKind) -> Self {
        Signal::Unix(kind)
    }
}

impl Signal {
    /// Canonical, human-readable name of the signal.
    ///
    /// # Example
    /// ```
    /// use shutdown_sequencer::Signal;
    ///
    /// # #[cfg(unix)]
    /// assert_eq!(Signal::terminate().name(), "SIGTERM");
    /// ```
    pub fn name(&self) -> String {
        match self {
            #[cfg(unix)]
            Signal::CtrlC => canonical_name(SignalKind::interrupt()),
            #[cfg(not(unix))]
            Signal::CtrlC => "ctrl-c".to_string(),
            #[cfg(unix)]
            Signal::Unix(kind) => canonical_name(*kind),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(unix)]
fn canonical_name(kind: SignalKind) -> String {
    let raw = kind.as_raw_value();
    nix::sys::signal::Signal::try_from(raw)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {raw}"))
}

/// Joins signal names with commas, e.g. `SIGINT,SIGTERM`.
pub(crate) fn join_names(signals: &[Signal]) -> String {
    signals
        .iter()
        .map(Signal::name)
        .collect::<Vec<_>>()
        .join(",")
}

/// A registered listener for one signal.
pub(crate) struct Listener {
    signal: Signal,
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
    #[cfg(windows)]
    inner: tokio::signal::windows::CtrlC,
}

impl Listener {
    /// Registers a listener. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub(crate) fn register(signal: Signal) -> io::Result<Self> {
        let inner = tokio::signal::unix::signal(signal.kind())?;
        Ok(Self { signal, inner })
    }

    /// Registers a listener. Must be called inside a tokio runtime.
    #[cfg(windows)]
    pub(crate) fn register(signal: Signal) -> io::Result<Self> {
        let inner = tokio::signal::windows::ctrl_c()?;
        Ok(Self { signal, inner })
    }

    #[cfg(not(any(unix, windows)))]
    pub(crate) fn register(_signal: Signal) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "signals are not supported on this platform",
        ))
    }

    /// Waits for the next delivery; `None` if the listener was closed.
    async fn recv(&mut self) -> Option<Signal> {
        #[cfg(any(unix, windows))]
        {
            self.inner.recv().await.map(|()| self.signal)
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = self.signal;
            None
        }
    }
}

/// Waits for the first delivery on any of `listeners`.
///
/// Returns `None` if there are no listeners or the one that fired was closed.
pub(crate) async fn first(listeners: &mut [Listener]) -> Option<Signal> {
    if listeners.is_empty() {
        return None;
    }
    let pending = listeners.iter_mut().map(|l| Box::pin(l.recv()));
    let (signal, _index, _rest) = futures::future::select_all(pending).await;
    signal
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(Signal::interrupt().name(), "SIGINT");
        assert_eq!(Signal::CtrlC.name(), "SIGINT");
        assert_eq!(Signal::hangup().name(), "SIGHUP");
        assert_eq!(Signal::user_defined1().name(), "SIGUSR1");
        assert_eq!(Signal::from_raw(15).to_string(), "SIGTERM");
    }

    #[test]
    fn test_unknown_signal_falls_back_to_number() {
        assert_eq!(Signal::from_raw(4242).name(), "signal 4242");
    }

    #[test]
    fn test_join_names() {
        let set = [Signal::interrupt(), Signal::terminate()];
        assert_eq!(join_names(&set), "SIGINT,SIGTERM");
        assert_eq!(join_names(&[]), "");
    }

    #[tokio::test]
    async fn test_first_without_listeners_is_none() {
        assert_eq!(first(&mut []).await, None);
    }
}
