//! # Exit action invoked when a sequence concludes.
//!
//! The default terminates the process with the requested code. Tests and
//! embedders inject their own callable instead of letting the sequencer call
//! `std::process::exit` directly.

use std::fmt;
use std::sync::Arc;

/// Callable receiving the exit code after the step loop ends or times out.
#[derive(Clone)]
pub struct ExitAction(Arc<dyn Fn(i32) + Send + Sync>);

impl ExitAction {
    /// Wraps an arbitrary callable.
    pub fn new(f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Terminates the process with the given code.
    pub fn process_exit() -> Self {
        Self::new(|code| std::process::exit(code))
    }

    /// Invokes the action.
    pub fn call(&self, code: i32) {
        (self.0)(code)
    }
}

impl Default for ExitAction {
    fn default() -> Self {
        Self::process_exit()
    }
}

impl fmt::Debug for ExitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExitAction(..)")
    }
}
