//! Error types used by the shutdown sequencer and its steps.
//!
//! This module defines four enums:
//!
//! - [`BuildError`]: a [`Builder`](crate::Builder) could not produce a sequence.
//! - [`ConfigError`]: text configuration (environment) was rejected.
//! - [`StepError`]: a step reported a failure (or panicked).
//! - [`ContextError`]: why a [`StepContext`](crate::StepContext) is done.
//!
//! All of them provide `as_label` for stable snake_case labels in logs.

use std::num::ParseIntError;

use thiserror::Error;

/// # Errors produced while building a sequence.
///
/// Each variant names the offending option and the value that was observed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// No logging sink was configured.
    #[error("missing required option `sink`: got none")]
    MissingSink,

    /// Signals were requested but `build` was not called inside a tokio runtime.
    #[error("option `signals` ({signals}) requires a tokio runtime, but none is running")]
    NoRuntime {
        /// Comma-joined names of the requested signals.
        signals: String,
    },

    /// The platform refused to register a listener for a signal.
    #[error("option `signals`: failed to listen for {signal}: {source}")]
    SignalRegistration {
        /// Canonical name of the signal.
        signal: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use shutdown_sequencer::BuildError;
    ///
    /// assert_eq!(BuildError::MissingSink.as_label(), "build_missing_sink");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::MissingSink => "build_missing_sink",
            BuildError::NoRuntime { .. } => "build_no_runtime",
            BuildError::SignalRegistration { .. } => "build_signal_registration",
        }
    }
}

/// # Errors produced while reading configuration from text.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A duration option was given a negative value.
    #[error("option `{option}` must be >= 0, got {value}ms")]
    Negative {
        /// Name of the option (e.g. `delay`).
        option: &'static str,
        /// Observed value in milliseconds.
        value: i64,
    },

    /// A duration option was not an integer.
    #[error("option `{option}` must be an integer number of milliseconds, got {value:?}")]
    Parse {
        /// Name of the option (e.g. `timeout`).
        option: &'static str,
        /// Observed raw value.
        value: String,
        /// Parser failure.
        #[source]
        source: ParseIntError,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Negative { .. } => "config_negative",
            ConfigError::Parse { .. } => "config_parse",
        }
    }
}

/// # Why a step context is done.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The sequence deadline has passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The sequence finished (or was abandoned) before the deadline.
    #[error("context canceled")]
    Canceled,
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::DeadlineExceeded => "context_deadline_exceeded",
            ContextError::Canceled => "context_canceled",
        }
    }
}

/// # Errors produced by a shutdown step.
///
/// Failures are logged by the sequencer and never stop the sequence.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StepError {
    /// The step failed with a description.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The step gave up because its context was done.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The step panicked; the panic was caught by the step loop.
    #[error("step panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl StepError {
    /// Creates a [`StepError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use shutdown_sequencer::StepError;
    ///
    /// let err = StepError::fail("flush failed");
    /// assert_eq!(err.to_string(), "flush failed");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        StepError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StepError::Fail { .. } => "step_failed",
            StepError::Context(e) => e.as_label(),
            StepError::Panicked { .. } => "step_panicked",
        }
    }
}
