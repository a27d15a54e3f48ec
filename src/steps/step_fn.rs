//! # Function-backed step (`StepFn`)
//!
//! [`StepFn`] wraps a closure `F: Fn(StepContext) -> Fut`, producing a fresh
//! future per run. Shared state goes through `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use shutdown_sequencer::{StepContext, StepError, StepFn, StepRef};
//!
//! let s: StepRef = StepFn::arc(|ctx: StepContext| async move {
//!     ctx.check()?;
//!     // release resources...
//!     Ok::<_, StepError>(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StepError;
use crate::steps::{Step, StepContext};

/// Shared handle to a step.
pub type StepRef = Arc<dyn Step>;

/// Function-backed step implementation.
pub struct StepFn<F> {
    f: F,
}

impl<F, Fut> StepFn<F>
where
    F: Fn(StepContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), StepError>> + Send + 'static,
{
    /// Creates a new function-backed step.
    ///
    /// Prefer [`StepFn::arc`] when you immediately need a [`StepRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the step and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Step for StepFn<F>
where
    F: Fn(StepContext) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), StepError>> + Send + 'static,
{
    async fn run(&self, ctx: StepContext) -> Result<(), StepError> {
        (self.f)(ctx).await
    }
}
