//! # Step abstraction.
//!
//! A step is one unit of cleanup. It receives the shared [`StepContext`] and
//! reports success or a [`StepError`]. Whether it honours the deadline is up
//! to the step: the sequencer never aborts a running step, it only stops
//! scheduling the next ones.

use async_trait::async_trait;

use crate::error::StepError;
use crate::steps::StepContext;

/// # Asynchronous shutdown step.
///
/// Steps carry no identity; the sequencer refers to them by index.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use shutdown_sequencer::{Step, StepContext, StepError};
///
/// struct FlushCache;
///
/// #[async_trait]
/// impl Step for FlushCache {
///     async fn run(&self, ctx: StepContext) -> Result<(), StepError> {
///         ctx.check()?;
///         // flush...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Step: Send + Sync + 'static {
    /// Executes the step.
    ///
    /// Long-running implementations should watch `ctx.done()` and return early.
    async fn run(&self, ctx: StepContext) -> Result<(), StepError>;
}
