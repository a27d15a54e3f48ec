//! # Step abstractions.
//!
//! This module provides the step-related types:
//! - [`Step`] - trait for implementing an async shutdown step
//! - [`StepFn`] - closure-based step implementation
//! - [`StepRef`] - shared reference to a step (`Arc<dyn Step>`)
//! - [`StepContext`] - deadline and cancellation handed to each step

mod context;
mod step;
mod step_fn;

pub use context::StepContext;
pub use step::Step;
pub use step_fn::{StepFn, StepRef};
