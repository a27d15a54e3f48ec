//! Runtime core: building, starting and driving a sequence.
//!
//! The public API from this module is [`Builder`], [`Sequence`] and [`ExitAction`].
//!
//! Internal modules:
//! - [`builder`]: validates options, registers signals, spawns the watcher;
//! - [`sequence`]: the start protocol (guard, delay, deadline, exit);
//! - [`runner`]: the step loop with post-step deadline checks and panic isolation;
//! - [`watcher`]: turns the first configured OS signal into `start(0)`;
//! - [`exit`]: the injectable exit action.

mod builder;
mod exit;
mod runner;
mod sequence;
mod watcher;

pub use builder::Builder;
pub use exit::ExitAction;
pub use sequence::Sequence;
