//! Batch execution.
//!
//! [`BatchRunner`] processes items sequentially and reports each terminal
//! outcome; [`spawn_batch`] runs it on a worker thread behind a channel.

pub mod background;
pub mod progress;
pub mod runner;

pub use background::{spawn_batch, BatchEvent, BatchHandle, BatchJob};
pub use progress::{CancelToken, ItemOutcome, OutcomeKind, ProgressEvent};
pub use runner::{BatchResult, BatchRunner, BatchSummary, ItemRecord};
