//! Per-item outcomes, progress events, and cancellation.

use crate::core::error::{FetchError, ProcessError, WriteError};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Terminal state of one item.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Fetched, composed, and written.
    Saved {
        /// Location of the written artifact.
        path: PathBuf,
    },
    /// The fetch stage failed; nothing was composed or written.
    FetchFailed(FetchError),
    /// The bytes could not be turned into an artifact; nothing was written.
    ProcessFailed(ProcessError),
    /// The artifact could not be persisted.
    WriteFailed(Arc<WriteError>),
    /// Cancellation was requested before this item started.
    Cancelled,
}

/// Discriminant of [`ItemOutcome`], for reports and tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// See [`ItemOutcome::Saved`].
    Saved,
    /// See [`ItemOutcome::FetchFailed`].
    FetchFailed,
    /// See [`ItemOutcome::ProcessFailed`].
    ProcessFailed,
    /// See [`ItemOutcome::WriteFailed`].
    WriteFailed,
    /// See [`ItemOutcome::Cancelled`].
    Cancelled,
}

impl ItemOutcome {
    /// Which terminal state this is.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ItemOutcome::Saved { .. } => OutcomeKind::Saved,
            ItemOutcome::FetchFailed(_) => OutcomeKind::FetchFailed,
            ItemOutcome::ProcessFailed(_) => OutcomeKind::ProcessFailed,
            ItemOutcome::WriteFailed(_) => OutcomeKind::WriteFailed,
            ItemOutcome::Cancelled => OutcomeKind::Cancelled,
        }
    }

    /// Only `Saved` counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Saved { .. })
    }

    /// Human-readable cause of a failure.
    pub fn error_detail(&self) -> Option<String> {
        match self {
            ItemOutcome::Saved { .. } => None,
            ItemOutcome::FetchFailed(e) => Some(e.to_string()),
            ItemOutcome::ProcessFailed(e) => Some(e.to_string()),
            ItemOutcome::WriteFailed(e) => Some(e.to_string()),
            ItemOutcome::Cancelled => Some("Cancelled before start".to_string()),
        }
    }

    /// Where the artifact was written, for saved items.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ItemOutcome::Saved { path } => Some(path),
            _ => None,
        }
    }
}

/// Emitted once per item, in input order, after the item reaches a
/// terminal state.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Zero-based position in the item list.
    pub index: usize,
    /// Number of items in the batch.
    pub total: usize,
    /// The item's identifier.
    pub identifier: String,
    /// How the item ended.
    pub outcome: ItemOutcome,
}

impl ProgressEvent {
    /// Number of items finished so far, including this one.
    pub fn completed(&self) -> usize {
        self.index + 1
    }

    /// Fraction of the batch finished, in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed() as f32 / self.total as f32
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a running batch.
///
/// The runner checks it between items only; an item in flight always
/// finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
