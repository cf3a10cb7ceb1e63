//! Sequential batch runner.
//!
//! Items are processed strictly in list order, one at a time:
//! fetch → compose → write. A failure at any stage ends that item only;
//! the runner always moves on and the returned [`BatchResult`] covers every
//! input item exactly once.

use crate::compose::Compositor;
use crate::core::config::CompositionConfig;
use crate::core::error::{BatchError, ValidationWarning};
use crate::core::types::{ItemRequest, UrlTemplate};
use crate::execution::progress::{CancelToken, ItemOutcome, OutcomeKind, ProgressEvent};
use crate::fetch::Fetcher;
use crate::storage::AssetStorage;
use crate::validation::validate_batch;
use log::{debug, error, info};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one item, kept in the batch result.
#[derive(Debug, Clone)]
pub struct ItemRecord {
    /// Position in the input list.
    pub index: usize,
    /// The item's identifier.
    pub identifier: String,
    /// How the item ended.
    pub outcome: ItemOutcome,
}

impl Serialize for ItemRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ItemRecord", 5)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("identifier", &self.identifier)?;
        state.serialize_field("outcome", &self.outcome.kind())?;
        state.serialize_field("path", &self.outcome.path())?;
        state.serialize_field("error", &self.outcome.error_detail())?;
        state.end()
    }
}

/// Tallies and per-item outcomes of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    /// Number of input items.
    pub total_count: usize,
    /// Items that ended in `Saved`.
    pub success_count: usize,
    /// Items that ended in any other state.
    pub failure_count: usize,
    /// Whether cancellation stopped the batch early.
    pub cancelled: bool,
    /// Per-item outcomes in input order.
    pub items: Vec<ItemRecord>,
    /// Non-fatal validation findings.
    pub warnings: Vec<ValidationWarning>,
    /// Wall time of the item loop.
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

impl BatchResult {
    fn record(&mut self, record: ItemRecord) {
        if record.outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        if record.outcome.kind() == OutcomeKind::Cancelled {
            self.cancelled = true;
        }
        self.items.push(record);
    }

    /// Records that did not end in `Saved`.
    pub fn failures(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.iter().filter(|r| !r.outcome.is_success())
    }

    /// Count of items that ended in `kind`.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.items
            .iter()
            .filter(|r| r.outcome.kind() == kind)
            .count()
    }

    /// Compact totals for display.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total_count,
            success: self.success_count,
            failure: self.failure_count,
            cancelled: self.cancelled,
        }
    }
}

/// Final totals of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Number of input items.
    pub total: usize,
    /// Items saved.
    pub success: usize,
    /// Items not saved.
    pub failure: usize,
    /// Whether cancellation cut the batch short.
    pub cancelled: bool,
}

/// Drives the fetch → compose → write pipeline over a list of items.
pub struct BatchRunner<F> {
    fetcher: F,
    compositor: Compositor,
    cancel: CancelToken,
}

impl<F: Fetcher> BatchRunner<F> {
    /// Create a runner around a fetch capability.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            compositor: Compositor::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Use a specific compositor.
    pub fn with_compositor(mut self, compositor: Compositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Observe an externally owned cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this runner between items.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the batch.
    ///
    /// Fails only when validation rejects the input (for example, an empty
    /// item list). Otherwise every item yields one [`ProgressEvent`] and one
    /// [`ItemRecord`], in input order.
    pub fn run<S, P>(
        &self,
        items: &[ItemRequest],
        template: &UrlTemplate,
        config: &CompositionConfig,
        storage: &S,
        mut on_progress: P,
    ) -> Result<BatchResult, BatchError>
    where
        S: AssetStorage + ?Sized,
        P: FnMut(&ProgressEvent),
    {
        let warnings = validate_batch(items, template, config).into_result()?;
        for warning in &warnings {
            debug!("Validation warning: {}", warning.message);
        }

        let start = Instant::now();
        let total = items.len();
        info!("Starting batch of {} item(s) from {}", total, template);

        // Writes will fail and be recorded per item
        if let Err(e) = storage.prepare() {
            error!("Output storage is not ready: {}", e);
        }

        let mut result = BatchResult {
            total_count: total,
            warnings,
            ..BatchResult::default()
        };

        for (index, item) in items.iter().enumerate() {
            let outcome = if self.cancel.is_cancelled() {
                ItemOutcome::Cancelled
            } else {
                self.process_item(item, template, config, storage)
            };

            match &outcome {
                ItemOutcome::Saved { path } => debug!("Saved {} to {}", item, path.display()),
                ItemOutcome::Cancelled => debug!("Skipping {}: batch cancelled", item),
                failed => debug!(
                    "Item {} failed: {}",
                    item,
                    failed.error_detail().unwrap_or_default()
                ),
            }

            let event = ProgressEvent {
                index,
                total,
                identifier: item.identifier().to_string(),
                outcome,
            };
            on_progress(&event);

            result.record(ItemRecord {
                index,
                identifier: event.identifier,
                outcome: event.outcome,
            });
        }

        result.elapsed = start.elapsed();
        info!(
            "Batch finished: {} total, {} succeeded, {} failed",
            result.total_count, result.success_count, result.failure_count
        );
        Ok(result)
    }

    /// Carry one item to a terminal state.
    pub fn process_item<S>(
        &self,
        item: &ItemRequest,
        template: &UrlTemplate,
        config: &CompositionConfig,
        storage: &S,
    ) -> ItemOutcome
    where
        S: AssetStorage + ?Sized,
    {
        let identifier = item.identifier();

        let raw = match self.fetcher.fetch(template, identifier) {
            Ok(raw) => raw,
            Err(e) => return ItemOutcome::FetchFailed(e),
        };

        let artifact = match self.compositor.compose(&raw, config) {
            Ok(artifact) => artifact,
            Err(e) => return ItemOutcome::ProcessFailed(e),
        };
        debug!(
            "Composed {}: content {} at {:?}",
            identifier, artifact.content_size, artifact.offset
        );

        match storage.write(identifier, &artifact.encoded) {
            Ok(path) => ItemOutcome::Saved { path },
            Err(e) => ItemOutcome::WriteFailed(Arc::new(e)),
        }
    }
}
