//! Running a batch off the caller's thread.
//!
//! [`spawn_batch`] moves a [`BatchJob`] onto a dedicated worker thread and
//! streams [`BatchEvent`]s back over a channel, so an interactive front end
//! can keep handling input and redraw progress from its own thread. The
//! worker never touches caller state; everything crosses through the
//! channel.

use crate::core::config::CompositionConfig;
use crate::core::error::BatchError;
use crate::core::types::{ItemRequest, UrlTemplate};
use crate::execution::progress::{CancelToken, ProgressEvent};
use crate::execution::runner::{BatchResult, BatchRunner, BatchSummary};
use crate::fetch::Fetcher;
use crate::storage::AssetStorage;
use crossbeam::channel::{self, Receiver};
use log::debug;
use std::thread::{self, JoinHandle};

/// Everything a worker needs to run one batch.
pub struct BatchJob<F, S> {
    /// Runner to drive; its cancel token becomes the handle's.
    pub runner: BatchRunner<F>,
    /// Items in run order.
    pub items: Vec<ItemRequest>,
    /// URL pattern the items are fetched from.
    pub template: UrlTemplate,
    /// Canvas geometry and padding.
    pub config: CompositionConfig,
    /// Where finished artifacts go.
    pub storage: S,
}

/// Messages from a running batch.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// The worker picked up the batch.
    Started {
        /// Number of items in the batch.
        total: usize,
    },
    /// One item reached a terminal state.
    Item(ProgressEvent),
    /// All items are accounted for.
    Finished(BatchSummary),
    /// The batch was rejected before any item ran.
    Aborted(String),
}

/// Handle to a batch running on a worker thread.
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancelToken,
    worker: JoinHandle<Result<BatchResult, BatchError>>,
}

impl BatchHandle {
    /// Event stream. Disconnects once the worker finishes.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Ask the worker to stop before its next item.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clonable token for cancelling from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker and take its result.
    pub fn join(self) -> Result<BatchResult, BatchError> {
        self.worker.join().map_err(|_| BatchError::WorkerPanicked)?
    }
}

/// Start `job` on a new worker thread.
pub fn spawn_batch<F, S>(job: BatchJob<F, S>) -> BatchHandle
where
    F: Fetcher + 'static,
    S: AssetStorage + 'static,
{
    let (tx, rx) = channel::unbounded();
    let cancel = job.runner.cancel_token();

    let worker = thread::spawn(move || {
        let BatchJob {
            runner,
            items,
            template,
            config,
            storage,
        } = job;

        // Receivers may have hung up; the batch still runs to completion.
        let started = tx.send(BatchEvent::Started { total: items.len() });
        if started.is_err() {
            debug!("Batch event receiver dropped before start");
        }

        let result = runner.run(&items, &template, &config, &storage, |event| {
            let _ = tx.send(BatchEvent::Item(event.clone()));
        });

        let _ = match &result {
            Ok(result) => tx.send(BatchEvent::Finished(result.summary())),
            Err(e) => tx.send(BatchEvent::Aborted(e.to_string())),
        };
        result
    });

    BatchHandle {
        events: rx,
        cancel,
        worker,
    }
}
