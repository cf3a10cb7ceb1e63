//! # Spritepad - Batch Icon and Sprite Preparation
//!
//! Spritepad downloads a list of remote images from a URL pattern and
//! normalizes each one into a fixed-size, padded, transparent canvas.
//!
//! ## Features
//!
//! - **URL Templates**: One `{name}` placeholder, substituted per item
//! - **Aspect-preserving Fit**: Content is scaled (up or down) to fit a bounding box
//! - **Centered Padding**: Content is centered on a canvas filled with any RGBA color
//! - **Isolated Failures**: A bad item is recorded and the batch moves on
//! - **Background Runs**: Progress events stream over a channel from a worker thread
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spritepad::prelude::*;
//!
//! let items = parse_item_list("1\n4\n7\n25");
//! let template = UrlTemplate::new(
//!     "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{name}.png",
//! );
//! let storage = DirectoryStorage::new("downloaded_assets");
//! let runner = BatchRunner::new(HttpFetcher::default());
//!
//! let result = runner.run(&items, &template, &CompositionConfig::default(), &storage, |event| {
//!     println!("{}/{} {}", event.completed(), event.total, event.identifier);
//! })?;
//! println!("{} of {} saved", result.success_count, result.total_count);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Value types, configuration, and error handling
//! - [`fetch`]: The fetch capability and its HTTP implementation
//! - [`compose`]: Decode, fit, center, and encode
//! - [`storage`]: The storage capability and its filesystem implementation
//! - [`validation`]: Pre-run checks
//! - [`execution`]: The batch runner, progress events, and background runs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compose;
pub mod core;
pub mod execution;
pub mod fetch;
pub mod storage;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use spritepad::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{parse_item_list, Color, ItemRequest, Size, UrlTemplate};

    // Configuration
    pub use crate::core::config::{BatchConfig, CompositionConfig, FetchSettings};

    // Errors
    pub use crate::core::error::{
        BatchError, ConfigError, FetchError, ProcessError, SpritepadError, TemplateError,
        ValidationError, ValidationReport, ValidationWarning, WriteError,
    };

    // Capabilities
    pub use crate::fetch::{Fetcher, HttpFetcher, RawImage};
    pub use crate::storage::{AssetStorage, DirectoryStorage, MemoryStorage};

    // Composition
    pub use crate::compose::{Compositor, OutputArtifact};

    // Validation
    pub use crate::validation::{validate_batch, ValidationPipeline, ValidationStage};

    // Execution
    pub use crate::execution::{
        spawn_batch, BatchEvent, BatchHandle, BatchJob, BatchResult, BatchRunner, BatchSummary,
        CancelToken, ItemOutcome, ItemRecord, OutcomeKind, ProgressEvent,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "spritepad");
    }

    #[test]
    fn test_prelude_pipeline_wiring() {
        let runner = BatchRunner::new(HttpFetcher::default());
        let storage = MemoryStorage::new();
        let result = runner.run(
            &parse_item_list(""),
            &UrlTemplate::new("https://example.com/{name}.png"),
            &CompositionConfig::default(),
            &storage,
            |_| {},
        );
        assert!(matches!(result, Err(BatchError::EmptyItemList)));
    }
}
