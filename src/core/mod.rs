//! Core types, configuration, and error handling.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BatchConfig, CompositionConfig, FetchSettings};
pub use error::{
    BatchError, ConfigError, FetchError, ProcessError, SpritepadError, TemplateError,
    ValidationError, ValidationReport, ValidationWarning, WriteError,
};
pub use types::{parse_item_list, Color, ItemRequest, Size, UrlTemplate};
