//! Validation module for pre-run checking.
//!
//! The validation pipeline runs before any item is fetched to catch input
//! errors early. Errors abort the batch; warnings are reported and the batch
//! proceeds.

pub mod pipeline;
pub mod stages;

pub use pipeline::{validate_batch, ValidationPipeline};
pub use stages::{BatchInput, GeometryValidation, ItemListValidation, TemplateValidation, ValidationStage};
