//! Individual validation stages.
//!
//! Each stage checks for a specific category of problems.

use crate::core::config::{CompositionConfig, MAX_DIMENSION};
use crate::core::error::{ValidationError, ValidationWarning};
use crate::core::types::{ItemRequest, UrlTemplate};
use std::collections::HashMap;

/// Everything a stage may inspect.
#[derive(Debug, Clone, Copy)]
pub struct BatchInput<'a> {
    /// Items in run order.
    pub items: &'a [ItemRequest],
    /// URL pattern the items are fetched from.
    pub template: &'a UrlTemplate,
    /// Canvas geometry and padding.
    pub composition: &'a CompositionConfig,
}

/// Trait for validation stages.
pub trait ValidationStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &str;

    /// Validate the batch.
    ///
    /// Returns Ok with warnings, or Err with errors.
    fn validate(
        &self,
        input: &BatchInput<'_>,
    ) -> Result<Vec<ValidationWarning>, Vec<ValidationError>>;
}

/// Item list validation.
///
/// Verifies the list is not empty.
///
/// Blank identifiers are a warning: those items fail on their own when the
/// URL is rendered. Duplicated identifiers are a warning: the later item
/// overwrites the earlier output file.
pub struct ItemListValidation;

impl ValidationStage for ItemListValidation {
    fn name(&self) -> &str {
        "Item List Validation"
    }

    fn validate(
        &self,
        input: &BatchInput<'_>,
    ) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if input.items.is_empty() {
            return Err(vec![ValidationError::EmptyItemList]);
        }

        let mut warnings: Vec<_> = input
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.identifier().trim().is_empty())
            .map(|(index, _)| ValidationWarning {
                message: format!("Item {} has an empty identifier and will fail", index),
                identifier: None,
                suggestion: Some("Remove blank entries from the item list".to_string()),
            })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for item in input.items {
            if item.identifier().trim().is_empty() {
                continue;
            }
            let count = counts.entry(item.identifier()).or_insert(0);
            if *count == 1 {
                order.push(item.identifier());
            }
            *count += 1;
        }

        warnings.extend(order.into_iter().map(|identifier| ValidationWarning {
            message: format!(
                "'{}' appears {} times; later downloads overwrite {}.png",
                identifier, counts[identifier], identifier
            ),
            identifier: Some(identifier.to_string()),
            suggestion: Some("Remove the duplicate entries".to_string()),
        }));
        Ok(warnings)
    }
}

/// URL template validation.
///
/// A template without exactly one `{name}` placeholder makes every item fail
/// at fetch time. This is reported as a warning so the per-item failures are
/// still recorded by the run.
pub struct TemplateValidation;

impl ValidationStage for TemplateValidation {
    fn name(&self) -> &str {
        "Template Validation"
    }

    fn validate(
        &self,
        input: &BatchInput<'_>,
    ) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        match input.template.check() {
            Ok(()) => Ok(Vec::new()),
            Err(error) => Ok(vec![ValidationWarning {
                message: format!("{}; every item will fail to fetch", error),
                identifier: None,
                suggestion: Some(
                    "Use a URL such as https://example.com/icons/{name}.png".to_string(),
                ),
            }]),
        }
    }
}

/// Canvas geometry validation.
///
/// Verifies both sizes are non-zero and at most [`MAX_DIMENSION`] on each
/// axis. Content larger than the canvas is allowed but warned about: it is
/// centered and cropped.
pub struct GeometryValidation;

impl ValidationStage for GeometryValidation {
    fn name(&self) -> &str {
        "Geometry Validation"
    }

    fn validate(
        &self,
        input: &BatchInput<'_>,
    ) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        let config = input.composition;
        let mut errors = Vec::new();

        for (field, size) in [
            ("canvas_size", config.canvas_size),
            ("max_content_size", config.max_content_size),
        ] {
            if size.is_empty() {
                errors.push(ValidationError::ZeroSize {
                    field: field.to_string(),
                    width: size.width,
                    height: size.height,
                });
            } else if size.width > MAX_DIMENSION || size.height > MAX_DIMENSION {
                errors.push(ValidationError::TooLarge {
                    field: field.to_string(),
                    width: size.width,
                    height: size.height,
                    limit: MAX_DIMENSION,
                });
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        if !config.max_content_size.fits_within(config.canvas_size) {
            return Ok(vec![ValidationWarning {
                message: format!(
                    "max_content_size {} exceeds canvas_size {}; content will be cropped",
                    config.max_content_size, config.canvas_size
                ),
                identifier: None,
                suggestion: Some("Make max_content_size smaller than canvas_size".to_string()),
            }]);
        }

        Ok(Vec::new())
    }
}
