//! Validation pipeline implementation.

use crate::core::config::CompositionConfig;
use crate::core::error::ValidationReport;
use crate::core::types::{ItemRequest, UrlTemplate};
use crate::validation::stages::{
    BatchInput, GeometryValidation, ItemListValidation, TemplateValidation, ValidationStage,
};

/// Multi-stage validation pipeline.
///
/// Runs a series of validation stages on a batch to check for errors
/// before any network traffic.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ValidationPipeline {
    /// Create a new pipeline with the given stages.
    pub fn new(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// Create the default validation pipeline with all standard stages.
    pub fn default_pipeline() -> Self {
        Self {
            stages: vec![
                Box::new(ItemListValidation),
                Box::new(TemplateValidation),
                Box::new(GeometryValidation),
            ],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    /// Validate a batch through all stages.
    pub fn validate(&self, input: &BatchInput<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();

        for stage in &self.stages {
            match stage.validate(input) {
                Ok(warnings) => {
                    for warning in warnings {
                        report.add_warning(warning);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        report.add_error(error);
                    }
                }
            }
        }

        report
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

/// Validate a batch with the default pipeline.
pub fn validate_batch(
    items: &[ItemRequest],
    template: &UrlTemplate,
    composition: &CompositionConfig,
) -> ValidationReport {
    ValidationPipeline::default_pipeline().validate(&BatchInput {
        items,
        template,
        composition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::core::types::Size;

    fn items(ids: &[&str]) -> Vec<ItemRequest> {
        ids.iter().copied().map(ItemRequest::new).collect()
    }

    #[test]
    fn test_valid_batch() {
        let report = validate_batch(
            &items(&["1", "4", "7", "25"]),
            &UrlTemplate::new("https://example.com/{name}.png"),
            &CompositionConfig::default(),
        );
        assert!(report.can_run());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_errors_from_several_stages_are_collected() {
        let report = validate_batch(
            &[],
            &UrlTemplate::new("https://example.com/{name}.png"),
            &CompositionConfig::default().with_canvas_size(Size::new(0, 10)),
        );
        assert!(!report.can_run());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0], ValidationError::EmptyItemList);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let report = validate_batch(
            &items(&["1", "1"]),
            &UrlTemplate::new("https://example.com/static.png"),
            &CompositionConfig::default().with_max_content_size(Size::square(500)),
        );
        assert!(report.can_run());
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_custom_stage() {
        struct NoPikachu;
        impl ValidationStage for NoPikachu {
            fn name(&self) -> &str {
                "No Pikachu"
            }
            fn validate(
                &self,
                input: &BatchInput<'_>,
            ) -> Result<Vec<crate::core::error::ValidationWarning>, Vec<ValidationError>> {
                match input.items.iter().position(|i| i.identifier() == "25") {
                    Some(index) => Err(vec![ValidationError::ZeroSize {
                        field: format!("item {}", index),
                        width: 0,
                        height: 0,
                    }]),
                    None => Ok(Vec::new()),
                }
            }
        }

        let mut pipeline = ValidationPipeline::new(Vec::new());
        pipeline.add_stage(Box::new(NoPikachu));
        let list = items(&["1", "25"]);
        let report = pipeline.validate(&BatchInput {
            items: &list,
            template: &UrlTemplate::new("{name}"),
            composition: &CompositionConfig::default(),
        });
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].to_string().starts_with("item 1"));
    }
}
