//! Error types for Spritepad.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Carry the offending URL, path, or identifier so a failure report is actionable
//! - Stay per-stage (fetch, process, write) so the runner can classify outcomes
//! - Serialize cleanly into a batch report as their `Display` text

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Spritepad.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum SpritepadError {
    /// Loading the batch configuration failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The batch was rejected as a whole.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// An item could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// An item could not be composed.
    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    /// An artifact could not be stored.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Problems with the identifier placeholder of a URL template.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateError {
    /// No placeholder at all.
    #[error("URL template has no {{name}} placeholder")]
    MissingPlaceholder,

    /// More than one placeholder.
    #[error("URL template has {0} {{name}} placeholders, expected exactly one")]
    MultiplePlaceholders(usize),

    /// The identifier to substitute is blank.
    #[error("Identifier is empty")]
    EmptyIdentifier,
}

/// Errors while retrieving the raw bytes of an item.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be built.
    #[error("Invalid URL template: {0}")]
    Template(#[from] TemplateError),

    /// No response within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// DNS, connect, or other transport failure.
    #[error("Connection to {url} failed: {reason}")]
    Connection {
        /// Requested URL.
        url: String,
        /// Underlying cause.
        reason: String,
    },

    /// The server answered with anything but 200.
    #[error("Request to {url} failed with status code: {status}")]
    BadStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be read in full.
    #[error("Failed to read response body from {url}: {reason}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying cause.
        reason: String,
    },
}

impl FetchError {
    /// HTTP status code, when the server answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors while turning fetched bytes into the final artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Unrecognized or corrupt image data.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The decoded image has a zero dimension.
    #[error("Source image has invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Fitting truncated one axis to zero.
    #[error("Resized content collapses to {width}x{height}")]
    EmptyResize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Errors while persisting an artifact.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The identifier would not map to a file inside the output directory.
    #[error("Identifier '{identifier}' is not a plain file name")]
    InvalidIdentifier {
        /// Offending identifier.
        identifier: String,
    },

    /// Filesystem write failure.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors loading a batch configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a batch.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// Configuration field name.
        field: String,
        /// Underlying cause.
        reason: String,
    },
}

/// Errors that abort a whole batch.
///
/// These are raised before the first item is touched; once items are being
/// processed every failure is recorded per item instead.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Nothing to run.
    #[error("No items to download")]
    EmptyItemList,

    /// Validation reported an error.
    #[error("Batch validation failed: {0}")]
    ValidationFailed(ValidationError),

    /// The background worker panicked.
    #[error("Batch worker terminated unexpectedly")]
    WorkerPanicked,
}

/// Errors from pre-run validation.
///
/// Validation errors are caught before any network traffic, allowing users
/// to fix their input before wasting time on downloads.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// The item list is empty.
    #[error("Item list is empty")]
    EmptyItemList,

    /// A size has a zero dimension.
    #[error("{field} must be at least 1x1, got {width}x{height}")]
    ZeroSize {
        /// Configuration field name.
        field: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// A size exceeds the per-axis limit.
    #[error("{field} {width}x{height} exceeds the {limit}x{limit} limit")]
    TooLarge {
        /// Configuration field name.
        field: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Largest accepted dimension.
        limit: u32,
    },
}

impl ValidationError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::EmptyItemList => {
                Some("Add at least one identifier, one per line".to_string())
            }
            ValidationError::ZeroSize { field, .. } => {
                Some(format!("Set '{}' to a positive size such as 350x350", field))
            }
            ValidationError::TooLarge { field, limit, .. } => Some(format!(
                "Keep '{}' within {}x{} pixels",
                field, limit, limit
            )),
        }
    }
}

// ============================================================================
// Validation Report
// ============================================================================

/// Comprehensive validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether validation passed without errors.
    pub success: bool,
    /// List of errors found.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<ValidationWarning>,
}

/// Non-fatal validation warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Identifier that triggered the warning, if applicable.
    pub identifier: Option<String>,
    /// Suggestion for addressing the warning.
    pub suggestion: Option<String>,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.success = false;
        self.errors.push(error);
    }

    /// Add a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Check if the batch can run.
    pub fn can_run(&self) -> bool {
        self.success
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            if self.warnings.is_empty() {
                "✓ Batch is valid and ready to run".to_string()
            } else {
                format!("✓ Batch is valid with {} warning(s)", self.warnings.len())
            }
        } else {
            format!("✗ Validation failed with {} error(s)", self.errors.len())
        }
    }

    /// Get detailed error messages with suggestions.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| {
                let mut msg = format!("{}. {}", i + 1, error);
                if let Some(fix) = error.suggested_fix() {
                    msg.push_str(&format!("\n   → Suggestion: {}", fix));
                }
                msg
            })
            .collect()
    }

    /// Turn the first error into a batch-level failure.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, BatchError> {
        match self.errors.into_iter().next() {
            Some(ValidationError::EmptyItemList) => Err(BatchError::EmptyItemList),
            Some(error) => Err(BatchError::ValidationFailed(error)),
            None => Ok(self.warnings),
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_display() {
        let error = TemplateError::MultiplePlaceholders(2);
        assert_eq!(
            error.to_string(),
            "URL template has 2 {name} placeholders, expected exactly one"
        );
        assert_eq!(
            TemplateError::MissingPlaceholder.to_string(),
            "URL template has no {name} placeholder"
        );
    }

    #[test]
    fn test_fetch_error_status() {
        let error = FetchError::BadStatus {
            url: "https://example.com/1.png".to_string(),
            status: 404,
        };
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("404"));

        let error = FetchError::Timeout {
            url: "https://example.com/1.png".to_string(),
        };
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_validation_error_suggestions() {
        let error = ValidationError::ZeroSize {
            field: "canvas_size".to_string(),
            width: 0,
            height: 10,
        };
        assert!(error.suggested_fix().unwrap().contains("canvas_size"));
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        assert!(report.can_run());

        report.add_error(ValidationError::EmptyItemList);
        assert!(!report.can_run());
        assert_eq!(report.errors.len(), 1);
        assert!(report.detailed_errors()[0].contains("Suggestion"));
    }

    #[test]
    fn test_report_into_result() {
        let mut report = ValidationReport::new();
        report.add_warning(ValidationWarning {
            message: "duplicate".to_string(),
            identifier: Some("1".to_string()),
            suggestion: None,
        });
        assert_eq!(report.clone().into_result().unwrap().len(), 1);

        report.add_error(ValidationError::EmptyItemList);
        assert!(matches!(report.into_result(), Err(BatchError::EmptyItemList)));
    }
}
