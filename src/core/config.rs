//! Batch configuration.
//!
//! A batch is described by the URL template, the item list, the output
//! directory, and the composition and fetch settings. The same structure is
//! read from a TOML file for scripted runs and assembled from command line
//! flags for ad-hoc runs.

use crate::core::error::ConfigError;
use crate::core::types::{Color, ItemRequest, Size, UrlTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = "UniversalBatchDownloader/1.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "downloaded_assets";

/// Largest accepted canvas or content dimension, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Geometry and background of the produced canvases.
///
/// Immutable for the duration of a run and shared by every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Size of the output canvas.
    pub canvas_size: Size,
    /// Bounding box the content is scaled to fit.
    pub max_content_size: Size,
    /// Fill for the area not covered by content.
    pub padding_color: Color,
}

impl CompositionConfig {
    /// Create a config from its parts.
    pub fn new(canvas_size: Size, max_content_size: Size, padding_color: Color) -> Self {
        Self {
            canvas_size,
            max_content_size,
            padding_color,
        }
    }

    /// Set the canvas size.
    pub fn with_canvas_size(mut self, size: Size) -> Self {
        self.canvas_size = size;
        self
    }

    /// Set the content bounding box.
    pub fn with_max_content_size(mut self, size: Size) -> Self {
        self.max_content_size = size;
        self
    }

    /// Set the padding color.
    pub fn with_padding_color(mut self, color: Color) -> Self {
        self.padding_color = color;
        self
    }
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::square(350),
            max_content_size: Size::square(250),
            padding_color: Color::TRANSPARENT,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Timeout applied to each request, in seconds in the TOML form.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Complete description of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// URL with a `{name}` placeholder.
    pub url_template: UrlTemplate,
    /// Identifiers to download, in order.
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    /// Directory receiving `{identifier}.png` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Canvas geometry and padding.
    #[serde(default)]
    pub composition: CompositionConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub fetch: FetchSettings,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl BatchConfig {
    /// Create a config with default output, composition, and fetch settings.
    pub fn new(url_template: UrlTemplate, items: Vec<ItemRequest>) -> Self {
        Self {
            url_template,
            items,
            output_dir: default_output_dir(),
            composition: CompositionConfig::default(),
            fetch: FetchSettings::default(),
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BatchConfig = toml::from_str(content)?;
        if config.fetch.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "fetch.timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(config)
    }

    /// Load a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// An annotated example configuration file.
    pub fn example_toml() -> &'static str {
        EXAMPLE_TOML
    }
}

const EXAMPLE_TOML: &str = r#"# URL pattern. {name} is replaced by each item.
# Tech icons: "https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/png/{name}.png"
url_template = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{name}.png"

# Items to download. Valid names depend on the source URL.
items = ["1", "4", "7", "25"]

output_dir = "downloaded_assets"

[composition]
# Size of the background canvas.
canvas_size = { width = 350, height = 350 }
# Content is resized to fit this box, keeping its aspect ratio.
# Smaller than canvas_size leaves padding around the content.
max_content_size = { width = 250, height = 250 }
# (0, 0, 0, 0) is fully transparent.
padding_color = { r = 0, g = 0, b = 0, a = 0 }

[fetch]
user_agent = "UniversalBatchDownloader/1.0"
timeout = 10
"#;

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_example_round_trips_defaults() {
        let config = BatchConfig::from_toml_str(BatchConfig::example_toml()).unwrap();
        assert_eq!(config.items.len(), 4);
        assert_eq!(config.items[3].identifier(), "25");
        assert_eq!(config.output_dir, PathBuf::from("downloaded_assets"));
        assert_eq!(config.composition, CompositionConfig::default());
        assert_eq!(config.fetch, FetchSettings::default());
        assert!(config.url_template.check().is_ok());
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = BatchConfig::from_toml_str(
            r#"
            url_template = "https://example.com/{name}.png"
            items = ["a"]

            [composition]
            padding_color = { r = 255, g = 255, b = 255, a = 255 }
            "#,
        )
        .unwrap();
        assert_eq!(config.composition.canvas_size, Size::square(350));
        assert_eq!(config.composition.padding_color, Color::WHITE);
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = BatchConfig::from_toml_str(
            r#"
            url_template = "https://example.com/{name}.png"
            [fetch]
            timeout = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_template_rejected() {
        let err = BatchConfig::from_toml_str("items = [\"a\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "url_template = \"https://x/{{name}}.png\"\nitems = [\"7\"]").unwrap();
        let config = BatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.items, vec![ItemRequest::new("7")]);

        let err = BatchConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
