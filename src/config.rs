use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Users API endpoint settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Table rendering settings
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub max_cell_width: usize,
    pub show_images: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_cell_width: 48,
            show_images: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// When set, a JSONL transcript of the session is written here
    pub transcripts_dir: Option<PathBuf>,
}

/// Resolved configuration: built-in defaults with every file layer applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub session: SessionConfig,
}

/// `[api]` as written in one config file; unset keys are `None`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiLayer {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DisplayLayer {
    #[serde(default)]
    pub max_cell_width: Option<usize>,
    #[serde(default)]
    pub show_images: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionLayer {
    #[serde(default)]
    pub transcripts_dir: Option<PathBuf>,
}

/// One config file. Only the keys it sets take part in the merge.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigLayer {
    #[serde(default)]
    pub api: ApiLayer,
    #[serde(default)]
    pub display: DisplayLayer,
    #[serde(default)]
    pub session: SessionLayer,
}

impl ConfigLayer {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let layer: ConfigLayer = toml::from_str(&content)?;
        Ok(layer)
    }
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.userlist/config.local.toml) > project (.userlist/config.toml) > user (~/.userlist/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".userlist").join("config.toml");
            if user_config.exists() {
                config.merge(ConfigLayer::load_from(&user_config)?);
            }
        }

        let project_config = Path::new(".userlist").join("config.toml");
        if project_config.exists() {
            config.merge(ConfigLayer::load_from(&project_config)?);
        }

        // Should be gitignored
        let local_config = Path::new(".userlist").join("config.local.toml");
        if local_config.exists() {
            config.merge(ConfigLayer::load_from(&local_config)?);
        }

        Ok(config)
    }

    /// Load configuration from a specific path on top of the built-in defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(ConfigLayer::load_from(path)?);
        Ok(config)
    }

    /// Apply a file layer; every key it sets wins, including default values
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(base_url) = layer.api.base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout_ms) = layer.api.timeout_ms {
            self.api.timeout_ms = timeout_ms;
        }

        if let Some(width) = layer.display.max_cell_width {
            self.display.max_cell_width = width;
        }
        if let Some(show_images) = layer.display.show_images {
            self.display.show_images = show_images;
        }

        if layer.session.transcripts_dir.is_some() {
            self.session.transcripts_dir = layer.session.transcripts_dir;
        }
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: format!("Expected an http:// or https:// URL, got '{}'", url),
            });
        }

        if self.api.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "api.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.display.max_cell_width < 4 {
            errors.push(ValidationError {
                field: "display.max_cell_width".to_string(),
                message: format!("Must be at least 4, got {}", self.display.max_cell_width),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
