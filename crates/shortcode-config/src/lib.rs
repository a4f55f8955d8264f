use serde::{Deserialize, Serialize};
use shortcode_engine::{ErrorBehavior, Placement, set_error_behavior};
use std::{
    borrow::Cow,
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read template for [{tag}] at {template_path}: {source}")]
    TemplateReadError {
        tag: String,
        template_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Handler [{tag}] needs exactly one of `template` or `file`")]
    TemplateSourceError { tag: String },
}

/// A handler defined in configuration rather than code.
///
/// `{content}` in the template is replaced by the enclosed content and
/// `{key}` by the value of argument `key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Read the template from this file instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl TemplateSpec {
    pub fn inline(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// The template text, reading `file` if that is how it was given.
    pub fn body(&self, tag: &str) -> Result<Cow<'_, str>, ConfigError> {
        match (&self.template, &self.file) {
            (Some(template), None) => Ok(Cow::Borrowed(template.as_str())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Cow::Owned).map_err(|source| {
                ConfigError::TemplateReadError {
                    tag: tag.to_string(),
                    template_path: path.clone(),
                    source,
                }
            }),
            _ => Err(ConfigError::TemplateSourceError {
                tag: tag.to_string(),
            }),
        }
    }
}

fn default_registry() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// What happens to shortcodes nobody registered.
    #[serde(default)]
    pub error_behavior: ErrorBehavior,
    /// Name of the registry handlers are installed into.
    #[serde(default = "default_registry")]
    pub registry: String,
    #[serde(default)]
    pub handlers: BTreeMap<String, TemplateSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_behavior: ErrorBehavior::default(),
            registry: default_registry(),
            handlers: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in template file paths
        for spec in config.handlers.values_mut() {
            if let Some(file) = spec.file.take() {
                spec.file = Some(Self::expand_path(&file).unwrap_or(file));
            }
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/shortcode-engine");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Makes this config's policy the process-wide one.
    pub fn apply(&self) {
        set_error_behavior(self.error_behavior);
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
