//! Process-level settings.
//!
//! Resolution order for every cell option, lowest to highest precedence:
//! built-in defaults, the settings installed with [`install_settings`], then
//! the per-cell [`crate::cell::CellOptions`].

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BUNDLED_SCHEMA: &str = include_str!("../settle-cell.schema.json");

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cell: CellDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDefaults {
    /// Treat every rejection as handled unless a cell overrides it.
    #[serde(default)]
    pub suppress_unhandled_diagnostics: bool,
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_prefix() -> String {
    "settle-cell.log".to_string()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    #[default]
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_enabled_true")]
    pub stderr_enabled: bool,
    #[serde(default)]
    pub file: Option<FileLoggingConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_logging_filter(),
            format: LogFormat::default(),
            stderr_enabled: true,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub rotation: LoggingRotation,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            prefix: default_logging_prefix(),
            rotation: LoggingRotation::default(),
        }
    }
}

impl Settings {
    /// Reads a JSON5 settings file, validates it and resolves relative paths
    /// against the file's directory.
    ///
    /// The schema named by a `$schema` key is used when present, the bundled
    /// schema otherwise.
    pub fn load(settings_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(settings_path)
            .with_context(|| format!("failed to read {}", settings_path.display()))?;
        let value: Value = json5::from_str(&content)
            .with_context(|| format!("failed to parse {}", settings_path.display()))?;

        let settings_base = settings_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = load_schema(settings_base, &value)?;
        validate_against_schema(&value, &schema)?;

        let mut settings: Settings =
            serde_json::from_value(value).context("failed to deserialize settings")?;
        if let Some(file) = settings.logging.file.as_mut()
            && !file.dir.is_absolute()
        {
            file.dir = settings_base.join(&file.dir);
        }

        Ok(settings)
    }

    pub fn from_json5(content: &str) -> Result<Self> {
        let value: Value = json5::from_str(content).context("failed to parse settings")?;
        validate_against_schema(&value, &bundled_schema()?)?;
        serde_json::from_value(value).context("failed to deserialize settings")
    }
}

/// Replaces the process-wide settings, returning the previous ones. Cells
/// read the installed defaults at construction time.
pub fn install_settings(settings: Settings) -> Settings {
    let mut guard = SETTINGS.write().unwrap_or_else(PoisonError::into_inner);
    let previous = std::mem::replace(&mut *guard, settings);
    tracing::debug!(
        target: "settle_cell::config",
        suppress_unhandled_diagnostics = guard.cell.suppress_unhandled_diagnostics,
        "settings_installed"
    );
    previous
}

pub fn settings() -> Settings {
    SETTINGS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn cell_defaults() -> CellDefaults {
    SETTINGS.read().unwrap_or_else(PoisonError::into_inner).cell
}

fn bundled_schema() -> Result<Value> {
    serde_json::from_str(BUNDLED_SCHEMA).context("failed to parse bundled settings schema")
}

fn load_schema(settings_base: &Path, settings_value: &Value) -> Result<Value> {
    let Some(path_text) = settings_value.get("$schema").and_then(|value| value.as_str()) else {
        return bundled_schema();
    };

    let configured = PathBuf::from(path_text);
    let schema_path = if configured.is_absolute() {
        configured
    } else {
        settings_base.join(configured)
    };
    let schema_content = fs::read_to_string(&schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))
}

fn validate_against_schema(settings_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(settings_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("settings validation failed: {}", messages.join("; ")))
        }
    }
}
