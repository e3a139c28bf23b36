//! Flowgen Project Configuration
//!
//! Handles parsing and management of flowgen.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codegen::{CodeGenOptions, DEFAULT_DISPATCH_FUNCTION, DEFAULT_RUN_TIME_PARAM};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "flowgen.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching flowgen.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FlowgenConfig {
    /// Template file set
    #[serde(default)]
    pub template: TemplateConfig,

    /// Runtime entry point used by generated accessors
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Generated file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl FlowgenConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: FlowgenConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading config");
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Code formatting options for generated accessors.
    pub fn codegen_options(&self) -> CodeGenOptions {
        CodeGenOptions {
            indent_size: self.output.indent_size,
            use_tabs: self.output.use_tabs,
            emit_comments: self.output.comments,
            ..CodeGenOptions::default()
        }
    }
}

/// Template file set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateConfig {
    /// Prefix shared by all template files and identifiers
    #[serde(default = "default_template_prefix")]
    pub prefix: String,

    /// Directory holding the template files
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Source file extension, dot included
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Module names; each template is `<prefix><module><extension>`
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
}

fn default_template_prefix() -> String {
    "Template".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    ".java".to_string()
}

fn default_modules() -> Vec<String> {
    ["Main", "Mapping", "Imaging", "Driver", "GUI"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            prefix: default_template_prefix(),
            dir: default_dir(),
            extension: default_extension(),
            modules: default_modules(),
        }
    }
}

/// Runtime entry point called by generated accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Function taking an instruction index and an optional run time
    #[serde(default = "default_dispatch_function")]
    pub function: String,

    /// Parameter name of the run time on timed accessors
    #[serde(default = "default_run_time_param")]
    pub run_time_param: String,
}

fn default_dispatch_function() -> String {
    DEFAULT_DISPATCH_FUNCTION.to_string()
}

fn default_run_time_param() -> String {
    DEFAULT_RUN_TIME_PARAM.to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            function: default_dispatch_function(),
            run_time_param: default_run_time_param(),
        }
    }
}

/// Generated file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Directory generated files are written to
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Indent size of generated accessors
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Indent generated accessors with tabs
    #[serde(default)]
    pub use_tabs: bool,

    /// Precede each lookup table with a comment giving its shape
    #[serde(default)]
    pub comments: bool,
}

fn default_indent_size() -> usize {
    4
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            indent_size: default_indent_size(),
            use_tabs: false,
            comments: false,
        }
    }
}
