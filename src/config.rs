//! Configuration management for flowcraft
//!
//! Settings are loaded from environment variables with sensible defaults.
//! They cover logging, the runner group and container images written into
//! generated pipelines, and the default CLI output format.
//!
//! # Environment Variables
//!
//! - `FLOWCRAFT_LOG_LEVEL`: Logging level - default: "info"
//! - `FLOWCRAFT_LOG_JSON`: JSON log output (true|false) - default: "false"
//! - `FLOWCRAFT_RUNNER_GROUP`: Runner group for build and deploy jobs - default: "public/cn-beijing"
//! - `FLOWCRAFT_BUILD_IMAGE`: Build container image
//! - `FLOWCRAFT_DOTNET_IMAGE`: Container image for .NET builds
//! - `FLOWCRAFT_OUTPUT_FORMAT`: Default CLI output format (json|yaml|human) - default: "human"
//!
//! # Example
//!
//! ```
//! use flowcraft::FlowcraftConfig;
//!
//! let config = FlowcraftConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_RUNNER_GROUP: &str = "public/cn-beijing";
const DEFAULT_BUILD_IMAGE: &str =
    "build-steps-public-registry.cn-beijing.cr.aliyuncs.com/build-steps/alinux3:latest";
const DEFAULT_DOTNET_IMAGE: &str =
    "build-steps-public-registry.cn-beijing.cr.aliyuncs.com/build-steps/dotnetcore:8.0";
const DEFAULT_OUTPUT_FORMAT: &str = "human";

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_OUTPUT_FORMATS: &[&str] = &["json", "yaml", "human"];

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Valid options: json, yaml, human")]
    InvalidOutputFormat(String),

    /// A required setting is present but blank
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowcraftConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,

    /// Runner group every generated job runs on
    pub runner_group: String,

    pub build_image: String,

    /// Container for .NET builds, which the default build image lacks
    pub dotnet_image: String,

    /// Default CLI output format
    pub output_format: String,
}

impl Default for FlowcraftConfig {
    /// Loads from `FLOWCRAFT_*` environment variables, falling back to defaults
    fn default() -> Self {
        let log_level = env::var("FLOWCRAFT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("FLOWCRAFT_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let runner_group = env::var("FLOWCRAFT_RUNNER_GROUP")
            .unwrap_or_else(|_| DEFAULT_RUNNER_GROUP.to_string());

        let build_image =
            env::var("FLOWCRAFT_BUILD_IMAGE").unwrap_or_else(|_| DEFAULT_BUILD_IMAGE.to_string());

        let dotnet_image = env::var("FLOWCRAFT_DOTNET_IMAGE")
            .unwrap_or_else(|_| DEFAULT_DOTNET_IMAGE.to_string());

        let output_format = env::var("FLOWCRAFT_OUTPUT_FORMAT")
            .unwrap_or_else(|_| DEFAULT_OUTPUT_FORMAT.to_string())
            .to_lowercase();

        Self {
            log_level,
            log_json,
            runner_group,
            build_image,
            dotnet_image,
            output_format,
        }
    }
}

impl FlowcraftConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown log level or output format, or a
    /// blank runner group or image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if !VALID_OUTPUT_FORMATS.contains(&self.output_format.as_str()) {
            return Err(ConfigError::InvalidOutputFormat(self.output_format.clone()));
        }

        for (name, value) in [
            ("FLOWCRAFT_RUNNER_GROUP", &self.runner_group),
            ("FLOWCRAFT_BUILD_IMAGE", &self.build_image),
            ("FLOWCRAFT_DOTNET_IMAGE", &self.dotnet_image),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(name));
            }
        }

        Ok(())
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        map.insert("runner_group".to_string(), self.runner_group.clone());
        map.insert("build_image".to_string(), self.build_image.clone());
        map.insert("dotnet_image".to_string(), self.dotnet_image.clone());
        map.insert("output_format".to_string(), self.output_format.clone());

        map
    }
}

impl fmt::Display for FlowcraftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flowcraft Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  JSON Logs: {}", self.log_json)?;
        writeln!(f, "  Runner Group: {}", self.runner_group)?;
        writeln!(f, "  Build Image: {}", self.build_image)?;
        writeln!(f, "  .NET Image: {}", self.dotnet_image)?;
        writeln!(f, "  Output Format: {}", self.output_format)?;
        Ok(())
    }
}
