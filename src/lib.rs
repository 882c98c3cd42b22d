//! flowcraft - natural-language CI/CD pipeline descriptions to pipeline YAML
//!
//! This library reads a free-form (mixed Chinese/English) description of a
//! desired pipeline, classifies it against keyword taxonomies, extracts a
//! closed set of configuration variables, suggests a pipeline name and
//! renders pipeline YAML from modular templates.
//!
//! # Core Concepts
//!
//! - **Descriptor**: What a description mentions: pipeline types, languages,
//!   build tools, deploy targets and configuration variables
//! - **Variables**: Suggested configuration values keyed by a fixed set of
//!   camelCase names; explicit caller options always override them
//! - **Templates**: Source, build, upload and deploy fragments stitched into
//!   one pipeline document
//!
//! # Example Usage
//!
//! ```
//! use flowcraft::{generate, parse, suggest_name, FlowcraftConfig, PipelineOptions};
//!
//! let descriptor = parse("nodejs 项目, npm 构建, 部署到主机, 机器组: mg-1");
//! let name = suggest_name(&descriptor);
//! assert_eq!(name, "nodejs部署流水线");
//!
//! let options = PipelineOptions::from_descriptor(&descriptor).unwrap();
//! let yaml = generate(&options, &FlowcraftConfig::default()).unwrap();
//! assert!(yaml.contains("machineGroup: mg-1"));
//! ```
//!
//! # Project Structure
//!
//! - [`nlp`]: Tokenizer, taxonomy matcher, variable extractor and naming
//! - [`generator`]: Template selection and YAML rendering
//! - [`cli`]: Command-line arguments, handlers and output formatting

pub mod cli;
pub mod config;
pub mod generator;
pub mod nlp;
pub mod util;

pub use config::{ConfigError, FlowcraftConfig};
pub use generator::{
    generate, BuildLanguage, BuildTool, DeployTarget, GenerateError, PipelineOptions, UploadType,
};
pub use nlp::{parse, suggest_name, PipelineDescriptor, VariableKey, Variables};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_flowcraft() {
        assert_eq!(NAME, "flowcraft");
    }
}
