//! Modular pipeline YAML generation
//!
//! Assembles a pipeline definition from a code source, a build job, an
//! artifact upload step and an optional deploy job. Variables extracted from
//! a description act as suggested defaults; explicit options always win.
//!
//! # Example
//!
//! ```
//! use flowcraft::generator::{generate, BuildLanguage, BuildTool, DeployTarget, PipelineOptions};
//! use flowcraft::nlp::VariableKey;
//! use flowcraft::FlowcraftConfig;
//!
//! let options = PipelineOptions::new(BuildLanguage::Java, BuildTool::Maven)
//!     .with_deploy_target(DeployTarget::K8s)
//!     .with_variable(VariableKey::Namespace, "prod");
//!
//! let yaml = generate(&options, &FlowcraftConfig::default()).unwrap();
//! assert!(yaml.contains("namespace: prod"));
//! ```

mod error;
pub mod render;
pub mod templates;

pub use error::GenerateError;

use crate::config::FlowcraftConfig;
use crate::nlp::variables::{VariableKey, Variables};
use crate::nlp::PipelineDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use templates::{
    defaults_of, find_build_template, find_deploy_template, find_source_template,
    find_upload_template,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildLanguage {
    Java,
    Nodejs,
    Python,
    Go,
    Dotnet,
}

impl BuildLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildLanguage::Java => "java",
            BuildLanguage::Nodejs => "nodejs",
            BuildLanguage::Python => "python",
            BuildLanguage::Go => "go",
            BuildLanguage::Dotnet => "dotnet",
        }
    }

    /// Maps a detected programming-language label onto a buildable language
    pub fn from_detected(label: &str) -> Option<Self> {
        match label {
            "java" => Some(BuildLanguage::Java),
            "nodejs" => Some(BuildLanguage::Nodejs),
            "python" => Some(BuildLanguage::Python),
            "go" => Some(BuildLanguage::Go),
            "csharp" => Some(BuildLanguage::Dotnet),
            _ => None,
        }
    }

    pub fn default_tool(&self) -> BuildTool {
        match self {
            BuildLanguage::Java => BuildTool::Maven,
            BuildLanguage::Nodejs => BuildTool::Npm,
            BuildLanguage::Python => BuildTool::Pip,
            BuildLanguage::Go => BuildTool::Go,
            BuildLanguage::Dotnet => BuildTool::Dotnet,
        }
    }

    pub fn supports(&self, tool: BuildTool) -> bool {
        matches!(
            (self, tool),
            (BuildLanguage::Java, BuildTool::Maven | BuildTool::Gradle)
                | (BuildLanguage::Nodejs, BuildTool::Npm | BuildTool::Yarn)
                | (BuildLanguage::Python, BuildTool::Pip)
                | (BuildLanguage::Go, BuildTool::Go)
                | (BuildLanguage::Dotnet, BuildTool::Dotnet)
        )
    }
}

impl FromStr for BuildLanguage {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(BuildLanguage::Java),
            "nodejs" | "node" => Ok(BuildLanguage::Nodejs),
            "python" => Ok(BuildLanguage::Python),
            "go" | "golang" => Ok(BuildLanguage::Go),
            "dotnet" | "csharp" => Ok(BuildLanguage::Dotnet),
            _ => Err(GenerateError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
    Npm,
    Yarn,
    Pip,
    Go,
    Dotnet,
}

impl BuildTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTool::Maven => "maven",
            BuildTool::Gradle => "gradle",
            BuildTool::Npm => "npm",
            BuildTool::Yarn => "yarn",
            BuildTool::Pip => "pip",
            BuildTool::Go => "go",
            BuildTool::Dotnet => "dotnet",
        }
    }
}

impl FromStr for BuildTool {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maven" | "mvn" => Ok(BuildTool::Maven),
            "gradle" => Ok(BuildTool::Gradle),
            "npm" => Ok(BuildTool::Npm),
            "yarn" => Ok(BuildTool::Yarn),
            "pip" => Ok(BuildTool::Pip),
            "go" => Ok(BuildTool::Go),
            "dotnet" => Ok(BuildTool::Dotnet),
            _ => Err(GenerateError::UnsupportedBuildTool(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployTarget {
    Vm,
    K8s,
    #[default]
    None,
}

impl DeployTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployTarget::Vm => "vm",
            DeployTarget::K8s => "k8s",
            DeployTarget::None => "none",
        }
    }

    /// Maps an inferred `deployTarget` variable onto a deployable target
    pub fn from_inferred(value: &str) -> Self {
        match value {
            "kubernetes" | "k8s" => DeployTarget::K8s,
            "vm" => DeployTarget::Vm,
            _ => DeployTarget::None,
        }
    }
}

impl FromStr for DeployTarget {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vm" | "host" => Ok(DeployTarget::Vm),
            "k8s" | "kubernetes" => Ok(DeployTarget::K8s),
            "none" => Ok(DeployTarget::None),
            _ => Err(GenerateError::UnsupportedDeployTarget(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UploadType {
    #[default]
    #[serde(rename = "packages")]
    Packages,
    #[serde(rename = "flowPublic")]
    FlowPublic,
}

impl UploadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadType::Packages => "packages",
            UploadType::FlowPublic => "flowPublic",
        }
    }
}

impl FromStr for UploadType {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "packages" => Ok(UploadType::Packages),
            "flowPublic" | "flowpublic" => Ok(UploadType::FlowPublic),
            _ => Err(GenerateError::UnsupportedUploadType(s.to_string())),
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(BuildLanguage, BuildTool, DeployTarget, UploadType);

/// Structured request for one pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOptions {
    pub build_language: BuildLanguage,
    pub build_tool: BuildTool,
    pub deploy_target: DeployTarget,
    pub upload_type: UploadType,
    pub variables: Variables,
}

impl PipelineOptions {
    pub fn new(build_language: BuildLanguage, build_tool: BuildTool) -> Self {
        Self {
            build_language,
            build_tool,
            deploy_target: DeployTarget::None,
            upload_type: UploadType::Packages,
            variables: Variables::new(),
        }
    }

    /// Derives options from a parsed description
    ///
    /// The first buildable language wins. Every extracted variable is
    /// carried over.
    pub fn from_descriptor(descriptor: &PipelineDescriptor) -> Result<Self, GenerateError> {
        let language = descriptor
            .programming_languages
            .iter()
            .find_map(|label| BuildLanguage::from_detected(label))
            .ok_or(GenerateError::MissingBuildLanguage)?;

        Ok(Self::for_language(language, descriptor))
    }

    /// Derives options for a fixed language from a parsed description
    ///
    /// The build tool is the first detected tool the language supports,
    /// falling back to its default.
    pub fn for_language(language: BuildLanguage, descriptor: &PipelineDescriptor) -> Self {
        let tool = descriptor
            .build_tools
            .iter()
            .filter_map(|label| label.parse::<BuildTool>().ok())
            .find(|tool| language.supports(*tool))
            .unwrap_or_else(|| language.default_tool());

        let deploy_target = descriptor
            .variables
            .get(VariableKey::DeployTarget)
            .map(DeployTarget::from_inferred)
            .unwrap_or_default();

        let upload_type = descriptor
            .variables
            .get(VariableKey::UploadType)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        debug!(
            language = %language,
            tool = %tool,
            deploy_target = %deploy_target,
            upload_type = %upload_type,
            "Derived pipeline options from description"
        );

        Self {
            build_language: language,
            build_tool: tool,
            deploy_target,
            upload_type,
            variables: descriptor.variables.clone(),
        }
    }

    pub fn with_deploy_target(mut self, deploy_target: DeployTarget) -> Self {
        self.deploy_target = deploy_target;
        self
    }

    pub fn with_upload_type(mut self, upload_type: UploadType) -> Self {
        self.upload_type = upload_type;
        self
    }

    pub fn with_variable(mut self, key: VariableKey, value: impl Into<String>) -> Self {
        self.variables.set(key, value);
        self
    }

    /// Layers suggested defaults underneath the explicit variables
    pub fn merge_defaults(&mut self, defaults: &Variables) {
        self.variables.fill_from(defaults);
    }

    fn keywords(&self) -> Vec<String> {
        let mut keywords = vec![
            self.build_language.as_str().to_string(),
            self.build_tool.as_str().to_string(),
        ];
        if let Some(url) = self.variables.get(VariableKey::RepoUrl) {
            keywords.push(url.to_string());
        }
        keywords
    }
}

/// Renders the pipeline YAML for `options`
pub fn generate(
    options: &PipelineOptions,
    config: &FlowcraftConfig,
) -> Result<String, GenerateError> {
    let keywords = options.keywords();
    let languages = vec![options.build_language.as_str().to_string()];
    let tools = vec![options.build_tool.as_str().to_string()];

    let source = find_source_template(&keywords);
    let build = find_build_template(&keywords, &languages, &tools).ok_or_else(|| {
        GenerateError::NoBuildTemplate {
            language: options.build_language.to_string(),
            tool: options.build_tool.to_string(),
        }
    })?;
    let upload = find_upload_template(options.upload_type.as_str());
    let deploy = match options.deploy_target {
        DeployTarget::None => None,
        target => find_deploy_template(&[target.as_str().to_string()]),
    };

    debug!(
        source = source.kind,
        build = build.kind,
        upload = upload.kind,
        deploy = deploy.map(|d| d.kind),
        "Selected pipeline templates"
    );

    // Later layers win: source < build < upload < deploy < explicit
    let mut variables = options.variables.clone();
    let mut layers = vec![
        defaults_of(upload.defaults),
        defaults_of(build.defaults),
        defaults_of(source.defaults),
    ];
    if let Some(deploy) = deploy {
        layers.insert(0, defaults_of(deploy.defaults));
    }
    for layer in &layers {
        variables.fill_from(layer);
    }
    // The upload body is chosen by the requested type, not by an extracted default
    variables.set(VariableKey::UploadType, upload.kind);
    render::quote_versions(&mut variables);

    let mut pipeline = source.body.to_string();
    pipeline.push_str("\n\nstages:\n  build_stage:\n    name: 构建阶段\n    jobs:\n");
    pipeline.push_str(build.body);
    pipeline.push('\n');
    pipeline.push_str(upload.body);

    if let Some(deploy) = deploy {
        pipeline.push_str("\n\n  deploy_stage:\n    name: 部署阶段\n    jobs:\n");
        pipeline.push_str(deploy.body);
    }

    let pipeline = pipeline
        .replace("%RUNNER_GROUP%", &config.runner_group)
        .replace("%BUILD_IMAGE%", &config.build_image)
        .replace("%DOTNET_IMAGE%", &config.dotnet_image);

    let mut yaml = render::render(&pipeline, &variables);
    yaml.push('\n');
    Ok(yaml)
}
