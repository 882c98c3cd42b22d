use thiserror::Error;

/// Errors raised while turning pipeline options into YAML
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// No supported build language was given or detected
    #[error("Build language is missing. Specify one of: java, nodejs, python, go, dotnet")]
    MissingBuildLanguage,

    #[error("Unsupported build language: {0}. Valid options: java, nodejs, python, go, dotnet")]
    UnsupportedLanguage(String),

    #[error("Unsupported build tool: {0}. Valid options: maven, gradle, npm, yarn, pip, go, dotnet")]
    UnsupportedBuildTool(String),

    #[error("Unsupported deploy target: {0}. Valid options: vm, k8s, none")]
    UnsupportedDeployTarget(String),

    #[error("Unsupported upload type: {0}. Valid options: packages, flowPublic")]
    UnsupportedUploadType(String),

    /// No build step template scored for the language/tool pair
    #[error("No build template matches language '{language}' with tool '{tool}'")]
    NoBuildTemplate { language: String, tool: String },
}
