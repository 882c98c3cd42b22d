use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::generator::{BuildLanguage, BuildTool, DeployTarget, UploadType};
use crate::nlp::VariableKey;

/// Turns natural-language pipeline descriptions into pipeline definitions
#[derive(Parser, Debug)]
#[command(
    name = "flowcraft",
    about = "Turns natural-language pipeline descriptions into pipeline definitions",
    version,
    author,
    long_about = "flowcraft reads a free-form (Chinese or English) description of a CI/CD \
                  pipeline, detects its intent and technology stack, extracts configuration \
                  variables and renders a pipeline YAML from modular templates."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Parse a description into a pipeline descriptor",
        long_about = "Detects pipeline types, languages, build tools and deploy targets, and \
                      extracts configuration variables.\n\n\
                      Examples:\n  \
                      flowcraft parse \"Java maven project, deploy to kubernetes\"\n  \
                      echo \"构建并部署到主机\" | flowcraft parse --format json"
    )]
    Parse(ParseArgs),

    #[command(
        about = "Suggest a pipeline name for a description",
        long_about = "Examples:\n  \
                      flowcraft name \"项目名称是 order-service, go build\""
    )]
    Name(NameArgs),

    #[command(
        about = "Generate pipeline YAML",
        long_about = "Renders a pipeline YAML. Flags override values derived from the \
                      description.\n\n\
                      Examples:\n  \
                      flowcraft generate \"nodejs npm, 部署到主机\"\n  \
                      flowcraft generate --language java --tool maven --deploy k8s \\\n    \
                      --set namespace=prod -o pipeline.yaml"
    )]
    Generate(GenerateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    #[arg(
        value_name = "DESCRIPTION",
        help = "Pipeline description (omit or '-' to read stdin)"
    )]
    pub description: Option<String>,

    #[arg(short = 'f', long, value_enum, help = "Output format")]
    pub format: Option<OutputFormatArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct NameArgs {
    #[arg(
        value_name = "DESCRIPTION",
        help = "Pipeline description (omit or '-' to read stdin)"
    )]
    pub description: Option<String>,

    #[arg(short = 'f', long, value_enum, help = "Output format")]
    pub format: Option<OutputFormatArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "DESCRIPTION",
        help = "Pipeline description (omit or '-' to read stdin)"
    )]
    pub description: Option<String>,

    #[arg(short = 'l', long, value_parser = parse_language, help = "Build language")]
    pub language: Option<BuildLanguage>,

    #[arg(short = 't', long, value_parser = parse_tool, help = "Build tool")]
    pub tool: Option<BuildTool>,

    #[arg(short = 'd', long, value_parser = parse_deploy, help = "Deploy target (vm|k8s|none)")]
    pub deploy: Option<DeployTarget>,

    #[arg(
        short = 'u',
        long,
        value_parser = parse_upload,
        help = "Upload type (packages|flowPublic)"
    )]
    pub upload: Option<UploadType>,

    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Set a pipeline variable (camelCase name), may be repeated"
    )]
    pub set: Vec<(VariableKey, String)>,

    #[arg(short = 'n', long, help = "Pipeline name (suggested from the description otherwise)")]
    pub name: Option<String>,

    #[arg(short = 'f', long, value_enum, help = "Output format")]
    pub format: Option<OutputFormatArg>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_language(s: &str) -> Result<BuildLanguage, String> {
    s.parse().map_err(|e: crate::generator::GenerateError| e.to_string())
}

fn parse_tool(s: &str) -> Result<BuildTool, String> {
    s.parse().map_err(|e: crate::generator::GenerateError| e.to_string())
}

fn parse_deploy(s: &str) -> Result<DeployTarget, String> {
    s.parse().map_err(|e: crate::generator::GenerateError| e.to_string())
}

fn parse_upload(s: &str) -> Result<UploadType, String> {
    s.parse().map_err(|e: crate::generator::GenerateError| e.to_string())
}

fn parse_key_value(s: &str) -> Result<(VariableKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim().parse::<VariableKey>()?;
    Ok((key, value.to_string()))
}
