//! Subcommand handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 on any
//! runtime or validation failure. Failures are logged before returning.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info, warn, Level};

use super::commands::{CliArgs, GenerateArgs, NameArgs, OutputFormatArg, ParseArgs};
use super::output::{GeneratedPipeline, OutputFormat, OutputFormatter};
use crate::config::FlowcraftConfig;
use crate::generator::{generate, PipelineOptions};
use crate::nlp::{parse, suggest_name, PipelineDescriptor, Variables};
use crate::util::logging::{parse_level, LoggingConfig};

/// Logging settings from the global flags, falling back to configuration
///
/// `--log-level` wins, then `--verbose` (debug) and `--quiet` (error only),
/// then `FLOWCRAFT_LOG_LEVEL`. JSON output follows `FLOWCRAFT_LOG_JSON`.
pub fn logging_config(args: &CliArgs, config: &FlowcraftConfig) -> LoggingConfig {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    LoggingConfig {
        level,
        use_json: config.log_json,
        ..LoggingConfig::default()
    }
}

pub fn handle_parse(args: &ParseArgs) -> i32 {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let descriptor = match describe(args.description.as_deref(), false) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    let formatter = OutputFormatter::new(resolve_format(args.format, &config));
    match formatter.format_descriptor(&descriptor) {
        Ok(output) => {
            print!("{}", with_newline(output));
            0
        }
        Err(e) => fail(e),
    }
}

pub fn handle_name(args: &NameArgs) -> i32 {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let descriptor = match describe(args.description.as_deref(), false) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    let name = suggest_name(&descriptor);
    info!(name = %name, "Suggested pipeline name");

    let formatter = OutputFormatter::new(resolve_format(args.format, &config));
    match formatter.format_name(&name) {
        Ok(output) => {
            print!("{}", with_newline(output));
            0
        }
        Err(e) => fail(e),
    }
}

pub fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    // Flags alone are enough to generate, so an absent description is allowed
    let descriptor = match describe(args.description.as_deref(), args.language.is_some()) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    let options = match build_options(args, &descriptor) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    info!(
        language = %options.build_language,
        tool = %options.build_tool,
        deploy_target = %options.deploy_target,
        "Generating pipeline"
    );

    let yaml = match generate(&options, &config) {
        Ok(y) => y,
        Err(e) => return fail(e.into()),
    };

    let pipeline = GeneratedPipeline {
        name: args
            .name
            .clone()
            .unwrap_or_else(|| suggest_name(&descriptor)),
        yaml,
    };

    let formatter = OutputFormatter::new(resolve_format(args.format, &config));
    let output = match formatter.format_pipeline(&pipeline) {
        Ok(out) => with_newline(out),
        Err(e) => return fail(e),
    };

    match &args.output {
        Some(path) => match write_output(path, &output) {
            Ok(()) => {
                info!("Output written to: {}", path.display());
                if !quiet {
                    println!("Output written to: {}", path.display());
                }
                0
            }
            Err(e) => fail(e),
        },
        None => {
            print!("{}", output);
            0
        }
    }
}

/// Combines description-derived options with explicit flags; flags win
fn build_options(args: &GenerateArgs, descriptor: &PipelineDescriptor) -> Result<PipelineOptions> {
    let mut options = match args.language {
        Some(language) => PipelineOptions::for_language(language, descriptor),
        None => PipelineOptions::from_descriptor(descriptor)
            .context("Could not derive a build language; pass --language")?,
    };

    if let Some(tool) = args.tool {
        if !options.build_language.supports(tool) {
            warn!(
                language = %options.build_language,
                tool = %tool,
                "Build tool is not usual for this language"
            );
        }
        options.build_tool = tool;
    }
    if let Some(deploy) = args.deploy {
        options.deploy_target = deploy;
    }
    if let Some(upload) = args.upload {
        options.upload_type = upload;
    }

    options.variables = args.set.iter().cloned().collect::<Variables>();
    debug!(explicit = options.variables.len(), "Explicit variables");
    options.merge_defaults(&descriptor.variables);

    Ok(options)
}

fn load_config() -> Result<FlowcraftConfig> {
    let config = FlowcraftConfig::default();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Reads the description and parses it
///
/// A missing description or `-` reads stdin. A missing description with an
/// interactive stdin is an error unless `allow_empty` is set.
fn describe(description: Option<&str>, allow_empty: bool) -> Result<PipelineDescriptor> {
    let text = match description {
        Some(text) if text != "-" => text.to_string(),
        Some(_) => read_stdin()?,
        None if atty::is(atty::Stream::Stdin) => {
            if !allow_empty {
                bail!("No description given. Pass it as an argument or pipe it on stdin");
            }
            String::new()
        }
        None => read_stdin()?,
    };

    debug!(chars = text.chars().count(), "Read description");
    Ok(parse(&text))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read description from stdin")?;
    Ok(buf)
}

fn resolve_format(arg: Option<OutputFormatArg>, config: &FlowcraftConfig) -> OutputFormat {
    match arg {
        Some(arg) => arg.into(),
        None => config.output_format.parse().unwrap_or(OutputFormat::Human),
    }
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    std::fs::write(path, output)
        .with_context(|| format!("Failed to write output to {}", path.display()))
}

fn with_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn fail(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BuildLanguage, BuildTool, DeployTarget, UploadType};
    use crate::nlp::VariableKey;

    fn args(description: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            description: description.map(str::to_string),
            language: None,
            tool: None,
            deploy: None,
            upload: None,
            set: vec![],
            name: None,
            format: None,
            output: None,
        }
    }

    #[test]
    fn test_options_from_description() {
        let text = "Java maven project, deploy to kubernetes, branch: release";
        let options = build_options(&args(Some(text)), &parse(text)).unwrap();
        assert_eq!(options.build_language, BuildLanguage::Java);
        assert_eq!(options.build_tool, BuildTool::Maven);
        assert_eq!(options.deploy_target, DeployTarget::K8s);
        assert_eq!(options.variables.get(VariableKey::Branch), Some("release"));
    }

    #[test]
    fn test_flags_override_description() {
        let text = "Java maven project, deploy to kubernetes, namespace: qa";
        let mut a = args(Some(text));
        a.tool = Some(BuildTool::Gradle);
        a.deploy = Some(DeployTarget::Vm);
        a.upload = Some(UploadType::Packages);
        a.set = vec![(VariableKey::Namespace, "prod".to_string())];

        let options = build_options(&a, &parse(text)).unwrap();
        assert_eq!(options.build_tool, BuildTool::Gradle);
        assert_eq!(options.deploy_target, DeployTarget::Vm);
        assert_eq!(options.upload_type, UploadType::Packages);
        assert_eq!(options.variables.get(VariableKey::Namespace), Some("prod"));
    }

    #[test]
    fn test_explicit_language_keeps_description_variables() {
        let text = "部署到主机, 机器组: mg-7";
        let mut a = args(Some(text));
        a.language = Some(BuildLanguage::Go);

        let options = build_options(&a, &parse(text)).unwrap();
        assert_eq!(options.build_language, BuildLanguage::Go);
        assert_eq!(options.build_tool, BuildTool::Go);
        assert_eq!(options.deploy_target, DeployTarget::Vm);
        assert_eq!(options.variables.get(VariableKey::MachineGroupId), Some("mg-7"));
    }

    #[test]
    fn test_missing_language_is_an_error() {
        let text = "部署到主机";
        let err = build_options(&args(Some(text)), &parse(text)).unwrap_err();
        assert!(format!("{:#}", err).contains("--language"));
    }

    #[test]
    fn test_resolve_format_prefers_flag() {
        let mut config = FlowcraftConfig::default();
        config.output_format = "json".to_string();
        assert_eq!(resolve_format(None, &config), OutputFormat::Json);
        assert_eq!(
            resolve_format(Some(OutputFormatArg::Yaml), &config),
            OutputFormat::Yaml
        );
    }

    fn cli(argv: &[&str]) -> CliArgs {
        use clap::Parser;
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_logging_config_follows_configuration() {
        let mut config = FlowcraftConfig::default();
        config.log_level = "warn".to_string();
        config.log_json = true;

        let logging = logging_config(&cli(&["flowcraft", "name", "x"]), &config);
        assert_eq!(logging.level, Level::WARN);
        assert!(logging.use_json);
    }

    #[test]
    fn test_logging_flags_override_configuration() {
        let mut config = FlowcraftConfig::default();
        config.log_level = "warn".to_string();

        let verbose = logging_config(&cli(&["flowcraft", "-v", "name", "x"]), &config);
        assert_eq!(verbose.level, Level::DEBUG);

        let quiet = logging_config(&cli(&["flowcraft", "name", "x", "-q"]), &config);
        assert_eq!(quiet.level, Level::ERROR);

        let explicit = logging_config(
            &cli(&["flowcraft", "--log-level", "trace", "-v", "name", "x"]),
            &config,
        );
        assert_eq!(explicit.level, Level::TRACE);
        assert!(!explicit.use_json);
    }

    #[test]
    fn test_with_newline() {
        assert_eq!(with_newline("a".to_string()), "a\n");
        assert_eq!(with_newline("a\n".to_string()), "a\n");
    }
}
