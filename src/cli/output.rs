//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML and human-readable text. JSON and YAML are
//! machine-readable renditions of the same records; human output uses
//! box-drawing section headers.
//!
//! # Example
//!
//! ```
//! use flowcraft::cli::output::{OutputFormat, OutputFormatter};
//! use flowcraft::nlp::parse;
//!
//! let descriptor = parse("python flask app, 部署到主机");
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_descriptor(&descriptor).unwrap();
//! assert!(output.contains("\"programmingLanguages\""));
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;

use crate::nlp::PipelineDescriptor;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format; for generated pipelines this is the raw pipeline
    Yaml,
    /// Human-readable formatted text
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "human" => Ok(OutputFormat::Human),
            other => Err(format!(
                "Invalid output format: {}. Valid options: json, yaml, human",
                other
            )),
        }
    }
}

/// A rendered pipeline together with its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPipeline {
    pub name: String,
    pub yaml: String,
}

#[derive(Serialize)]
struct NameOutput<'a> {
    name: &'a str,
}

/// Output formatter for descriptors, names and pipelines
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_descriptor(&self, descriptor: &PipelineDescriptor) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(descriptor)
                .context("Failed to serialize descriptor to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(descriptor).context("Failed to serialize descriptor to YAML")
            }
            OutputFormat::Human => Ok(self.format_descriptor_human(descriptor)),
        }
    }

    pub fn format_name(&self, name: &str) -> Result<String> {
        let output = NameOutput { name };
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&output).context("Failed to serialize name to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&output).context("Failed to serialize name to YAML")
            }
            OutputFormat::Human => Ok(format!("{}\n", name)),
        }
    }

    pub fn format_pipeline(&self, pipeline: &GeneratedPipeline) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(pipeline)
                .context("Failed to serialize pipeline to JSON"),
            OutputFormat::Yaml => Ok(pipeline.yaml.clone()),
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str(&format!("\u{2713} Pipeline: {}\n", pipeline.name));
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&pipeline.yaml);
                Ok(output)
            }
        }
    }

    fn format_descriptor_human(&self, descriptor: &PipelineDescriptor) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Pipeline Descriptor\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!(
            "Pipeline Types:  {}\n",
            list_or_none(&descriptor.pipeline_types)
        ));
        output.push_str(&format!(
            "Languages:       {}\n",
            list_or_none(&descriptor.programming_languages)
        ));
        output.push_str(&format!(
            "Build Tools:     {}\n",
            list_or_none(&descriptor.build_tools)
        ));
        output.push_str(&format!(
            "Deploy Targets:  {}\n\n",
            list_or_none(&descriptor.deploy_targets)
        ));

        output.push_str("Variables:\n");
        let count = descriptor.variables.len();
        for (i, (key, value)) in descriptor.variables.iter().enumerate() {
            let connector = if i + 1 == count { "\u{2514}" } else { "\u{251C}" };
            output.push_str(&format!("{}\u{2500} {:<20} {}\n", connector, key, value));
        }
        output.push('\n');

        output.push_str(&format!(
            "Keywords: {}\n",
            list_or_none(&descriptor.detected_keywords)
        ));

        output
    }
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{parse, VariableKey};

    fn descriptor() -> PipelineDescriptor {
        parse("Java maven project, skip test, deploy to kubernetes, namespace: prod")
    }

    #[test]
    fn test_json_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_descriptor(&descriptor()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["programmingLanguages"][0], "java");
        assert_eq!(value["variables"]["namespace"], "prod");
        assert_eq!(
            value["variables"]["buildCommand"],
            "mvn clean package -Dmaven.test.skip=true"
        );
    }

    #[test]
    fn test_yaml_format() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter.format_descriptor(&descriptor()).unwrap();

        let value: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
        assert_eq!(value["variables"]["deployTarget"], "kubernetes");
    }

    #[test]
    fn test_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_descriptor(&descriptor()).unwrap();

        assert!(output.contains("Pipeline Descriptor"));
        assert!(output.contains("Languages:       java"));
        assert!(output.contains("namespace"));
        assert!(output.contains("\u{2514}\u{2500}"));
    }

    #[test]
    fn test_human_format_empty_descriptor() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_descriptor(&PipelineDescriptor::default()).unwrap();
        assert!(output.contains("Languages:       (none)"));
    }

    #[test]
    fn test_name_formats() {
        let name = "java部署流水线";
        assert_eq!(
            OutputFormatter::new(OutputFormat::Human).format_name(name).unwrap(),
            "java部署流水线\n"
        );
        let json = OutputFormatter::new(OutputFormat::Json).format_name(name).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], name);
    }

    #[test]
    fn test_pipeline_formats() {
        let pipeline = GeneratedPipeline {
            name: "demo".to_string(),
            yaml: "sources: {}\n".to_string(),
        };

        let yaml = OutputFormatter::new(OutputFormat::Yaml).format_pipeline(&pipeline).unwrap();
        assert_eq!(yaml, "sources: {}\n");

        let json = OutputFormatter::new(OutputFormat::Json).format_pipeline(&pipeline).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "demo");
        assert_eq!(value["yaml"], "sources: {}\n");

        let human = OutputFormatter::new(OutputFormat::Human).format_pipeline(&pipeline).unwrap();
        assert!(human.starts_with("\u{2713} Pipeline: demo\n"));
        assert!(human.ends_with("sources: {}\n"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_variables_listed_in_key_order() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_descriptor(&descriptor()).unwrap();
        let build = output.find(VariableKey::BuildCommand.as_str()).unwrap();
        let ns = output.find(VariableKey::Namespace.as_str()).unwrap();
        assert!(build < ns);
    }
}
