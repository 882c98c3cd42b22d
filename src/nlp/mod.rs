//! Natural-language pipeline description parsing
//!
//! Turns a free-form (possibly mixed Chinese/English) description of a CI/CD
//! pipeline into a [`PipelineDescriptor`]: the intent categories, technology
//! stack and configuration variables it mentions.
//!
//! # Example
//!
//! ```
//! use flowcraft::nlp::{parse, suggest_name, VariableKey};
//!
//! let descriptor = parse("Java maven project, skip test, deploy to kubernetes, namespace: prod");
//! assert!(descriptor.programming_languages.contains(&"java".to_string()));
//! assert_eq!(descriptor.variables.get(VariableKey::Namespace), Some("prod"));
//! assert_eq!(suggest_name(&descriptor), "java部署流水线");
//! ```

pub mod extractor;
pub mod matcher;
pub mod naming;
pub mod taxonomy;
pub mod tokens;
pub mod variables;

pub use extractor::extract;
pub use matcher::identify;
pub use naming::suggest_name;
pub use taxonomy::{KeywordTable, Taxonomy};
pub use tokens::TokenSet;
pub use variables::{VariableKey, Variables};

use serde::Serialize;
use tracing::debug;

/// Everything recognised in one pipeline description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDescriptor {
    pub detected_keywords: Vec<String>,
    pub pipeline_types: Vec<String>,
    pub programming_languages: Vec<String>,
    pub build_tools: Vec<String>,
    pub deploy_targets: Vec<String>,
    pub variables: Variables,
    /// Always empty; retained so serialized descriptors keep their shape
    pub matched_templates: Vec<String>,
}

impl PipelineDescriptor {
    /// Category labels detected for one taxonomy
    pub fn categories(&self, taxonomy: Taxonomy) -> &[String] {
        match taxonomy {
            Taxonomy::PipelineTypes => &self.pipeline_types,
            Taxonomy::ProgrammingLanguages => &self.programming_languages,
            Taxonomy::BuildTools => &self.build_tools,
            Taxonomy::DeployTargets => &self.deploy_targets,
        }
    }

    pub fn has_category(&self, taxonomy: Taxonomy, label: &str) -> bool {
        self.categories(taxonomy).iter().any(|l| l == label)
    }
}

/// Parses a free-form pipeline description
///
/// Pure and total: any input, including the empty string, yields a
/// descriptor. Absence of a signal is represented by omission.
pub fn parse(description: &str) -> PipelineDescriptor {
    let tokens = TokenSet::from_description(description);

    let pipeline_types = identify(&tokens, Taxonomy::PipelineTypes.table());
    let programming_languages = identify(&tokens, Taxonomy::ProgrammingLanguages.table());
    let build_tools = identify(&tokens, Taxonomy::BuildTools.table());
    let deploy_targets = identify(&tokens, Taxonomy::DeployTargets.table());

    let variables = extract(description);

    debug!(
        tokens = tokens.len(),
        pipeline_types = ?pipeline_types,
        languages = ?programming_languages,
        build_tools = ?build_tools,
        deploy_targets = ?deploy_targets,
        variables = variables.len(),
        "Parsed pipeline description"
    );

    PipelineDescriptor {
        detected_keywords: tokens.into_vec(),
        pipeline_types,
        programming_languages,
        build_tools,
        deploy_targets,
        variables,
        matched_templates: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_deterministic() {
        let text = "Node 18 项目，使用 yarn 构建并部署到 k8s，branch: main";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn test_parse_empty_description() {
        let descriptor = parse("");
        assert!(descriptor.detected_keywords.is_empty());
        assert!(descriptor.pipeline_types.is_empty());
        assert!(descriptor.programming_languages.is_empty());
        assert!(descriptor.build_tools.is_empty());
        assert!(descriptor.deploy_targets.is_empty());
        assert!(descriptor.matched_templates.is_empty());
        assert_eq!(descriptor.variables.get(VariableKey::UploadType), Some("flowPublic"));
        assert_eq!(descriptor.variables.get(VariableKey::ExecuteUser), Some("root"));
    }

    #[test]
    fn test_categories_accessor() {
        let descriptor = parse("python flask deploy");
        assert!(descriptor.has_category(Taxonomy::ProgrammingLanguages, "python"));
        assert!(descriptor.has_category(Taxonomy::PipelineTypes, taxonomy::DEPLOY_LABEL));
        assert!(!descriptor.has_category(Taxonomy::BuildTools, "maven"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(parse("go build")).unwrap();
        assert!(json.get("detectedKeywords").is_some());
        assert!(json.get("programmingLanguages").is_some());
        assert_eq!(json["matchedTemplates"], serde_json::json!([]));
        assert_eq!(json["variables"]["buildCommand"], "go build -o app main.go");
    }
}
