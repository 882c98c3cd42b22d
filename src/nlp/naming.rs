//! Pipeline name suggestion

use super::taxonomy::{BUILD_LABEL, DEPLOY_LABEL};
use super::variables::VariableKey;
use super::PipelineDescriptor;

pub const FALLBACK_SUBJECT: &str = "应用";
pub const DEFAULT_SUFFIX: &str = "";
pub const PIPELINE_WORD: &str = "流水线";

/// Suggests a pipeline name: subject, intent suffix, then the pipeline word
///
/// The subject is the extracted service name, else the first detected
/// language, else a generic "application". Deploy intent outranks build
/// intent for the suffix.
pub fn suggest_name(descriptor: &PipelineDescriptor) -> String {
    let subject = descriptor
        .variables
        .get(VariableKey::ServiceName)
        .or_else(|| descriptor.programming_languages.first().map(String::as_str))
        .unwrap_or(FALLBACK_SUBJECT);

    let types = &descriptor.pipeline_types;
    let suffix = [DEPLOY_LABEL, BUILD_LABEL]
        .into_iter()
        .find(|label| types.iter().any(|t| t == label))
        .or_else(|| types.first().map(String::as_str))
        .unwrap_or(DEFAULT_SUFFIX);

    format!("{}{}{}", subject, suffix, PIPELINE_WORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::parse;
    use crate::nlp::taxonomy::{RELEASE_LABEL, TEST_LABEL};

    fn descriptor(languages: &[&str], types: &[&str]) -> PipelineDescriptor {
        PipelineDescriptor {
            programming_languages: languages.iter().map(|s| s.to_string()).collect(),
            pipeline_types: types.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_language_with_no_types() {
        let d = descriptor(&["python"], &[]);
        assert_eq!(suggest_name(&d), format!("python{}{}", DEFAULT_SUFFIX, PIPELINE_WORD));
        assert_eq!(suggest_name(&d), "python流水线");
    }

    #[test]
    fn test_service_name_wins_over_language() {
        let mut d = descriptor(&["go"], &[BUILD_LABEL]);
        d.variables.set(VariableKey::ServiceName, "order-service");
        assert_eq!(suggest_name(&d), "order-service构建流水线");
    }

    #[test]
    fn test_fallback_subject() {
        assert_eq!(suggest_name(&descriptor(&[], &[])), "应用流水线");
    }

    #[test]
    fn test_deploy_outranks_build() {
        let d = descriptor(&["java"], &[BUILD_LABEL, TEST_LABEL, DEPLOY_LABEL]);
        assert_eq!(suggest_name(&d), "java部署流水线");
    }

    #[test]
    fn test_first_type_when_neither_build_nor_deploy() {
        let d = descriptor(&[], &[TEST_LABEL, RELEASE_LABEL]);
        assert_eq!(suggest_name(&d), "应用测试流水线");
    }

    #[test]
    fn test_from_parsed_description() {
        let d = parse("项目名称是 order-service, go build");
        assert_eq!(suggest_name(&d), "order-service构建流水线");
    }
}
