//! `{{variable || default}}` placeholder substitution

use crate::nlp::variables::{VariableKey, Variables};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid placeholder regex"));

const UNFILLED_MARKER: &str = "<your-";

/// Replaces every placeholder in `template` from `variables`
///
/// A set variable replaces its placeholder. Otherwise the default (with
/// quote characters removed) is used, and a placeholder without default
/// is left untouched.
pub fn render(template: &str, variables: &Variables) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let expression = caps[1].trim();
            let (name, default) = match expression.split_once("||") {
                Some((name, default)) => (name.trim(), Some(default.trim())),
                None => (expression, None),
            };

            let value = name
                .parse::<VariableKey>()
                .ok()
                .and_then(|key| variables.get(key).map(|v| (key, v)));

            match (value, default) {
                (Some((key, value)), _) => resolve_unfilled(key, value, variables),
                (None, Some(default)) => default.replace(&['\'', '"'][..], ""),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Swaps `<your-...>` stand-ins left by callers for usable placeholders
fn resolve_unfilled(key: VariableKey, value: &str, variables: &Variables) -> String {
    if !value.contains(UNFILLED_MARKER) {
        return value.to_string();
    }

    match key {
        VariableKey::RepoUrl => {
            let service = variables
                .get(VariableKey::ServiceName)
                .filter(|s| !s.contains('<'));
            match service {
                Some(service) => format!("https://codeup.aliyun.com/your-org/{}.git", service),
                None => "https://codeup.aliyun.com/your-org/your-repo.git".to_string(),
            }
        }
        VariableKey::ServiceConnectionId => "your-service-connection-id".to_string(),
        VariableKey::MachineGroupId => "your-machine-group-id".to_string(),
        _ => value.to_string(),
    }
}

/// Wraps version values in double quotes so YAML keeps them as strings
pub fn quote_versions(variables: &mut Variables) {
    let keys: Vec<VariableKey> = variables
        .iter()
        .filter(|(key, value)| key.is_version() && !value.starts_with('"'))
        .map(|(key, _)| key)
        .collect();

    for key in keys {
        if let Some(value) = variables.remove(key) {
            variables.set(key, format!("\"{}\"", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(VariableKey, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_set_variable_replaces_placeholder() {
        let out = render("branch: {{branch || 'main'}}", &vars(&[(VariableKey::Branch, "dev")]));
        assert_eq!(out, "branch: dev");
    }

    #[test]
    fn test_default_strips_quotes() {
        assert_eq!(render("v: {{jdkVersion || \"1.8\"}}", &Variables::new()), "v: 1.8");
        assert_eq!(render("b: {{branch||'main'}}", &Variables::new()), "b: main");
    }

    #[test]
    fn test_placeholder_without_default_kept_when_unset() {
        assert_eq!(render("x: {{namespace}}", &Variables::new()), "x: {{namespace}}");
        assert_eq!(
            render("x: {{namespace}}", &vars(&[(VariableKey::Namespace, "prod")])),
            "x: prod"
        );
    }

    #[test]
    fn test_unknown_variable_uses_default() {
        assert_eq!(render("{{colour || blue}}", &Variables::new()), "blue");
    }

    #[test]
    fn test_unfilled_repo_url_uses_service_name() {
        let v = vars(&[
            (VariableKey::RepoUrl, "<your-repository-url>"),
            (VariableKey::ServiceName, "billing"),
        ]);
        assert_eq!(
            render("{{repoUrl || 'x'}}", &v),
            "https://codeup.aliyun.com/your-org/billing.git"
        );

        let v = vars(&[(VariableKey::RepoUrl, "<your-repository-url>")]);
        assert_eq!(
            render("{{repoUrl}}", &v),
            "https://codeup.aliyun.com/your-org/your-repo.git"
        );
    }

    #[test]
    fn test_unfilled_ids() {
        let v = vars(&[
            (VariableKey::ServiceConnectionId, "<your-service-connection-id>"),
            (VariableKey::MachineGroupId, "<your-machine-group-id>"),
        ]);
        assert_eq!(
            render("{{serviceConnectionId}} {{machineGroupId || 'x'}}", &v),
            "your-service-connection-id your-machine-group-id"
        );
    }

    #[test]
    fn test_quote_versions() {
        let mut v = vars(&[
            (VariableKey::JdkVersion, "17"),
            (VariableKey::NodeVersion, "\"18.12\""),
            (VariableKey::Namespace, "prod"),
        ]);
        quote_versions(&mut v);
        assert_eq!(v.get(VariableKey::JdkVersion), Some("\"17\""));
        assert_eq!(v.get(VariableKey::NodeVersion), Some("\"18.12\""));
        assert_eq!(v.get(VariableKey::Namespace), Some("prod"));
    }
}
