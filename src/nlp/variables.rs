//! Pipeline configuration variables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

macro_rules! variable_keys {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Closed set of variable names a pipeline template understands
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum VariableKey {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl VariableKey {
            pub const ALL: &'static [VariableKey] = &[$(VariableKey::$variant),*];

            /// Wire name (camelCase), as used in templates and JSON output
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(VariableKey::$variant => $name,)*
                }
            }
        }
    };
}

variable_keys! {
    RepoUrl => "repoUrl",
    Branch => "branch",
    ServiceName => "serviceName",
    ServiceConnectionId => "serviceConnectionId",
    BuildCommand => "buildCommand",
    TestCommand => "testCommand",
    ArtifactPath => "artifactPath",
    JdkVersion => "jdkVersion",
    MavenVersion => "mavenVersion",
    NodeVersion => "nodeVersion",
    PythonVersion => "pythonVersion",
    GoVersion => "goVersion",
    KubectlVersion => "kubectlVersion",
    DeployTarget => "deployTarget",
    DeployCommand => "deployCommand",
    MachineGroupId => "machineGroupId",
    Namespace => "namespace",
    DockerImage => "dockerImage",
    ExecuteUser => "executeUser",
    ArtifactDownloadPath => "artifactDownloadPath",
    PauseStrategy => "pauseStrategy",
    BatchNumber => "batchNumber",
    KubernetesClusterId => "kubernetesClusterId",
    YamlPath => "yamlPath",
    UploadType => "uploadType",
    ArtifactName => "artifactName",
    ArtifactVersion => "artifactVersion",
    PackagesServiceConnection => "packagesServiceConnection",
    PackagesRepoId => "packagesRepoId",
    IncludePathInArtifact => "includePathInArtifact",
}

impl VariableKey {
    /// Keys whose values are rendered as quoted YAML strings
    pub fn is_version(&self) -> bool {
        matches!(
            self,
            VariableKey::JdkVersion
                | VariableKey::MavenVersion
                | VariableKey::NodeVersion
                | VariableKey::PythonVersion
                | VariableKey::GoVersion
                | VariableKey::KubectlVersion
        )
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for VariableKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableKey::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown variable: {}", s))
    }
}

/// Variable values keyed by [`VariableKey`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<VariableKey, String>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: VariableKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: VariableKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn set(&mut self, key: VariableKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Sets `key` only when it has no value yet; returns whether it was set
    pub fn set_if_absent(&mut self, key: VariableKey, value: impl Into<String>) -> bool {
        if self.contains(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    pub fn remove(&mut self, key: VariableKey) -> Option<String> {
        self.0.remove(&key)
    }

    /// Fills every key missing here from `defaults`
    pub fn fill_from(&mut self, defaults: &Variables) {
        for (key, value) in defaults.iter() {
            self.set_if_absent(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(VariableKey, String)> for Variables {
    fn from_iter<T: IntoIterator<Item = (VariableKey, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trips_through_str() {
        for key in VariableKey::ALL {
            assert_eq!(key.as_str().parse::<VariableKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!("favouriteColour".parse::<VariableKey>().is_err());
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let mut vars = Variables::new();
        vars.set(VariableKey::RepoUrl, "https://example.com/a.git");
        vars.set(VariableKey::ExecuteUser, "root");
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["repoUrl"], "https://example.com/a.git");
        assert_eq!(json["executeUser"], "root");
    }

    #[test]
    fn test_set_if_absent_keeps_existing() {
        let mut vars = Variables::new();
        assert!(vars.set_if_absent(VariableKey::Branch, "main"));
        assert!(!vars.set_if_absent(VariableKey::Branch, "dev"));
        assert_eq!(vars.get(VariableKey::Branch), Some("main"));
    }

    #[test]
    fn test_fill_from_only_adds_missing() {
        let mut explicit = Variables::new();
        explicit.set(VariableKey::Namespace, "prod");
        let mut defaults = Variables::new();
        defaults.set(VariableKey::Namespace, "default");
        defaults.set(VariableKey::YamlPath, "app-configs/manifest-app");

        explicit.fill_from(&defaults);
        assert_eq!(explicit.get(VariableKey::Namespace), Some("prod"));
        assert_eq!(explicit.get(VariableKey::YamlPath), Some("app-configs/manifest-app"));
    }

    #[test]
    fn test_version_keys() {
        assert!(VariableKey::GoVersion.is_version());
        assert!(VariableKey::KubectlVersion.is_version());
        assert!(!VariableKey::Namespace.is_version());
    }
}
