//! Keyword taxonomies used to classify pipeline descriptions
//!
//! Each table maps a category label to the lowercase trigger strings that
//! indicate it. Tables are plain static data; iteration order is declaration
//! order and is the order matched labels are reported in.

use serde::Serialize;

/// Category label paired with its trigger strings
pub type KeywordTable = &'static [(&'static str, &'static [&'static str])];

/// Tool name paired with its version-label table
pub type VersionTable = &'static [(&'static str, KeywordTable)];

pub const BUILD_LABEL: &str = "构建";
pub const DEPLOY_LABEL: &str = "部署";
pub const TEST_LABEL: &str = "测试";
pub const RELEASE_LABEL: &str = "发布";

pub static PIPELINE_TYPES: KeywordTable = &[
    (BUILD_LABEL, &["build", "构建", "编译", "compile"]),
    (DEPLOY_LABEL, &["deploy", "部署", "发布", "release", "上线"]),
    (TEST_LABEL, &["test", "测试", "单元测试", "unit test"]),
    (RELEASE_LABEL, &["release", "发布", "上线", "publish"]),
];

pub static PROGRAMMING_LANGUAGES: KeywordTable = &[
    (
        "java",
        &["java", "jar", "maven", "gradle", "spring", "springboot", "javabuild"],
    ),
    (
        "nodejs",
        &[
            "node",
            "nodejs",
            "node.js",
            "npm",
            "yarn",
            "javascript",
            "js",
            "express",
            "koa",
            "nodebuild",
        ],
    ),
    (
        "python",
        &[
            "python",
            "py",
            "pip",
            "django",
            "flask",
            "fastapi",
            "pytest",
            "pythonbuild",
        ],
    ),
    ("go", &["go", "golang", "gin", "golangbuild"]),
    ("php", &["php", "composer", "laravel", "phpbuild"]),
    (
        "csharp",
        &[
            "c#",
            "csharp",
            "dotnet",
            ".net",
            "nuget",
            "dotnetcore",
            "dotnetcorebuild",
        ],
    ),
    ("cpp", &["c++", "cpp", "cmake", "gcc", "gccbuild"]),
    ("rust", &["rust", "cargo", "rustbuild"]),
    ("ruby", &["ruby", "gem", "rails", "rubybuild"]),
    ("asp", &["asp", "aspnet", "aspnetbuild"]),
];

pub static BUILD_TOOLS: KeywordTable = &[
    ("maven", &["maven", "mvn", "pom.xml"]),
    ("gradle", &["gradle", "build.gradle"]),
    ("npm", &["npm", "package.json"]),
    ("yarn", &["yarn"]),
    ("pip", &["pip", "requirements.txt", "setup.py"]),
    ("go", &["go build", "go mod"]),
    (
        "docker",
        &[
            "docker",
            "dockerfile",
            "容器",
            "container",
            "acrdockerbuild",
            "privateregistrydockerbuild",
        ],
    ),
    ("webpack", &["webpack", "babel", "rollup"]),
    ("dotnet", &["dotnet", "nuget"]),
    ("composer", &["composer"]),
    ("cargo", &["cargo"]),
    ("gem", &["gem"]),
    ("custom", &["custom", "自定义", "customenvironmentbuild"]),
];

pub static DEPLOY_TARGETS: KeywordTable = &[
    (
        "kubernetes",
        &[
            "kubernetes",
            "k8s",
            "容器编排",
            "pod",
            "deployment",
            "service",
            "kubernetesdeploy",
            "kubernetesbatchdeploy",
            "kubernetesbluegreendeploy",
        ],
    ),
    ("docker", &["docker", "容器", "container", "vmdockerdeploy"]),
    (
        "vm",
        &["vm", "虚拟机", "主机", "host", "server", "服务器", "vmdeploy"],
    ),
    ("ecs", &["ecs", "ecsappdeploy"]),
    ("sae", &["sae", "serverless", "saedeploy", "saejobupdate"]),
    (
        "edas",
        &["edas", "edasecsdeploy", "edaskubernetesdeploy"],
    ),
    ("ess", &["ess", "essecideploy", "essecsdeploy"]),
    ("appstack", &["appstack", "appstackflowdeploy"]),
    ("asm", &["asm", "asmbluegreendeploy"]),
    ("cloud", &["云", "cloud", "aws", "azure", "gcp"]),
];

pub static VERSIONS: VersionTable = &[
    (
        "jdk",
        &[
            ("1.6", &["jdk1.6", "java1.6"]),
            ("1.7", &["jdk1.7", "java1.7"]),
            ("1.8", &["jdk1.8", "java1.8", "java8"]),
            ("11", &["jdk11", "java11"]),
            ("17", &["jdk17", "java17"]),
            ("21", &["jdk21", "java21"]),
        ],
    ),
    (
        "maven",
        &[
            ("3.6.3", &["maven3.6.3", "mvn3.6.3"]),
            ("3.8.4", &["maven3.8.4", "mvn3.8.4"]),
            ("3.9.3", &["maven3.9.3", "mvn3.9.3"]),
        ],
    ),
    (
        "node",
        &[
            ("16.8", &["node16", "nodejs16"]),
            ("18.12", &["node18", "nodejs18"]),
            ("20", &["node20", "nodejs20"]),
        ],
    ),
    (
        "python",
        &[
            ("3.9", &["python3.9", "py3.9"]),
            ("3.12", &["python3.12", "py3.12"]),
        ],
    ),
    (
        "go",
        &[
            ("1.19.x", &["go1.19", "golang1.19"]),
            ("1.20.x", &["go1.20", "golang1.20"]),
            ("1.21.x", &["go1.21", "golang1.21"]),
        ],
    ),
];

/// The four classification taxonomies a description is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Taxonomy {
    PipelineTypes,
    ProgrammingLanguages,
    BuildTools,
    DeployTargets,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 4] = [
        Taxonomy::PipelineTypes,
        Taxonomy::ProgrammingLanguages,
        Taxonomy::BuildTools,
        Taxonomy::DeployTargets,
    ];

    pub fn table(self) -> KeywordTable {
        match self {
            Taxonomy::PipelineTypes => PIPELINE_TYPES,
            Taxonomy::ProgrammingLanguages => PROGRAMMING_LANGUAGES,
            Taxonomy::BuildTools => BUILD_TOOLS,
            Taxonomy::DeployTargets => DEPLOY_TARGETS,
        }
    }

    /// All category labels of this taxonomy, in table order
    pub fn labels(self) -> Vec<&'static str> {
        self.table().iter().map(|(label, _)| *label).collect()
    }

    pub fn contains_label(self, label: &str) -> bool {
        self.table().iter().any(|(l, _)| *l == label)
    }
}

/// Looks up the version-label table for a tool name
pub fn versions_for(tool: &str) -> Option<KeywordTable> {
    VERSIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tool))
        .map(|(_, table)| *table)
}

/// Resolves the first version label of `tool` whose trigger occurs in `text`
///
/// `text` is expected to be lowercase already.
pub fn resolve_version_alias(tool: &str, text: &str) -> Option<&'static str> {
    versions_for(tool)?
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_triggers_are_lowercase() {
        for taxonomy in Taxonomy::ALL {
            for (label, triggers) in taxonomy.table() {
                for trigger in *triggers {
                    assert_eq!(
                        trigger.to_lowercase(),
                        *trigger,
                        "{:?}/{} has a non-lowercase trigger",
                        taxonomy,
                        label
                    );
                }
            }
        }
    }

    #[test]
    fn test_labels_are_unique_per_table() {
        for taxonomy in Taxonomy::ALL {
            let labels = taxonomy.labels();
            let unique: HashSet<_> = labels.iter().collect();
            assert_eq!(labels.len(), unique.len(), "{:?}", taxonomy);
        }
    }

    #[test]
    fn test_labels_keep_table_order() {
        let labels = Taxonomy::ProgrammingLanguages.labels();
        assert_eq!(labels[0], "java");
        assert_eq!(labels[1], "nodejs");
        assert_eq!(labels.last(), Some(&"asp"));
    }

    #[test]
    fn test_docker_trigger_in_two_tables() {
        assert!(Taxonomy::BuildTools.contains_label("docker"));
        assert!(Taxonomy::DeployTargets.contains_label("docker"));
    }

    #[test]
    fn test_resolve_version_alias() {
        assert_eq!(resolve_version_alias("jdk", "use java8 please"), Some("1.8"));
        assert_eq!(resolve_version_alias("JDK", "jdk17"), Some("17"));
        assert_eq!(resolve_version_alias("node", "nodejs18 runtime"), Some("18.12"));
        assert_eq!(resolve_version_alias("go", "golang1.21"), Some("1.21.x"));
        assert_eq!(resolve_version_alias("python", "python 3"), None);
        assert_eq!(resolve_version_alias("ruby", "ruby3"), None);
    }
}
