//! Structured variable extraction from pipeline descriptions
//!
//! Two passes run over every description. Labelled regular expressions pull
//! literal values (URLs, branch, service name, versions, ...) out of the
//! original text so captured casing is preserved. Ordered inference chains
//! then derive defaults from substring checks on a lowercased copy.

use super::variables::{VariableKey, Variables};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://|git@|ssh://)[^:\s]+\.git").expect("valid url regex"));

static BRANCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:分支|branch)[：:\s]*([a-zA-Z0-9\-_/]+)").expect("valid branch regex")
});

static SERVICE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:项目名称是|项目名称|项目叫|项目|应用名称是|应用名称|应用叫|应用|服务名称是|服务名称|服务叫|服务|service|project|app)[：:\s是]*([a-zA-Z0-9\-_]+)",
    )
    .expect("valid service name regex")
});

static MACHINE_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:机器组|machinegroup|machine group)[：:\s]*([a-zA-Z0-9\-_]+)")
        .expect("valid machine group regex")
});

static NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:namespace|命名空间)[：:\s]*([a-zA-Z0-9\-_]+)")
        .expect("valid namespace regex")
});

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(jdk|java|node|python|go|golang|maven)\s+([0-9.x]+)")
        .expect("valid version regex")
});

/// Labelled single-value extractors, applied in order
static LABELLED: &[(VariableKey, &Lazy<Regex>)] = &[
    (VariableKey::Branch, &BRANCH_RE),
    (VariableKey::ServiceName, &SERVICE_NAME_RE),
    (VariableKey::MachineGroupId, &MACHINE_GROUP_RE),
    (VariableKey::Namespace, &NAMESPACE_RE),
];

/// One step of an inference chain
///
/// The first rule whose predicate holds decides the outcome of its chain,
/// even when `value` yields nothing for that text.
pub struct InferenceRule {
    pub when: fn(&str) -> bool,
    pub value: fn(&str) -> Option<&'static str>,
}

/// Ordered, first-match-wins rules producing one variable
pub struct InferenceChain {
    pub key: VariableKey,
    pub rules: &'static [InferenceRule],
    /// Value used when no rule matches
    pub fallback: Option<&'static str>,
}

impl InferenceChain {
    /// Evaluates the chain against lowercased text
    pub fn infer(&self, lower: &str) -> Option<&'static str> {
        match self.rules.iter().find(|rule| (rule.when)(lower)) {
            Some(rule) => (rule.value)(lower),
            None => self.fallback,
        }
    }
}

fn has_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub static BUILD_COMMAND: InferenceChain = InferenceChain {
    key: VariableKey::BuildCommand,
    rules: &[
        InferenceRule {
            when: |t| has_any(t, &["maven", "mvn"]),
            value: |t| {
                if has_any(t, &["跳过测试", "skip test"]) {
                    Some("mvn clean package -Dmaven.test.skip=true")
                } else {
                    Some("mvn clean package")
                }
            },
        },
        InferenceRule {
            when: |t| t.contains("npm"),
            value: |t| t.contains("build").then_some("npm run build"),
        },
        InferenceRule {
            when: |t| t.contains("yarn"),
            value: |_| Some("yarn build"),
        },
        InferenceRule {
            when: |t| t.contains("go"),
            value: |_| Some("go build -o app main.go"),
        },
        InferenceRule {
            when: |t| t.contains("gradle"),
            value: |_| Some("gradle build"),
        },
    ],
    fallback: None,
};

pub static TEST_COMMAND: InferenceChain = InferenceChain {
    key: VariableKey::TestCommand,
    rules: &[
        InferenceRule {
            when: |t| has_any(t, &["maven", "java"]),
            value: |_| Some("mvn test"),
        },
        InferenceRule {
            when: |t| t.contains("npm"),
            value: |_| Some("npm test"),
        },
        InferenceRule {
            when: |t| t.contains("yarn"),
            value: |_| Some("yarn test"),
        },
        InferenceRule {
            when: |t| t.contains("python"),
            value: |_| Some("python -m pytest"),
        },
        InferenceRule {
            when: |t| t.contains("go"),
            value: |_| Some("go test ./..."),
        },
        InferenceRule {
            when: |t| t.contains("gradle"),
            value: |_| Some("gradle test"),
        },
    ],
    fallback: None,
};

pub static ARTIFACT_PATH: InferenceChain = InferenceChain {
    key: VariableKey::ArtifactPath,
    rules: &[
        InferenceRule {
            when: |t| has_any(t, &["java", "maven", "gradle"]),
            value: |_| Some("target/"),
        },
        InferenceRule {
            when: |t| has_any(t, &["nodejs", "npm", "yarn"]),
            value: |_| Some("dist/"),
        },
        InferenceRule {
            when: |t| t.contains("python"),
            value: |_| Some("dist/"),
        },
        InferenceRule {
            when: |t| t.contains("go"),
            value: |_| Some("app"),
        },
    ],
    fallback: None,
};

pub static DEPLOY_TARGET: InferenceChain = InferenceChain {
    key: VariableKey::DeployTarget,
    rules: &[
        InferenceRule {
            when: |t| has_any(t, &["kubernetes", "k8s"]),
            value: |_| Some("kubernetes"),
        },
        InferenceRule {
            when: |t| has_any(t, &["主机", "vm", "host"]),
            value: |_| Some("vm"),
        },
        InferenceRule {
            // docker on kubernetes resolves to kubernetes
            when: |t| t.contains("docker") && !t.contains("kubernetes"),
            value: |_| Some("docker"),
        },
        InferenceRule {
            when: |t| has_any(t, &["sae", "serverless"]),
            value: |_| Some("sae"),
        },
        InferenceRule {
            when: |t| t.contains("ecs"),
            value: |_| Some("ecs"),
        },
    ],
    fallback: None,
};

pub static UPLOAD_TYPE: InferenceChain = InferenceChain {
    key: VariableKey::UploadType,
    rules: &[InferenceRule {
        when: |t| has_any(t, &["packages", "制品仓库"]),
        value: |_| Some("packages"),
    }],
    fallback: Some("flowPublic"),
};

pub static EXECUTE_USER: InferenceChain = InferenceChain {
    key: VariableKey::ExecuteUser,
    rules: &[InferenceRule {
        when: |t| has_any(t, &["admin", "管理员"]),
        value: |_| Some("admin"),
    }],
    fallback: Some("root"),
};

/// Inference chains in evaluation order
pub static INFERENCE_CHAINS: &[&InferenceChain] = &[
    &BUILD_COMMAND,
    &TEST_COMMAND,
    &ARTIFACT_PATH,
    &DEPLOY_TARGET,
    &UPLOAD_TYPE,
    &EXECUTE_USER,
];

/// Extracts configuration variables from a description
///
/// Never fails: anything that cannot be found is simply absent from the
/// returned map, except `uploadType` and `executeUser` which always default.
pub fn extract(description: &str) -> Variables {
    let mut variables = Variables::new();

    if let Some(m) = URL_RE.find(description) {
        variables.set(VariableKey::RepoUrl, m.as_str());
    }

    for (key, re) in LABELLED {
        if let Some(value) = first_capture(re, description) {
            variables.set(*key, value);
        }
    }

    extract_versions(description, &mut variables);

    let lower = description.to_lowercase();

    for chain in INFERENCE_CHAINS {
        if let Some(value) = chain.infer(&lower) {
            variables.set_if_absent(chain.key, value);
        }
    }

    trace!(count = variables.len(), "Extracted variables");
    variables
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Applies every `<tool> <version>` mention; later mentions overwrite earlier ones
fn extract_versions(description: &str, variables: &mut Variables) {
    for caps in VERSION_RE.captures_iter(description) {
        let tool = caps[1].to_lowercase();
        let version = &caps[2];

        if tool.contains("jdk") || tool.contains("java") {
            variables.set(VariableKey::JdkVersion, version);
        } else if tool.contains("node") {
            variables.set(VariableKey::NodeVersion, version);
        } else if tool.contains("python") {
            variables.set(VariableKey::PythonVersion, version);
        } else if tool.contains("go") {
            variables.set(VariableKey::GoVersion, format!("{}.x", version));
        } else if tool.contains("maven") {
            variables.set(VariableKey::MavenVersion, version);
        }
    }
}
