//! Modular pipeline templates
//!
//! A pipeline is stitched together from four independent pieces: a code
//! source, a build job, an artifact upload step nested in the build job, and
//! an optional deploy job. Bodies contain `{{variable || default}}`
//! placeholders plus `%RUNNER_GROUP%`, `%BUILD_IMAGE%` and `%DOTNET_IMAGE%`
//! markers filled from configuration.

use crate::nlp::variables::{VariableKey, Variables};

pub type TemplateDefaults = &'static [(VariableKey, &'static str)];

#[derive(Debug)]
pub struct SourceTemplate {
    pub kind: &'static str,
    pub keywords: &'static [&'static str],
    pub body: &'static str,
    pub defaults: TemplateDefaults,
}

#[derive(Debug)]
pub struct BuildStepTemplate {
    pub kind: &'static str,
    pub keywords: &'static [&'static str],
    pub languages: &'static [&'static str],
    pub build_tools: &'static [&'static str],
    pub body: &'static str,
    pub defaults: TemplateDefaults,
}

#[derive(Debug)]
pub struct UploadTemplate {
    pub kind: &'static str,
    pub body: &'static str,
    pub defaults: TemplateDefaults,
}

#[derive(Debug)]
pub struct DeployTemplate {
    pub kind: &'static str,
    pub keywords: &'static [&'static str],
    pub deploy_targets: &'static [&'static str],
    pub body: &'static str,
    pub defaults: TemplateDefaults,
}

/// Converts a template's default table into [`Variables`]
pub fn defaults_of(defaults: TemplateDefaults) -> Variables {
    defaults
        .iter()
        .map(|(key, value)| (*key, value.to_string()))
        .collect()
}

pub static CODEUP_SOURCE: SourceTemplate = SourceTemplate {
    kind: "codeup",
    keywords: &["codeup", "aliyun", "阿里云"],
    body: r#"sources:
  main_repo:
    type: codeup
    name: {{serviceName || '项目'}}
    endpoint: {{repoUrl || 'https://codeup.aliyun.com/your-org/your-repo.git'}}
    branch: {{branch || 'main'}}
    triggerEvents: push
    certificate:
      type: serviceConnection
      serviceConnection: {{serviceConnectionId || 'your-service-connection-id'}}"#,
    defaults: &[(VariableKey::Branch, "main")],
};

pub static GITHUB_SOURCE: SourceTemplate = SourceTemplate {
    kind: "github",
    keywords: &["github"],
    body: r#"sources:
  main_repo:
    type: github
    name: {{serviceName || '项目'}}
    endpoint: {{repoUrl || 'https://github.com/your-org/your-repo.git'}}
    branch: {{branch || 'main'}}
    triggerEvents: push
    certificate:
      type: serviceConnection
      serviceConnection: {{serviceConnectionId || 'your-service-connection-id'}}"#,
    defaults: &[(VariableKey::Branch, "main")],
};

pub static JAVA_MAVEN_BUILD: BuildStepTemplate = BuildStepTemplate {
    kind: "java_maven",
    keywords: &["java", "maven", "mvn"],
    languages: &["java"],
    build_tools: &["maven"],
    body: r#"      build_job:
        name: Maven构建
        runsOn:
          group: %RUNNER_GROUP%
          container: %BUILD_IMAGE%
        steps:
          setup_maven_settings_step:
            name: "下载MavenSettings"
            step: SetupMavenSettings
            with:
              mavenSettingXmlPath: "/root/.m2/settings.xml"
          setup_java_step:
            name: "安装Java环境"
            step: SetupJava
            with:
              jdkVersion: {{jdkVersion || "1.8"}}
              mavenVersion: {{mavenVersion || "3.5.2"}}
          command_step:
            name: "执行命令"
            step: Command
            with:
              run: |
                {{buildCommand || 'mvn clean package -Dmaven.test.skip=true'}}"#,
    defaults: &[
        (VariableKey::JdkVersion, "1.8"),
        (VariableKey::MavenVersion, "3.5.2"),
        (
            VariableKey::BuildCommand,
            "mvn clean package -Dmaven.test.skip=true",
        ),
        (VariableKey::TestCommand, "mvn test"),
        (VariableKey::ArtifactPath, "target/"),
    ],
};

pub static NODEJS_NPM_BUILD: BuildStepTemplate = BuildStepTemplate {
    kind: "nodejs_npm",
    keywords: &["nodejs", "node.js", "npm", "javascript"],
    languages: &["nodejs", "javascript", "js"],
    build_tools: &["npm"],
    body: r#"      build_job:
        name: Node.js构建
        runsOn:
          group: %RUNNER_GROUP%
          container: %BUILD_IMAGE%
        steps:
          setup_npmrc_step:
            name: "下载npmrc"
            step: SetupNpmrc
            with:
              npmPrivateRepoConfigPath: "/root/.npmrc"
          setup_node_step:
            name: "安装Node"
            step: SetupNode
            with:
              versionType: "predefined"
              nodeVersion: {{nodeVersion || "18.12"}}
              npmType: "npm"
          command_step:
            name: "执行命令"
            step: Command
            with:
              run: |
                {{buildCommand || 'npm install && npm run build'}}"#,
    defaults: &[
        (VariableKey::NodeVersion, "18.12"),
        (VariableKey::BuildCommand, "npm install && npm run build"),
        (VariableKey::TestCommand, "npm test"),
        (VariableKey::ArtifactPath, "dist/"),
    ],
};

pub static PYTHON_BUILD: BuildStepTemplate = BuildStepTemplate {
    kind: "python",
    keywords: &["python", "pip"],
    languages: &["python"],
    build_tools: &["pip", "poetry"],
    body: r#"      build_job:
        name: Python构建
        runsOn:
          group: %RUNNER_GROUP%
          container: %BUILD_IMAGE%
        steps:
          setup_python_step:
            name: "安装Python"
            step: SetupPython
            with:
              pythonVersion: {{pythonVersion || "3.7"}}
          command_step:
            name: "执行命令"
            step: Command
            with:
              run: |
                {{buildCommand || 'python --version'}}"#,
    defaults: &[
        (VariableKey::PythonVersion, "3.7"),
        (VariableKey::BuildCommand, "python --version"),
        (VariableKey::TestCommand, "python -m pytest"),
        (VariableKey::ArtifactPath, "."),
    ],
};

pub static GO_BUILD: BuildStepTemplate = BuildStepTemplate {
    kind: "go",
    keywords: &["go", "golang"],
    languages: &["go", "golang"],
    build_tools: &["go"],
    body: r#"      build_job:
        name: Go构建
        runsOn:
          group: %RUNNER_GROUP%
          container: %BUILD_IMAGE%
        steps:
          golang_build_step:
            name: "安装 Golang"
            step: SetupGo
            with:
              goVersion: {{goVersion || "1.21"}}
          command_step:
            name: "执行命令"
            step: Command
            with:
              run: |
                {{buildCommand || 'make build'}}"#,
    defaults: &[
        (VariableKey::GoVersion, "1.21"),
        (VariableKey::BuildCommand, "make build"),
        (VariableKey::TestCommand, "go test ./..."),
        (VariableKey::ArtifactPath, "."),
    ],
};

pub static DOTNET_BUILD: BuildStepTemplate = BuildStepTemplate {
    kind: "dotnet",
    keywords: &["dotnet", ".net", "csharp"],
    languages: &["csharp"],
    build_tools: &["dotnet"],
    body: r#"      build_job:
        name: .NET Core构建
        runsOn:
          group: %RUNNER_GROUP%
          container: %DOTNET_IMAGE%
        steps:
          command_step:
            name: "执行命令"
            step: Command
            with:
              run: |
                dotnet --info
                {{buildCommand || 'dotnet restore && dotnet publish -c Release -o out'}}"#,
    defaults: &[
        (
            VariableKey::BuildCommand,
            "dotnet restore && dotnet publish -c Release -o out",
        ),
        (VariableKey::TestCommand, "dotnet test"),
        (VariableKey::ArtifactPath, "out/"),
    ],
};

pub static PACKAGES_UPLOAD: UploadTemplate = UploadTemplate {
    kind: "packages",
    body: r#"          upload_step:
            step: ArtifactUpload
            name: 构建物上传
            with:
              uploadType: packages
              serviceConnection: {{packagesServiceConnection || 'your-packages-service-connection-id'}}
              repo: {{packagesRepoId || 'flow_generic_repo'}}
              artifact: {{artifactName || 'default'}}
              version: {{artifactVersion || '1.0.0'}}
              filePath:
                - {{artifactPath || '.'}}
              includePathInArtifact: {{includePathInArtifact || false}}"#,
    defaults: &[
        (VariableKey::UploadType, "packages"),
        (VariableKey::ArtifactName, "default"),
        (VariableKey::ArtifactVersion, "1.0.0"),
        (VariableKey::IncludePathInArtifact, "false"),
    ],
};

pub static FLOW_PUBLIC_UPLOAD: UploadTemplate = UploadTemplate {
    kind: "flowPublic",
    body: r#"          upload_step:
            step: ArtifactUpload
            name: 构建物上传
            with:
              uploadType: flowPublic
              artifact: {{artifactName || 'default'}}
              filePath:
                - {{artifactPath || '.'}}
              includePathInArtifact: {{includePathInArtifact || false}}"#,
    defaults: &[
        (VariableKey::UploadType, "flowPublic"),
        (VariableKey::ArtifactName, "default"),
        (VariableKey::IncludePathInArtifact, "false"),
    ],
};

pub static VM_DEPLOY: DeployTemplate = DeployTemplate {
    kind: "vm_deploy",
    keywords: &["vm", "host", "主机", "ecs"],
    deploy_targets: &["vm", "host", "主机"],
    body: r#"      deploy_job:
        name: 主机部署
        component: VMDeploy
        with:
          artifact: $[stages.build_stage.build_job.upload_step.artifacts.{{artifactName || 'default'}}]
          machineGroup: {{machineGroupId || 'your-machine-group-id'}}
          artifactDownloadPath: {{artifactDownloadPath || '/home/admin/app/package.tgz'}}
          executeUser: {{executeUser || 'root'}}
          pauseStrategy: {{pauseStrategy || 'firstBatchPause'}}
          batchNumber: {{batchNumber || 2}}
          run: |
            cd /home/admin/app
            tar -xzf package.tgz
            {{deployCommand || 'echo "请配置部署命令"'}}"#,
    defaults: &[
        (VariableKey::ExecuteUser, "root"),
        (VariableKey::ArtifactDownloadPath, "/home/admin/app/package.tgz"),
        (VariableKey::PauseStrategy, "firstBatchPause"),
        (VariableKey::BatchNumber, "2"),
    ],
};

pub static KUBERNETES_DEPLOY: DeployTemplate = DeployTemplate {
    kind: "kubernetes_deploy",
    keywords: &["kubernetes", "k8s", "kubectl", "deploy", "apply"],
    deploy_targets: &["kubernetes", "k8s"],
    body: r#"      kubectl_apply_job:
        name: Kubernetes发布
        runsOn:
          group: %RUNNER_GROUP%
          container: %BUILD_IMAGE%
        steps:
          kubectl_apply:
            step: KubectlApply
            name: "Kubectl 发布"
            with:
              kubernetesCluster: {{kubernetesClusterId || 'your-kubernetesCluster-id'}}
              kubectlVersion: {{kubectlVersion || "1.27.9"}}
              namespace: {{namespace || default}}
              yamlPath: {{yamlPath || app-configs/manifest-app}}
              variables:
                - key: image
                  value: $[stages.build_stage.build_job.acr_docker_build_step.artifacts.{{dockerImage || my_image}}]"#,
    defaults: &[
        (VariableKey::Namespace, "default"),
        (VariableKey::KubectlVersion, "1.27.9"),
        (VariableKey::YamlPath, "app-configs/manifest-app"),
    ],
};

pub static SOURCE_TEMPLATES: &[&SourceTemplate] = &[&CODEUP_SOURCE, &GITHUB_SOURCE];

pub static BUILD_STEP_TEMPLATES: &[&BuildStepTemplate] = &[
    &JAVA_MAVEN_BUILD,
    &NODEJS_NPM_BUILD,
    &PYTHON_BUILD,
    &GO_BUILD,
    &DOTNET_BUILD,
];

pub static UPLOAD_TEMPLATES: &[&UploadTemplate] = &[&PACKAGES_UPLOAD, &FLOW_PUBLIC_UPLOAD];

pub static DEPLOY_TEMPLATES: &[&DeployTemplate] = &[&VM_DEPLOY, &KUBERNETES_DEPLOY];

fn fuzzy_eq(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn any_fuzzy(candidates: &[&str], inputs: &[String]) -> bool {
    candidates
        .iter()
        .any(|c| inputs.iter().any(|i| fuzzy_eq(i, c)))
}

fn normalize(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// Picks the source template whose keywords match, Codeup otherwise
pub fn find_source_template(keywords: &[String]) -> &'static SourceTemplate {
    let keywords = normalize(keywords);
    SOURCE_TEMPLATES
        .iter()
        .copied()
        .find(|t| any_fuzzy(t.keywords, &keywords))
        .unwrap_or(&CODEUP_SOURCE)
}

/// Scores every build template and returns the best one
///
/// Language hits weigh 10, build tool hits 5 and keyword hits 2. The first
/// template wins ties; a zero score matches nothing.
pub fn find_build_template(
    keywords: &[String],
    languages: &[String],
    build_tools: &[String],
) -> Option<&'static BuildStepTemplate> {
    let keywords = normalize(keywords);
    let languages = normalize(languages);
    let build_tools = normalize(build_tools);

    let mut best: Option<&'static BuildStepTemplate> = None;
    let mut best_score = 0;

    for template in BUILD_STEP_TEMPLATES.iter().copied() {
        let score = score_hits(template.languages, &languages, 10)
            + score_hits(template.build_tools, &build_tools, 5)
            + score_hits(template.keywords, &keywords, 2);

        if score > best_score {
            best_score = score;
            best = Some(template);
        }
    }

    best
}

fn score_hits(candidates: &[&str], inputs: &[String], weight: u32) -> u32 {
    candidates
        .iter()
        .filter(|c| inputs.iter().any(|i| fuzzy_eq(i, c)))
        .count() as u32
        * weight
}

/// Upload template by exact kind, packages otherwise
pub fn find_upload_template(upload_type: &str) -> &'static UploadTemplate {
    UPLOAD_TEMPLATES
        .iter()
        .copied()
        .find(|t| t.kind == upload_type)
        .unwrap_or(&PACKAGES_UPLOAD)
}

/// Deploy template whose targets match one of `deploy_targets`
pub fn find_deploy_template(deploy_targets: &[String]) -> Option<&'static DeployTemplate> {
    let targets = normalize(deploy_targets);
    DEPLOY_TEMPLATES
        .iter()
        .copied()
        .find(|t| any_fuzzy(t.deploy_targets, &targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_defaults_to_codeup() {
        assert_eq!(find_source_template(&strings(&["java", "maven"])).kind, "codeup");
    }

    #[test]
    fn test_source_github_from_repo_url() {
        let keywords = strings(&["go", "go", "https://github.com/acme/api.git"]);
        assert_eq!(find_source_template(&keywords).kind, "github");
    }

    #[test]
    fn test_build_template_scoring() {
        let pick = |lang: &str, tool: &str| {
            find_build_template(&strings(&[lang, tool]), &strings(&[lang]), &strings(&[tool]))
                .map(|t| t.kind)
        };
        assert_eq!(pick("java", "maven"), Some("java_maven"));
        assert_eq!(pick("java", "gradle"), Some("java_maven"));
        assert_eq!(pick("nodejs", "yarn"), Some("nodejs_npm"));
        assert_eq!(pick("python", "pip"), Some("python"));
        assert_eq!(pick("go", "go"), Some("go"));
        assert_eq!(pick("dotnet", "dotnet"), Some("dotnet"));
    }

    #[test]
    fn test_build_template_none_for_unknown() {
        assert!(find_build_template(&strings(&["zig"]), &strings(&["zig"]), &[]).is_none());
    }

    #[test]
    fn test_upload_template_lookup() {
        assert_eq!(find_upload_template("flowPublic").kind, "flowPublic");
        assert_eq!(find_upload_template("packages").kind, "packages");
        assert_eq!(find_upload_template("unknown").kind, "packages");
    }

    #[test]
    fn test_deploy_template_lookup() {
        assert_eq!(
            find_deploy_template(&strings(&["k8s"])).map(|t| t.kind),
            Some("kubernetes_deploy")
        );
        assert_eq!(find_deploy_template(&strings(&["vm"])).map(|t| t.kind), Some("vm_deploy"));
        assert!(find_deploy_template(&strings(&["none"])).is_none());
        assert!(find_deploy_template(&[]).is_none());
    }

    #[test]
    fn test_defaults_of() {
        let vars = defaults_of(KUBERNETES_DEPLOY.defaults);
        assert_eq!(vars.get(VariableKey::Namespace), Some("default"));
        assert_eq!(vars.len(), 3);
    }
}
