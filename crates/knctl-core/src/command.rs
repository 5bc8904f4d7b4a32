//! Side-effect-free argv builders for `kn` and `func`.

use std::fmt::{Display, Formatter};

use crate::params::{CreateFuncModel, GitRepoModel, ImageMode, ImageRegistryModel, InvokeModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Kn,
    Func,
}

impl Tool {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kn => "kn",
            Self::Func => "func",
        }
    }
}

/// Resource kinds addressed through `kn <kind> <verb>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Service,
    Revision,
    Source,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Revision => "revision",
            Self::Source => "source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// One invocation of an external tool: which binary, and its argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(tool: Tool) -> Self {
        Self {
            tool,
            args: Vec::new(),
        }
    }

    fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    fn flag(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    fn flag_opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.flag(flag, value),
            _ => self,
        }
    }

    fn namespace(self, namespace: &str) -> Self {
        self.flag("-n", namespace)
    }

    fn image(self, model: &ImageRegistryModel) -> Self {
        match model.mode() {
            ImageMode::Image(image) => self.flag("-i", image),
            ImageMode::Registry(registry) => self.flag("-r", registry),
            ImageMode::AutoDiscovery => self,
        }
    }

    fn output(self, format: OutputFormat) -> Self {
        self.flag("-o", format.as_str())
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tool.as_str())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

pub fn list_services(namespace: &str) -> Invocation {
    list(ResourceKind::Service, namespace)
}

pub fn list_sources(namespace: &str) -> Invocation {
    list(ResourceKind::Source, namespace)
}

fn list(kind: ResourceKind, namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args([kind.as_str(), "list"])
        .output(OutputFormat::Json)
        .namespace(namespace)
}

pub fn list_revisions(service: &str, namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args(["revision", "list"])
        .flag("-s", service)
        .output(OutputFormat::Json)
        .namespace(namespace)
}

pub fn list_functions(namespace: &str) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("list")
        .output(OutputFormat::Json)
        .namespace(namespace)
}

/// `kn <kind> describe <name>`; JSON for typed parsing, YAML for display.
pub fn describe(kind: ResourceKind, name: &str, format: OutputFormat, namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args([kind.as_str(), "describe", name])
        .output(format)
        .namespace(namespace)
}

pub fn delete(kind: ResourceKind, names: &[String], namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args([kind.as_str(), "delete"])
        .args(names.iter().cloned())
        .namespace(namespace)
}

/// `func delete` takes the names directly, without a kind prefix.
pub fn delete_functions(names: &[String], namespace: &str) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("delete")
        .args(names.iter().cloned())
        .namespace(namespace)
}

pub fn create_func(model: &CreateFuncModel, namespace: &str) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("create")
        .arg(model.path.as_str())
        .flag("-l", model.runtime.as_str())
        .flag("-t", model.template.as_str())
        .namespace(namespace)
}

pub fn build_func(path: &str, model: &ImageRegistryModel) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("build")
        .image(model)
        .flag("-p", path)
        .arg("-v")
}

/// Deploys an already built image; never triggers a local build.
pub fn deploy_func(namespace: &str, path: &str, model: &ImageRegistryModel) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("deploy")
        .image(model)
        .namespace(namespace)
        .flag("-p", path)
        .arg("-v")
        .args(["--build", "false"])
}

/// Builds on the cluster from a git repository.
pub fn on_cluster_deploy_func(
    namespace: &str,
    path: &str,
    repo: &GitRepoModel,
    model: &ImageRegistryModel,
) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("deploy")
        .image(model)
        .namespace(namespace)
        .flag("-p", path)
        .arg("--remote")
        .flag("--git-url", repo.repository.as_str())
        .flag_opt("--git-branch", repo.branch.as_deref())
        .flag_opt("--git-dir", repo.context_dir.as_deref())
        .arg("-v")
}

pub fn run_func(path: &str) -> Invocation {
    Invocation::new(Tool::Func)
        .arg("run")
        .flag("-p", path)
        .arg("-b=false")
}

pub fn invoke_func(model: &InvokeModel) -> Invocation {
    let file = model.file.as_ref().map(|f| f.to_string_lossy().into_owned());
    let invocation = Invocation::new(Tool::Func)
        .arg("invoke")
        .flag_opt("-p", model.path.as_deref())
        .flag_opt("--target", model.target.as_deref())
        .flag_opt("--format", model.format.as_deref())
        .flag_opt("--id", model.id.as_deref())
        .flag_opt("--source", model.source.as_deref())
        .flag_opt("--type", model.event_type.as_deref())
        .flag_opt("--content-type", model.content_type.as_deref());

    // --data and --file are exclusive, inline data wins.
    let invocation = match (&model.data, &file) {
        (Some(data), _) => invocation.flag("--data", data.as_str()),
        (None, Some(file)) => invocation.flag("--file", file.as_str()),
        (None, None) => invocation,
    };

    invocation
        .flag_opt("-n", model.namespace.as_deref())
        .output(OutputFormat::Json)
}

pub fn tag_revision(service: &str, revision: &str, tag: &str, namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args(["service", "update", service])
        .flag("--tag", format!("{revision}={tag}"))
        .namespace(namespace)
}

pub fn untag_revision(service: &str, tag: &str, namespace: &str) -> Invocation {
    Invocation::new(Tool::Kn)
        .args(["service", "update", service])
        .flag("--untag", tag)
        .namespace(namespace)
}

pub fn version(tool: Tool) -> Invocation {
    Invocation::new(tool).arg("version")
}
