//! Immutable parameter models handed to the facade by callers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The image selection a build or deploy runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode<'a> {
    /// `-i <image>`
    Image(&'a str),
    /// `-r <registry>`, the tool derives the image.
    Registry(&'a str),
    /// No flag, the tool infers the image itself.
    AutoDiscovery,
}

/// Selects between an explicit image, a registry, or auto-discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRegistryModel {
    #[serde(default)]
    image: String,
    #[serde(default)]
    registry: String,
    #[serde(default)]
    auto_discovery: bool,
}

impl ImageRegistryModel {
    pub fn new(image: impl Into<String>, registry: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            registry: registry.into(),
            auto_discovery: false,
        }
    }

    pub fn image(image: impl Into<String>) -> Self {
        Self::new(image, "")
    }

    pub fn registry(registry: impl Into<String>) -> Self {
        Self::new("", registry)
    }

    pub fn auto_discovery() -> Self {
        Self {
            auto_discovery: true,
            ..Self::default()
        }
    }

    pub fn is_auto_discovery(&self) -> bool {
        self.auto_discovery
    }

    /// Resolves the single active mode.
    ///
    /// The image wins when both image and registry are set. An empty model
    /// behaves like auto-discovery.
    pub fn mode(&self) -> ImageMode<'_> {
        if self.auto_discovery {
            ImageMode::AutoDiscovery
        } else if !self.image.is_empty() {
            ImageMode::Image(&self.image)
        } else if !self.registry.is_empty() {
            ImageMode::Registry(&self.registry)
        } else {
            ImageMode::AutoDiscovery
        }
    }
}

/// A git repository `func deploy --remote` builds from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepoModel {
    pub repository: String,
    pub branch: Option<String>,
    pub context_dir: Option<String>,
}

impl GitRepoModel {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_context_dir(mut self, dir: impl Into<String>) -> Self {
        self.context_dir = Some(dir.into());
        self
    }
}

/// Parameters of a `func invoke` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeModel {
    pub path: Option<String>,
    /// `local`, `remote` or an explicit URL.
    pub target: Option<String>,
    /// `http` or `cloudevent`.
    pub format: Option<String>,
    pub id: Option<String>,
    pub source: Option<String>,
    pub event_type: Option<String>,
    pub content_type: Option<String>,
    pub data: Option<String>,
    pub file: Option<PathBuf>,
    pub namespace: Option<String>,
}

/// Everything `func create` needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFuncModel {
    pub path: String,
    pub runtime: String,
    pub template: String,
}

impl CreateFuncModel {
    pub fn new(
        path: impl Into<String>,
        runtime: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            runtime: runtime.into(),
            template: template.into(),
        }
    }
}
