//! Typed projections of the objects returned by `kn` and `func`.
//!
//! Every value is materialized fresh from CLI output and never cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::SERVICE_LABEL;

/// Kubernetes-style list envelope (`{"items": [...]}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub uid: Option<String>,
    pub generation: Option<i64>,
    pub creation_timestamp: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

fn ready_from(conditions: &[Condition]) -> Option<bool> {
    conditions
        .iter()
        .find(|c| c.kind == "Ready")
        .map(|c| c.status.eq_ignore_ascii_case("true"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    pub revision_name: Option<String>,
    pub latest_revision: Option<bool>,
    pub percent: Option<u32>,
    pub tag: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub url: Option<String>,
    pub observed_generation: Option<i64>,
    pub latest_created_revision_name: Option<String>,
    pub latest_ready_revision_name: Option<String>,
    #[serde(default)]
    pub traffic: Vec<TrafficTarget>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// A Knative Serving service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: ServiceStatus,
}

impl Service {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn url(&self) -> Option<&str> {
        self.status.url.as_deref()
    }

    pub fn latest_revision(&self) -> Option<&str> {
        self.status.latest_created_revision_name.as_deref()
    }

    pub fn latest_ready_revision(&self) -> Option<&str> {
        self.status.latest_ready_revision_name.as_deref()
    }

    pub fn is_ready(&self) -> Option<bool> {
        ready_from(&self.status.conditions)
    }

    /// Traffic targets pointing at the named revision.
    pub fn traffic_for<'a>(&'a self, revision: &'a str) -> impl Iterator<Item = &'a TrafficTarget> {
        self.status
            .traffic
            .iter()
            .filter(move |t| t.revision_name.as_deref() == Some(revision))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStatus {
    pub image_digest: Option<String>,
    pub actual_replicas: Option<u32>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// An immutable snapshot of a service, named `<service>-<NNNNN>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: RevisionStatus,
}

impl Revision {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// The owning service, taken from the serving label.
    pub fn service_name(&self) -> Option<&str> {
        self.metadata.labels.get(SERVICE_LABEL).map(String::as_str)
    }

    pub fn is_ready(&self) -> Option<bool> {
        ready_from(&self.status.conditions)
    }

    /// Numeric generation parsed from the trailing `-NNNNN` segment.
    pub fn generation(&self) -> Option<u64> {
        let (_, suffix) = self.metadata.name.rsplit_once('-')?;
        suffix.parse().ok()
    }
}

/// A Knative Function as reported by `func list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub runtime: String,
    pub url: Option<String>,
    pub ready: Option<String>,
    pub image: Option<String>,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        self.ready
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("true"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub namespace: Option<String>,
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "ref")]
    pub reference: Option<ObjectReference>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub sink: Option<Destination>,
}

/// An event source, listed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SourceSpec,
}

impl Source {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// The source type, e.g. `ApiServerSource`.
    pub fn source_type(&self) -> &str {
        &self.kind
    }

    /// The sink rendered as `Kind:name`, or its URI.
    pub fn sink(&self) -> Option<String> {
        let sink = self.spec.sink.as_ref()?;
        match (&sink.reference, &sink.uri) {
            (Some(r), _) => Some(format!("{}:{}", r.kind, r.name)),
            (None, Some(uri)) => Some(uri.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FuncBuildSpec {
    pub builder: Option<String>,
    #[serde(default)]
    pub buildpacks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FuncDeploySpec {
    pub namespace: Option<String>,
    pub image: Option<String>,
}

/// The subset of `func.yaml` knctl reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncManifest {
    pub spec_version: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub runtime: String,
    pub registry: Option<String>,
    pub image: Option<String>,
    pub namespace: Option<String>,
    #[serde(default)]
    pub build: FuncBuildSpec,
    #[serde(default)]
    pub deploy: FuncDeploySpec,
}

impl FuncManifest {
    /// Namespace from `deploy.namespace`, falling back to the top-level field.
    pub fn target_namespace(&self) -> Option<&str> {
        self.deploy
            .namespace
            .as_deref()
            .or(self.namespace.as_deref())
            .filter(|ns| !ns.is_empty())
    }
}
