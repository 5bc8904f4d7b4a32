use thiserror::Error;
use tracing::{debug, instrument};

use crate::constants::{EVENTING_GROUP, SERVING_GROUP};
use crate::error::Result;

/// A failure reported by the Kubernetes client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ClientError {
    message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The subset of a Kubernetes client that knctl needs.
///
/// Credentials and kubeconfig handling belong to the implementor.
pub trait ClusterClient: std::fmt::Debug + Send + Sync {
    /// Returns the API root paths advertised by the cluster (`GET /`).
    fn root_paths(&self) -> std::result::Result<Vec<String>, ClientError>;

    /// The API server URL the client talks to.
    fn master_url(&self) -> String;

    /// The namespace configured on the client, possibly empty.
    fn namespace(&self) -> String;
}

/// Returns true if the cluster serves the Knative Serving API group.
pub fn is_serving_aware(client: &dyn ClusterClient) -> Result<bool> {
    has_api_group(client, SERVING_GROUP)
}

/// Returns true if the cluster serves the Knative Eventing API group.
pub fn is_eventing_aware(client: &dyn ClusterClient) -> Result<bool> {
    has_api_group(client, EVENTING_GROUP)
}

#[instrument(skip(client))]
fn has_api_group(client: &dyn ClusterClient, group: &str) -> Result<bool> {
    let paths = client.root_paths()?;
    let found = paths.iter().any(|path| path.contains(group));
    debug!("api group {} present: {}", group, found);
    Ok(found)
}
