use knctl_core::{ClientError, ClusterClient};
use serde::Deserialize;
use tracing::debug;

/// Response body of `GET /` on the Kubernetes API server.
#[derive(Debug, Deserialize)]
struct RootPaths {
    #[serde(default)]
    paths: Vec<String>,
}

/// Talks to the API server over plain HTTPS with an optional bearer token.
#[derive(Debug, Clone)]
pub struct HttpClusterClient {
    server: Option<String>,
    namespace: String,
    token: Option<String>,
}

impl HttpClusterClient {
    pub fn new(server: Option<String>, namespace: Option<String>, token: Option<String>) -> Self {
        Self {
            server,
            namespace: namespace.unwrap_or_default(),
            token,
        }
    }
}

impl ClusterClient for HttpClusterClient {
    fn root_paths(&self) -> Result<Vec<String>, ClientError> {
        let server = self
            .server
            .as_deref()
            .ok_or_else(|| ClientError::new("no cluster server configured"))?;
        let url = format!("{}/", server.trim_end_matches('/'));
        debug!("querying root paths at {}", url);

        let mut request = ureq::get(&url).set("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        let response = request
            .call()
            .map_err(|e| ClientError::new(e.to_string()))?;
        let root: RootPaths = response
            .into_json()
            .map_err(|e| ClientError::new(e.to_string()))?;
        Ok(root.paths)
    }

    fn master_url(&self) -> String {
        self.server.clone().unwrap_or_default()
    }

    fn namespace(&self) -> String {
        self.namespace.clone()
    }
}
