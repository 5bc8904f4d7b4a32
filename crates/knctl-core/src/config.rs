use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::{DEFAULT_FUNC_COMMAND, DEFAULT_KN_COMMAND, PROXY_ENV_VARS};

/// Settings read from `knctl.toml`; every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnConfig {
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Extra environment passed to every `kn` / `func` invocation.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl KnConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let cfg = toml::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse TOML config: {path}"))?;
        Ok(cfg)
    }

    /// Merges the host's proxy variables into `env`, keeping configured values.
    pub fn capture_env(mut self) -> Self {
        for name in PROXY_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                self.env.entry((*name).to_string()).or_insert(value);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_kn")]
    pub kn: String,
    #[serde(default = "default_func")]
    pub func: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            kn: default_kn(),
            func: default_func(),
        }
    }
}

fn default_kn() -> String {
    DEFAULT_KN_COMMAND.to_string()
}

fn default_func() -> String {
    DEFAULT_FUNC_COMMAND.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterConfig {
    /// API server URL, e.g. `https://127.0.0.1:6443`.
    pub server: Option<String>,
    pub namespace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: KnConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.commands.kn, "kn");
        assert_eq!(cfg.commands.func, "func");
        assert!(cfg.cluster.server.is_none());
        assert!(cfg.env.is_empty());
    }

    #[test]
    fn parses_all_sections() {
        let cfg: KnConfig = toml::from_str(
            r#"
            [commands]
            kn = "/opt/kn/kn"

            [cluster]
            server = "https://127.0.0.1:6443"
            namespace = "apps"

            [env]
            KUBECONFIG = "/tmp/kubeconfig"
            "#,
        )
        .expect("fixture config should parse");
        assert_eq!(cfg.commands.kn, "/opt/kn/kn");
        assert_eq!(cfg.commands.func, "func");
        assert_eq!(cfg.cluster.namespace.as_deref(), Some("apps"));
        assert_eq!(cfg.env["KUBECONFIG"], "/tmp/kubeconfig");
    }

    #[test]
    fn load_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knctl.toml");
        std::fs::write(&path, "[commands]\nfunc = \"func-nightly\"\n").unwrap();
        let cfg = KnConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.commands.func, "func-nightly");

        let err = KnConfig::load_from_file("/nonexistent/knctl.toml").expect_err("must fail");
        assert!(err.to_string().contains("/nonexistent/knctl.toml"));
    }

    #[test]
    fn configured_env_wins_over_captured_proxy() {
        let mut cfg = KnConfig::default();
        for name in PROXY_ENV_VARS {
            cfg.env.insert((*name).to_string(), "configured".to_string());
        }
        let cfg = cfg.capture_env();
        assert!(cfg.env.values().all(|v| v == "configured"));
    }
}
