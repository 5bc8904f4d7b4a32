//! Constants shared across the knctl workspace.

/// The filename for knctl's configuration.
pub const CONFIG_FILE: &str = "knctl.toml";

/// The manifest file every Knative Function project carries at its root.
pub const FUNC_MANIFEST: &str = "func.yaml";

/// Namespace used whenever the cluster client reports none.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default executables, resolved through `PATH`.
pub const DEFAULT_KN_COMMAND: &str = "kn";
pub const DEFAULT_FUNC_COMMAND: &str = "func";

/// API groups probed on the cluster root paths.
pub const SERVING_GROUP: &str = "serving.knative.dev";
pub const EVENTING_GROUP: &str = "eventing.knative.dev";

/// Label set by Knative Serving on every revision it owns.
pub const SERVICE_LABEL: &str = "serving.knative.dev/service";

/// Messages printed by `kn` and `func` instead of an empty JSON list.
pub const NO_SERVICES: &str = "No services found.";
pub const NO_REVISIONS: &str = "No revisions found.";
pub const NO_FUNCTIONS: &str = "No functions found.";
pub const NO_SOURCES: &str = "No sources found.";

/// Prefix of every failure raised when `func invoke` yields no execution ID.
pub const INVOKE_ID_ERROR: &str = "Failed to retrieve invoke execution ID.";

/// Error text raised when a function directory holds no manifest.
pub const FUNC_FILE_NOT_FOUND: &str = "No func.yaml file found";

/// Proxy variables captured from the host environment at construction.
pub const PROXY_ENV_VARS: &[&str] = &[
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "NO_PROXY",
    "http_proxy",
    "https_proxy",
    "no_proxy",
];
