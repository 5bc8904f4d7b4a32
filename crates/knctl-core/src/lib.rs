//! Core logic for driving Knative Serving, Eventing and Functions through
//! the `kn` and `func` command-line tools.
//!
//! This crate defines the domain models, the argv builders, the output
//! parsers, the process-runner contract and the [`KnCli`] facade that ties
//! them together.

pub mod cluster;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod kn;
pub mod model;
pub mod params;
pub mod parser;
pub mod runner;

pub use cluster::{ClientError, ClusterClient};
pub use config::KnConfig;
pub use error::{KnError, Result};
pub use kn::KnCli;
pub use model::{FuncManifest, Function, Revision, Service, Source};
pub use params::{CreateFuncModel, GitRepoModel, ImageMode, ImageRegistryModel, InvokeModel};
pub use runner::{ConsoleSink, ExecResult, ProcessHandle, ProcessListener, ProcessRunner, StreamKind};
