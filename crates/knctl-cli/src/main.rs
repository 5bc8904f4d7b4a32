use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use knctl_core::runner::SubprocessRunner;
use knctl_core::{
    CreateFuncModel, GitRepoModel, ImageRegistryModel, InvokeModel, KnCli, KnConfig,
    ProcessHandle, Service,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod console;
mod http;
mod styles;

use console::{LogListener, TerminalConsole};
use http::HttpClusterClient;

use styles as s;

/// The command-line interface for knctl.
#[derive(Debug, Parser)]
#[command(name = "knctl")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(
    help_template = "{bin} {version}\n\n{about-with-newline}{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
#[command(about = "Manage Knative services, revisions, sources and functions")]
#[command(
    long_about = "knctl drives the `kn` and `func` CLIs against the current cluster and
renders their results.

Common Commands:
  info              Show the cluster URL, namespace and installed Knative APIs
  service list      List Knative services
  revision list     List the revisions of a service, newest first
  func build        Build a function image locally
  func deploy       Deploy a built function
"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to knctl config file.
    #[arg(long, default_value = knctl_core::constants::CONFIG_FILE)]
    config: String,
    /// Kubernetes API server URL (overrides the config file).
    #[arg(long)]
    server: Option<String>,
    /// Namespace to operate in (overrides the config file).
    #[arg(long, short = 'n')]
    namespace: Option<String>,
    /// Bearer token sent with API server requests.
    #[arg(long)]
    token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show cluster and capability information.
    Info,
    /// Show the `kn` and `func` versions.
    Version,
    /// Manage Knative services.
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Manage service revisions.
    Revision {
        #[command(subcommand)]
        action: RevisionAction,
    },
    /// Inspect event sources.
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },
    /// Manage Knative Functions.
    Func {
        #[command(subcommand)]
        action: FuncAction,
    },
}

#[derive(Debug, Subcommand)]
enum ServiceAction {
    List,
    Describe {
        name: String,
        /// Print the raw YAML manifest.
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum RevisionAction {
    List {
        service: String,
    },
    Describe {
        name: String,
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Tag {
        service: String,
        revision: String,
        tag: String,
    },
    Untag {
        service: String,
        tag: String,
    },
}

#[derive(Debug, Subcommand)]
enum SourceAction {
    List,
}

#[derive(Debug, Args)]
struct ImageArgs {
    /// Full image name, e.g. `quay.io/user/fn:latest`.
    #[arg(short = 'i', long, conflicts_with = "registry")]
    image: Option<String>,
    /// Registry the image name is derived from.
    #[arg(short = 'r', long)]
    registry: Option<String>,
}

impl ImageArgs {
    fn to_model(&self) -> ImageRegistryModel {
        match (&self.image, &self.registry) {
            (Some(image), _) => ImageRegistryModel::image(image.clone()),
            (None, Some(registry)) => ImageRegistryModel::registry(registry.clone()),
            (None, None) => ImageRegistryModel::auto_discovery(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum FuncAction {
    List,
    Create {
        path: String,
        #[arg(short = 'l', long)]
        runtime: String,
        #[arg(short = 't', long, default_value = "http")]
        template: String,
    },
    Build {
        #[arg(short = 'p', long, default_value = ".")]
        path: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    Deploy {
        #[arg(short = 'p', long, default_value = ".")]
        path: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Build on the cluster from a git repository, then deploy.
    RemoteDeploy {
        #[arg(short = 'p', long, default_value = ".")]
        path: String,
        #[arg(long)]
        git_url: String,
        #[arg(long)]
        git_branch: Option<String>,
        #[arg(long)]
        git_dir: Option<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    Run {
        #[arg(short = 'p', long, default_value = ".")]
        path: String,
    },
    Invoke {
        #[arg(short = 'p', long)]
        path: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        content_type: Option<String>,
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the parsed func.yaml of a function project.
    Manifest {
        #[arg(short = 'p', long, default_value = ".")]
        path: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let command = match &cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let cfg = load_config(&cli)?;
    let kn = build_facade(&cli, &cfg);
    execute(&kn, command)
}

/// Loads the config file; a missing default file means built-in defaults.
fn load_config(cli: &Cli) -> Result<KnConfig> {
    let cfg = if Path::new(&cli.config).exists() {
        KnConfig::load_from_file(&cli.config)
            .with_context(|| format!("unable to load config '{}'", cli.config))?
    } else if cli.config == knctl_core::constants::CONFIG_FILE {
        debug!("no {} found, using defaults", cli.config);
        KnConfig::default()
    } else {
        bail!("config file '{}' does not exist", cli.config);
    };
    Ok(cfg.capture_env())
}

fn build_facade(cli: &Cli, cfg: &KnConfig) -> KnCli {
    let client = HttpClusterClient::new(
        cli.server.clone().or_else(|| cfg.cluster.server.clone()),
        cli.namespace.clone().or_else(|| cfg.cluster.namespace.clone()),
        cli.token.clone(),
    );
    KnCli::new(Box::new(client), Box::new(SubprocessRunner::new()), cfg)
}

fn execute(kn: &KnCli, command: &Commands) -> Result<()> {
    match command {
        Commands::Info => {
            println!("server:    {}", kn.master_url());
            println!("namespace: {}", kn.namespace());
            println!("serving:   {}", kn.is_serving_aware()?);
            println!("eventing:  {}", kn.is_eventing_aware()?);
            Ok(())
        }
        Commands::Version => {
            let kn_version = kn.kn_version()?.unwrap_or_else(|| "unknown".to_string());
            let func_version = kn.func_version()?.unwrap_or_else(|| "unknown".to_string());
            println!("kn:   {kn_version}");
            println!("func: {func_version}");
            Ok(())
        }
        Commands::Service { action } => execute_service(kn, action),
        Commands::Revision { action } => execute_revision(kn, action),
        Commands::Source {
            action: SourceAction::List,
        } => {
            for source in kn.sources()? {
                println!(
                    "{:<32} {:<20} {}",
                    source.name(),
                    source.source_type(),
                    source.sink().unwrap_or_default()
                );
            }
            Ok(())
        }
        Commands::Func { action } => execute_func(kn, action),
    }
}

fn execute_service(kn: &KnCli, action: &ServiceAction) -> Result<()> {
    match action {
        ServiceAction::List => {
            for service in kn.services()? {
                println!(
                    "{:<24} {:<48} {:<20} {}",
                    service.name(),
                    service.url().unwrap_or_default(),
                    service.latest_revision().unwrap_or_default(),
                    s::ready_label(service.is_ready())
                );
            }
        }
        ServiceAction::Describe { name, yaml: true } => print!("{}", kn.service_yaml(name)?),
        ServiceAction::Describe { name, yaml: false } => {
            let service = kn.service(name)?;
            println!("{}", serde_json::to_string_pretty(&service)?);
        }
        ServiceAction::Delete { names } => {
            kn.delete_services(names)?;
            println!("deleted {}", names.join(", "));
        }
    }
    Ok(())
}

fn execute_revision(kn: &KnCli, action: &RevisionAction) -> Result<()> {
    match action {
        RevisionAction::List { service } => {
            let owner = kn.service(service)?;
            for revision in kn.revisions_for_service(service)? {
                let latest = if owner.latest_ready_revision() == Some(revision.name()) {
                    "*"
                } else {
                    ""
                };
                println!(
                    "{:<32} {:<1} {:<16} {}",
                    revision.name(),
                    latest,
                    traffic_column(&owner, revision.name()),
                    s::ready_label(revision.is_ready())
                );
            }
        }
        RevisionAction::Describe { name, yaml: true } => print!("{}", kn.revision_yaml(name)?),
        RevisionAction::Describe { name, yaml: false } => {
            let revision = kn.revision(name)?;
            println!("{}", serde_json::to_string_pretty(&revision)?);
        }
        RevisionAction::Delete { names } => {
            kn.delete_revisions(names)?;
            println!("deleted {}", names.join(", "));
        }
        RevisionAction::Tag {
            service,
            revision,
            tag,
        } => kn.tag_revision(service, revision, tag)?,
        RevisionAction::Untag { service, tag } => kn.untag_revision(service, tag)?,
    }
    Ok(())
}

fn execute_func(kn: &KnCli, action: &FuncAction) -> Result<()> {
    let console = Arc::new(TerminalConsole);
    let listener = |operation: &str| -> Option<Arc<dyn knctl_core::ProcessListener>> {
        Some(Arc::new(LogListener {
            operation: operation.to_string(),
        }))
    };

    match action {
        FuncAction::List => {
            for function in kn.functions()? {
                println!(
                    "{:<24} {:<10} {:<48} {}",
                    function.name(),
                    function.runtime,
                    function.url.as_deref().unwrap_or_default(),
                    s::ready_label(Some(function.is_ready()))
                );
            }
            Ok(())
        }
        FuncAction::Create {
            path,
            runtime,
            template,
        } => {
            kn.create_func(&CreateFuncModel::new(path, runtime, template))?;
            println!("created {path}");
            Ok(())
        }
        FuncAction::Build { path, image } => {
            let handle = kn.build_func(path, &image.to_model(), console, listener("build"))?;
            wait_for("build", handle)
        }
        FuncAction::Deploy { path, image } => {
            let handle = kn.deploy_func(
                &kn.namespace(),
                path,
                &image.to_model(),
                console,
                listener("deploy"),
            )?;
            wait_for("deploy", handle)
        }
        FuncAction::RemoteDeploy {
            path,
            git_url,
            git_branch,
            git_dir,
            image,
        } => {
            let mut repo = GitRepoModel::new(git_url.as_str());
            repo.branch = git_branch.clone();
            repo.context_dir = git_dir.clone();
            let handle = kn.on_cluster_build_func(
                &kn.namespace(),
                path,
                &repo,
                &image.to_model(),
                console,
                listener("remote deploy"),
            )?;
            wait_for("remote deploy", handle)
        }
        FuncAction::Run { path } => {
            let handle = kn.run_func(path, console, listener("run"))?;
            wait_for("run", handle)
        }
        FuncAction::Invoke {
            path,
            target,
            format,
            id,
            source,
            event_type,
            content_type,
            data,
            file,
        } => {
            let model = InvokeModel {
                path: path.clone(),
                target: target.clone(),
                format: format.clone(),
                id: id.clone(),
                source: source.clone(),
                event_type: event_type.clone(),
                content_type: content_type.clone(),
                data: data.clone(),
                file: file.clone(),
                namespace: Some(kn.namespace()),
            };
            println!("{}", kn.invoke_func(&model)?);
            Ok(())
        }
        FuncAction::Delete { names } => {
            kn.delete_functions(names)?;
            println!("deleted {}", names.join(", "));
            Ok(())
        }
        FuncAction::Manifest { path } => {
            let manifest = kn.func_manifest(Path::new(path))?;
            println!("name:      {}", manifest.name);
            println!("runtime:   {}", manifest.runtime);
            println!("registry:  {}", manifest.registry.as_deref().unwrap_or_default());
            println!("image:     {}", manifest.image.as_deref().unwrap_or_default());
            println!(
                "namespace: {}",
                manifest.target_namespace().unwrap_or_default()
            );
            Ok(())
        }
    }
}

/// Traffic share routed to `revision`, with any tags, e.g. `90% @blue`.
fn traffic_column(service: &Service, revision: &str) -> String {
    let mut percent = 0;
    let mut tags = Vec::new();
    for target in service.traffic_for(revision) {
        percent += target.percent.unwrap_or(0);
        if let Some(tag) = target.tag.as_deref() {
            tags.push(format!("@{tag}"));
        }
    }
    if percent == 0 && tags.is_empty() {
        return String::new();
    }
    std::iter::once(format!("{percent}%"))
        .chain(tags)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Blocks until a streamed operation exits and maps its status.
fn wait_for(operation: &str, mut handle: Box<dyn ProcessHandle>) -> Result<()> {
    let code = handle
        .wait()
        .with_context(|| format!("failed to wait for {operation}"))?;
    match code {
        Some(0) => Ok(()),
        Some(code) => bail!("{operation} failed with exit code {code}"),
        None => bail!("{operation} was terminated"),
    }
}
