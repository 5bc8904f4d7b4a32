use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cluster::{self, ClusterClient};
use crate::command::{self, Invocation, OutputFormat, ResourceKind, Tool};
use crate::config::KnConfig;
use crate::constants::{DEFAULT_NAMESPACE, NO_SERVICES, NO_SOURCES};
use crate::error::{KnError, Result};
use crate::model::{FuncManifest, Function, Revision, Service, Source};
use crate::params::{CreateFuncModel, GitRepoModel, ImageRegistryModel, InvokeModel};
use crate::parser;
use crate::runner::{ConsoleSink, ExecResult, ProcessHandle, ProcessListener, ProcessRunner};

/// Entry point for every Knative operation.
///
/// Each call is an independent request/response cycle against `kn`, `func`
/// or the cluster client. Failures are passed through unchanged and never
/// retried.
#[derive(Debug)]
pub struct KnCli {
    client: Box<dyn ClusterClient>,
    runner: Box<dyn ProcessRunner>,
    kn_command: String,
    func_command: String,
    env_vars: HashMap<String, String>,
}

impl KnCli {
    /// Builds the facade; the environment map is snapshotted here and never
    /// changes afterwards.
    pub fn new(
        client: Box<dyn ClusterClient>,
        runner: Box<dyn ProcessRunner>,
        config: &KnConfig,
    ) -> Self {
        Self {
            client,
            runner,
            kn_command: config.commands.kn.clone(),
            func_command: config.commands.func.clone(),
            env_vars: config.env.clone(),
        }
    }

    pub fn is_serving_aware(&self) -> Result<bool> {
        cluster::is_serving_aware(self.client.as_ref())
    }

    pub fn is_eventing_aware(&self) -> Result<bool> {
        cluster::is_eventing_aware(self.client.as_ref())
    }

    pub fn master_url(&self) -> String {
        self.client.master_url()
    }

    /// The client's namespace, or `default` when it reports none.
    pub fn namespace(&self) -> String {
        let namespace = self.client.namespace();
        if namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            namespace
        }
    }

    #[instrument(skip(self))]
    pub fn services(&self) -> Result<Vec<Service>> {
        let output = self.listing(&command::list_services(&self.namespace()), NO_SERVICES)?;
        parser::parse_services(&output)
    }

    #[instrument(skip(self))]
    pub fn service(&self, name: &str) -> Result<Service> {
        let inv = command::describe(ResourceKind::Service, name, OutputFormat::Json, &self.namespace());
        parser::parse_service(&self.execute(&inv)?)
    }

    /// Raw manifest text, returned exactly as `kn` printed it.
    #[instrument(skip(self))]
    pub fn service_yaml(&self, name: &str) -> Result<String> {
        let inv = command::describe(ResourceKind::Service, name, OutputFormat::Yaml, &self.namespace());
        self.execute(&inv)
    }

    /// Revisions of `service`, newest first.
    #[instrument(skip(self))]
    pub fn revisions_for_service(&self, service: &str) -> Result<Vec<Revision>> {
        let output = self.execute(&command::list_revisions(service, &self.namespace()))?;
        parser::parse_revisions(&output)
    }

    #[instrument(skip(self))]
    pub fn revision(&self, name: &str) -> Result<Revision> {
        let inv = command::describe(ResourceKind::Revision, name, OutputFormat::Json, &self.namespace());
        parser::parse_revision(&self.execute(&inv)?)
    }

    #[instrument(skip(self))]
    pub fn revision_yaml(&self, name: &str) -> Result<String> {
        let inv = command::describe(ResourceKind::Revision, name, OutputFormat::Yaml, &self.namespace());
        self.execute(&inv)
    }

    #[instrument(skip(self))]
    pub fn delete_services(&self, names: &[String]) -> Result<()> {
        self.delete(|ns| command::delete(ResourceKind::Service, names, ns), names)
    }

    #[instrument(skip(self))]
    pub fn delete_revisions(&self, names: &[String]) -> Result<()> {
        self.delete(|ns| command::delete(ResourceKind::Revision, names, ns), names)
    }

    #[instrument(skip(self))]
    pub fn delete_functions(&self, names: &[String]) -> Result<()> {
        self.delete(|ns| command::delete_functions(names, ns), names)
    }

    /// All names go into one invocation; an empty list spawns nothing.
    fn delete(&self, build: impl FnOnce(&str) -> Invocation, names: &[String]) -> Result<()> {
        if names.is_empty() {
            debug!("nothing to delete");
            return Ok(());
        }
        self.execute(&build(&self.namespace())).map(drop)
    }

    /// Tags `revision` of `service` so it gets its own route.
    #[instrument(skip(self))]
    pub fn tag_revision(&self, service: &str, revision: &str, tag: &str) -> Result<()> {
        self.execute(&command::tag_revision(service, revision, tag, &self.namespace()))
            .map(drop)
    }

    #[instrument(skip(self))]
    pub fn untag_revision(&self, service: &str, tag: &str) -> Result<()> {
        self.execute(&command::untag_revision(service, tag, &self.namespace()))
            .map(drop)
    }

    #[instrument(skip(self))]
    pub fn functions(&self) -> Result<Vec<Function>> {
        let output = self.execute(&command::list_functions(&self.namespace()))?;
        parser::parse_functions(&output)
    }

    #[instrument(skip(self))]
    pub fn sources(&self) -> Result<Vec<Source>> {
        let output = self.listing(&command::list_sources(&self.namespace()), NO_SOURCES)?;
        parser::parse_sources(&output)
    }

    #[instrument(skip(self))]
    pub fn create_func(&self, model: &CreateFuncModel) -> Result<()> {
        self.execute(&command::create_func(model, &self.namespace()))
            .map(drop)
    }

    #[instrument(skip(self, console, listener))]
    pub fn build_func(
        &self,
        path: &str,
        model: &ImageRegistryModel,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
    ) -> Result<Box<dyn ProcessHandle>> {
        self.stream(&command::build_func(path, model), console, listener)
    }

    #[instrument(skip(self, console, listener))]
    pub fn deploy_func(
        &self,
        namespace: &str,
        path: &str,
        model: &ImageRegistryModel,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
    ) -> Result<Box<dyn ProcessHandle>> {
        self.stream(&command::deploy_func(namespace, path, model), console, listener)
    }

    /// Deploys with the image built on the cluster from `repo`.
    #[instrument(skip(self, console, listener))]
    pub fn on_cluster_build_func(
        &self,
        namespace: &str,
        path: &str,
        repo: &GitRepoModel,
        model: &ImageRegistryModel,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
    ) -> Result<Box<dyn ProcessHandle>> {
        let inv = command::on_cluster_deploy_func(namespace, path, repo, model);
        self.stream(&inv, console, listener)
    }

    #[instrument(skip(self, console, listener))]
    pub fn run_func(
        &self,
        path: &str,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
    ) -> Result<Box<dyn ProcessHandle>> {
        self.stream(&command::run_func(path), console, listener)
    }

    /// Invokes a function and returns the execution ID it reports.
    #[instrument(skip(self))]
    pub fn invoke_func(&self, model: &InvokeModel) -> Result<String> {
        let output = self.execute(&command::invoke_func(model))?;
        parser::parse_invoke_id(Some(&output))
    }

    pub fn func_file(&self, path: &Path) -> Result<PathBuf> {
        parser::find_func_file(path)
    }

    pub fn func_manifest(&self, path: &Path) -> Result<FuncManifest> {
        let file = parser::find_func_file(path)?;
        let text = std::fs::read_to_string(&file)?;
        parser::parse_func_manifest(&text)
    }

    pub fn kn_version(&self) -> Result<Option<String>> {
        Ok(parser::parse_version(&self.execute(&command::version(Tool::Kn))?))
    }

    pub fn func_version(&self) -> Result<Option<String>> {
        Ok(parser::parse_version(&self.execute(&command::version(Tool::Func))?))
    }

    fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Kn => &self.kn_command,
            Tool::Func => &self.func_command,
        }
    }

    fn execute(&self, inv: &Invocation) -> Result<String> {
        debug!("running {}", inv);
        Ok(self
            .runner
            .execute(self.program(inv.tool), &self.env_vars, &inv.args)?)
    }

    fn execute_with_result(&self, inv: &Invocation) -> Result<ExecResult> {
        debug!("running {}", inv);
        Ok(self
            .runner
            .execute_with_result(self.program(inv.tool), &self.env_vars, &inv.args)?)
    }

    /// Captured output of a list command, tolerating a sentinel on either
    /// stream or a nonzero exit that carries one.
    fn listing(&self, inv: &Invocation, sentinel: &str) -> Result<String> {
        let result = self.execute_with_result(inv)?;
        if parser::is_sentinel(&result.stderr, sentinel) {
            return Ok(result.stderr);
        }
        if result.success() || parser::is_sentinel(&result.stdout, sentinel) {
            return Ok(result.stdout);
        }
        let message = if result.stderr.trim().is_empty() {
            result.stdout
        } else {
            result.stderr
        };
        Err(KnError::Io(message.trim().to_string()))
    }

    fn stream(
        &self,
        inv: &Invocation,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
    ) -> Result<Box<dyn ProcessHandle>> {
        debug!("streaming {}", inv);
        Ok(self.runner.execute_with_terminal(
            None,
            self.program(inv.tool),
            &self.env_vars,
            console,
            listener,
            &inv.args,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use crate::cluster::tests::FakeClient;
    use crate::constants::INVOKE_ID_ERROR;
    use crate::runner::StreamKind;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Call {
        command: String,
        args: Vec<String>,
        streamed: bool,
    }

    #[derive(Debug, Clone)]
    enum Reply {
        Output(String),
        Exit(ExecResult),
        Fail(String),
    }

    #[derive(Debug)]
    struct FakeRunner {
        calls: Arc<Mutex<Vec<Call>>>,
        reply: Reply,
    }

    impl FakeRunner {
        fn record(&self, command: &str, args: &[String], streamed: bool) {
            self.calls.lock().unwrap().push(Call {
                command: command.to_string(),
                args: args.to_vec(),
                streamed,
            });
        }
    }

    #[derive(Debug)]
    struct FakeHandle;

    impl ProcessHandle for FakeHandle {
        fn pid(&self) -> Option<u32> {
            None
        }

        fn terminate(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn wait(&mut self) -> io::Result<Option<i32>> {
            Ok(Some(0))
        }
    }

    impl ProcessRunner for FakeRunner {
        fn execute_with_result(
            &self,
            command: &str,
            _env: &HashMap<String, String>,
            args: &[String],
        ) -> io::Result<ExecResult> {
            self.record(command, args, false);
            match &self.reply {
                Reply::Output(stdout) => Ok(ExecResult {
                    stdout: stdout.clone(),
                    ..ExecResult::default()
                }),
                Reply::Exit(result) => Ok(result.clone()),
                Reply::Fail(message) => Err(io::Error::other(message.clone())),
            }
        }

        fn execute_with_terminal(
            &self,
            _work_dir: Option<&Path>,
            command: &str,
            _env: &HashMap<String, String>,
            _console: Arc<dyn ConsoleSink>,
            _listener: Option<Arc<dyn ProcessListener>>,
            args: &[String],
        ) -> io::Result<Box<dyn ProcessHandle>> {
            self.record(command, args, true);
            match &self.reply {
                Reply::Fail(message) => Err(io::Error::other(message.clone())),
                _ => Ok(Box::new(FakeHandle)),
            }
        }
    }

    struct NullConsole;

    impl ConsoleSink for NullConsole {
        fn print(&self, _text: &str, _stream: StreamKind) {}
    }

    fn console() -> Arc<dyn ConsoleSink> {
        Arc::new(NullConsole)
    }

    fn cli_with(reply: Reply, client: FakeClient) -> (KnCli, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let runner = FakeRunner {
            calls: Arc::clone(&calls),
            reply,
        };
        let mut config = KnConfig::default();
        config.commands.kn = "knCommand".to_string();
        config.commands.func = "funcCommand".to_string();
        (KnCli::new(Box::new(client), Box::new(runner), &config), calls)
    }

    fn cli(reply: Reply) -> (KnCli, Arc<Mutex<Vec<Call>>>) {
        cli_with(reply, FakeClient::default())
    }

    fn output(text: &str) -> Reply {
        Reply::Output(text.to_string())
    }

    fn fail() -> Reply {
        Reply::Fail("error".to_string())
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    fn only_call(calls: &Arc<Mutex<Vec<Call>>>) -> Call {
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "expected exactly one invocation");
        calls[0].clone()
    }

    fn assert_io_error<T: std::fmt::Debug>(result: Result<T>) {
        let err = result.expect_err("must fail");
        assert!(err.is_io());
        assert_eq!(err.to_string(), "error");
    }

    #[test]
    fn master_url_comes_from_client() {
        let (kn, _) = cli(output(""));
        assert_eq!(kn.master_url(), "http://url.ext");
    }

    #[test]
    fn empty_namespace_falls_back_to_default() {
        let (kn, _) = cli(output(""));
        assert_eq!(kn.namespace(), "default");

        let client = FakeClient {
            namespace: "namespace".to_string(),
            ..FakeClient::default()
        };
        let (kn, _) = cli_with(output(""), client);
        assert_eq!(kn.namespace(), "namespace");
    }

    #[test]
    fn awareness_is_probed_on_the_client() {
        let (kn, _) = cli_with(output(""), FakeClient::with_paths(&["serving.knative.dev", "type"]));
        assert!(kn.is_serving_aware().unwrap());
        assert!(!kn.is_eventing_aware().unwrap());

        let (kn, _) = cli(output(""));
        assert_io_error(kn.is_serving_aware());
        assert_io_error(kn.is_eventing_aware());
    }

    #[test]
    fn services_sentinel_is_empty() {
        let (kn, calls) = cli(output("No services found."));
        assert!(kn.services().unwrap().is_empty());
        let call = only_call(&calls);
        assert_eq!(call.command, "knCommand");
        assert_eq!(call.args, names(&["service", "list", "-o", "json", "-n", "default"]));
    }

    #[test]
    fn services_sentinel_on_failed_exit_is_empty() {
        let (kn, _) = cli(Reply::Exit(ExecResult {
            stdout: String::new(),
            stderr: "No services found.\n".to_string(),
            exit_code: 1,
        }));
        assert!(kn.services().unwrap().is_empty());
    }

    #[test]
    fn services_are_listed() {
        let (kn, _) = cli(output(include_str!("../resources/serviceslist.json")));
        let services = kn.services().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name(), "test");
    }

    #[test]
    fn services_failures_are_propagated() {
        let (kn, _) = cli(fail());
        assert_io_error(kn.services());

        let (kn, _) = cli(Reply::Exit(ExecResult {
            stdout: String::new(),
            stderr: "error\n".to_string(),
            exit_code: 1,
        }));
        assert_io_error(kn.services());
    }

    #[test]
    fn revisions_are_listed_newest_first() {
        let (kn, calls) = cli(output(include_str!("../resources/revisionslist.json")));
        let revisions = kn.revisions_for_service("test").unwrap();
        let listed: Vec<_> = revisions.iter().map(Revision::name).collect();
        assert_eq!(listed, vec!["test-00002", "test-00001"]);
        assert_eq!(
            only_call(&calls).args,
            names(&["revision", "list", "-s", "test", "-o", "json", "-n", "default"])
        );
    }

    #[test]
    fn revisions_sentinel_and_failure() {
        let (kn, _) = cli(output("No revisions found."));
        assert!(kn.revisions_for_service("test").unwrap().is_empty());

        let (kn, _) = cli(fail());
        assert_io_error(kn.revisions_for_service("test"));
    }

    #[test]
    fn functions_are_listed() {
        let (kn, calls) = cli(output(include_str!("../resources/functionslist.json")));
        let functions = kn.functions().unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name(), "myfunc");
        assert_eq!(only_call(&calls).command, "funcCommand");

        let (kn, _) = cli(output("No functions found."));
        assert!(kn.functions().unwrap().is_empty());

        let (kn, _) = cli(fail());
        assert_io_error(kn.functions());
    }

    #[test]
    fn service_is_described() {
        let (kn, _) = cli(output(include_str!("../resources/service.json")));
        assert_eq!(kn.service("test").unwrap().name(), "test");

        let (kn, _) = cli(fail());
        assert_io_error(kn.service("test"));
    }

    #[test]
    fn yaml_is_returned_verbatim() {
        let yaml = include_str!("../resources/service.yaml");
        let (kn, calls) = cli(output(yaml));
        assert_eq!(kn.service_yaml("test").unwrap(), yaml);
        assert_eq!(
            only_call(&calls).args,
            names(&["service", "describe", "test", "-o", "yaml", "-n", "default"])
        );

        let (kn, _) = cli(output(yaml));
        assert_eq!(kn.revision_yaml("test-00001").unwrap(), yaml);

        let (kn, _) = cli(fail());
        assert_io_error(kn.service_yaml("test"));
        let (kn, _) = cli(fail());
        assert_io_error(kn.revision_yaml("test"));
    }

    #[test]
    fn delete_services_is_one_invocation() {
        let (kn, calls) = cli(output(""));
        kn.delete_services(&names(&["one", "two", "three"])).unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&["service", "delete", "one", "two", "three", "-n", "default"])
        );
    }

    #[test]
    fn delete_revisions_and_functions() {
        let (kn, calls) = cli(output(""));
        kn.delete_revisions(&names(&["one"])).unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&["revision", "delete", "one", "-n", "default"])
        );

        let (kn, calls) = cli(output(""));
        kn.delete_functions(&names(&["one"])).unwrap();
        let call = only_call(&calls);
        assert_eq!(call.command, "funcCommand");
        assert_eq!(call.args, names(&["delete", "one", "-n", "default"]));
    }

    #[test]
    fn delete_functions_is_one_invocation() {
        let (kn, calls) = cli(output(""));
        kn.delete_functions(&names(&["one", "two", "three"])).unwrap();
        let call = only_call(&calls);
        assert_eq!(call.command, "funcCommand");
        assert_eq!(
            call.args,
            names(&["delete", "one", "two", "three", "-n", "default"])
        );
    }

    #[test]
    fn delete_failures_are_propagated() {
        let (kn, _) = cli(fail());
        assert_io_error(kn.delete_services(&names(&["one"])));
        let (kn, _) = cli(fail());
        assert_io_error(kn.delete_revisions(&names(&["one"])));
        let (kn, _) = cli(fail());
        assert_io_error(kn.delete_functions(&names(&["one"])));
    }

    #[test]
    fn empty_delete_spawns_nothing() {
        let (kn, calls) = cli(fail());
        kn.delete_services(&[]).unwrap();
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn sources_are_listed() {
        let (kn, _) = cli(output(include_str!("../resources/sourceslist.json")));
        let sources = kn.sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), "example-source-apiserver0");

        let (kn, _) = cli(output("No sources found."));
        assert!(kn.sources().unwrap().is_empty());
    }

    #[test]
    fn sources_failures_are_propagated() {
        let (kn, _) = cli(fail());
        assert_io_error(kn.sources());

        let (kn, _) = cli(Reply::Exit(ExecResult {
            stdout: String::new(),
            stderr: "error\n".to_string(),
            exit_code: 1,
        }));
        assert_io_error(kn.sources());
    }

    #[test]
    fn create_func_passes_runtime_and_template() {
        let (kn, calls) = cli(output(""));
        kn.create_func(&CreateFuncModel::new("path", "runtime", "template"))
            .unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&["create", "path", "-l", "runtime", "-t", "template", "-n", "default"])
        );

        let (kn, _) = cli(fail());
        assert_io_error(kn.create_func(&CreateFuncModel::new("path", "runtime", "template")));
    }

    #[test]
    fn build_func_streams_with_registry() {
        let (kn, calls) = cli(output(""));
        kn.build_func("path", &ImageRegistryModel::new("", "registry"), console(), None)
            .unwrap();
        let call = only_call(&calls);
        assert!(call.streamed);
        assert_eq!(call.args, names(&["build", "-r", "registry", "-p", "path", "-v"]));
    }

    #[test]
    fn build_func_streams_with_image() {
        let (kn, calls) = cli(output(""));
        kn.build_func("path", &ImageRegistryModel::new("image", "registry"), console(), None)
            .unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&["build", "-i", "image", "-p", "path", "-v"])
        );

        let (kn, _) = cli(fail());
        assert_io_error(kn.build_func("", &ImageRegistryModel::default(), console(), None));
    }

    #[test]
    fn deploy_func_never_builds() {
        let (kn, calls) = cli(output(""));
        kn.deploy_func("namespace", "path", &ImageRegistryModel::new("image", "registry"), console(), None)
            .unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&[
                "deploy", "-i", "image", "-n", "namespace", "-p", "path", "-v", "--build",
                "false"
            ])
        );

        let (kn, _) = cli(fail());
        assert_io_error(kn.deploy_func("", "", &ImageRegistryModel::default(), console(), None));
    }

    #[test]
    fn on_cluster_build_uses_remote_git() {
        let (kn, calls) = cli(output(""));
        kn.on_cluster_build_func(
            "namespace",
            "path",
            &GitRepoModel::new("repo"),
            &ImageRegistryModel::auto_discovery(),
            console(),
            None,
        )
        .unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&[
                "deploy", "-n", "namespace", "-p", "path", "--remote", "--git-url", "repo", "-v"
            ])
        );

        let (kn, _) = cli(fail());
        assert_io_error(kn.on_cluster_build_func(
            "",
            "",
            &GitRepoModel::default(),
            &ImageRegistryModel::default(),
            console(),
            None,
        ));
    }

    #[test]
    fn run_func_disables_build() {
        let (kn, calls) = cli(output(""));
        let mut handle = kn.run_func("path", console(), None).unwrap();
        assert_eq!(handle.wait().unwrap(), Some(0));
        assert_eq!(only_call(&calls).args, names(&["run", "-p", "path", "-b=false"]));

        let (kn, _) = cli(fail());
        assert_io_error(kn.run_func("", console(), None));
    }

    #[test]
    fn invoke_returns_execution_id() {
        let (kn, _) = cli(output("{\"ID\":\"test\"}"));
        assert_eq!(kn.invoke_func(&InvokeModel::default()).unwrap(), "test");
    }

    #[test]
    fn invoke_without_id_fails() {
        for text in ["", "{\"content\":\"test\"}"] {
            let (kn, _) = cli(output(text));
            let err = kn.invoke_func(&InvokeModel::default()).expect_err("must fail");
            assert!(err.to_string().starts_with(INVOKE_ID_ERROR));
        }

        let (kn, _) = cli(fail());
        assert_io_error(kn.invoke_func(&InvokeModel::default()));
    }

    #[test]
    fn func_file_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let (kn, _) = cli(output(""));
        let err = kn.func_file(dir.path()).expect_err("must fail");
        assert!(err.to_string().eq_ignore_ascii_case("No func.yaml file found"));

        std::fs::write(dir.path().join("func.yaml"), include_str!("../resources/func.yaml"))
            .unwrap();
        assert!(kn.func_file(dir.path()).unwrap().exists());
        assert_eq!(kn.func_manifest(dir.path()).unwrap().name, "myfunc");
    }

    #[test]
    fn tag_revision_updates_service() {
        let (kn, calls) = cli(output(""));
        kn.tag_revision("test", "test-00001", "blue").unwrap();
        assert_eq!(
            only_call(&calls).args,
            names(&["service", "update", "test", "--tag", "test-00001=blue", "-n", "default"])
        );

        let (kn, _) = cli(fail());
        assert_io_error(kn.untag_revision("test", "blue"));
    }

    #[test]
    fn versions_are_reported() {
        let (kn, calls) = cli(output("Version:      v1.9.2\nBuild Date:   2023-02-10\n"));
        assert_eq!(kn.kn_version().unwrap().as_deref(), Some("v1.9.2"));
        assert_eq!(only_call(&calls).args, names(&["version"]));
    }
}
