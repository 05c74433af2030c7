use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::config::GlobalOptions;
use crate::sink::capture::{self, Captured};
use crate::testing::{FakeEffects, FakeEnvironments, MemoryFileSystem};

const PROJECT: &str = "/work/demo";

const SAMPLE: &[u8] = br#"{
    "project-info": {
        "project-name": "MyProject",
        "project-source": "src/main.py",
        "version": "1.0.0"
    },
    "venv-configs": {
        "main-venv": { "main": true },
        "dev-venv": { "main": false }
    },
    "dependencies": {
        "requests": { "venv": "main-venv", "version": "2.26.0" },
        "flask": { "venv": "main-venv" },
        "numpy": { "venv": "dev-venv", "version": "1.21.0" }
    }
}"#;

fn path(name: &str) -> PathBuf {
    PathBuf::from(PROJECT).join(name)
}

fn project_fs() -> MemoryFileSystem {
    MemoryFileSystem::default()
        .with_file(path("uber"), SAMPLE)
        .with_file(path("src/main.py"), b"print('hi')\n")
}

struct Harness {
    global: GlobalOptions,
    environments: Arc<FakeEnvironments>,
    fs: Option<MemoryFileSystem>,
}

impl Harness {
    fn new(environments: FakeEnvironments, fs: MemoryFileSystem) -> Self {
        Self {
            global: GlobalOptions::default(),
            environments: Arc::new(environments),
            fs: Some(fs),
        }
    }

    fn invoke(
        &mut self,
        command: impl FnOnce(&mut Orchestrator<'_, '_>) -> Result<ExecutionOutcome>,
    ) -> (ExecutionOutcome, OrchestratorState, Captured) {
        let effects = Arc::new(FakeEffects {
            environments: self.environments.clone(),
            fs: self.fs.take().unwrap_or_default(),
        });
        let (streams, captured) = capture::streams();
        let ctx = CommandContext::new(&self.global, PathBuf::from(PROJECT), effects)
            .with_streams(streams);
        let mut orchestrator = Orchestrator::new(&ctx);
        let outcome = command(&mut orchestrator).unwrap();
        (outcome, orchestrator.state(), captured)
    }
}

#[test]
fn info_reports_project_and_main_environment() {
    let mut harness = Harness::new(FakeEnvironments::default(), project_fs());
    let (outcome, state, captured) = harness.invoke(|o| o.info());

    assert_eq!(outcome.status, CommandStatus::Ok);
    assert_eq!(state, OrchestratorState::Done);
    assert_eq!(
        captured.out.contents(),
        "Project Name: MyProject\nProject Source: src/main.py\nVersion: 1.0.0\nMain Venv: main-venv\n"
    );
    assert_eq!(outcome.details["main_environment"], "main-venv");
    assert_eq!(outcome.details["project"]["version"], "1.0.0");
    assert!(harness.environments.calls().is_empty(), "info never provisions");
}

#[test]
fn missing_manifest_is_a_user_error() {
    let mut harness = Harness::new(FakeEnvironments::default(), MemoryFileSystem::default());
    let (outcome, state, captured) = harness.invoke(|o| o.info());

    assert_eq!(outcome.status, CommandStatus::UserError);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(state, OrchestratorState::Failed);
    assert_eq!(outcome.details["code"], "UB100");
    assert!(captured.err.contents().starts_with("error: [UB100] no manifest found"));
}

#[test]
fn unreadable_manifest_is_reported() {
    let fs = MemoryFileSystem::default().with_unreadable(path("uber"));
    let mut harness = Harness::new(FakeEnvironments::default(), fs);
    let (outcome, _, captured) = harness.invoke(|o| o.info());

    assert_eq!(outcome.details["code"], "UB104");
    assert!(captured.err.contents().contains("permission denied"));
}

#[test]
fn registry_errors_stop_before_provisioning() {
    let manifest = br#"{
        "project-info": {"project-name": "p", "project-source": "main.py", "version": "1"},
        "venv-configs": {"a": {"main": true}, "b": {"main": true}}
    }"#;
    let fs = MemoryFileSystem::default().with_file(path("uber"), manifest);
    let mut harness = Harness::new(FakeEnvironments::default(), fs);
    let (outcome, state, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(state, OrchestratorState::Failed);
    assert_eq!(outcome.details["code"], "UB201");
    assert!(captured.err.contents().contains("a, b"));
    assert!(harness.environments.calls().is_empty());
}

#[test]
fn run_provisions_then_executes_in_main() {
    let mut harness = Harness::new(FakeEnvironments::default(), project_fs());
    let (outcome, state, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.status, CommandStatus::Ok);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(state, OrchestratorState::Done);
    assert_eq!(
        harness.environments.calls(),
        [
            "create main-venv",
            "install main-venv requests==2.26.0",
            "install main-venv flask",
            "create dev-venv",
            "install dev-venv numpy==1.21.0",
            "run main-venv src/main.py",
        ]
    );
    let out = captured.out.contents();
    assert!(out.contains("Installing requests@2.26.0 in main-venv"));
    assert!(out.contains("Installing flask@latest in main-venv"));
    assert!(out.ends_with("Running src/main.py with main-venv\n"));
}

#[test]
fn script_exit_status_is_propagated() {
    let environments = FakeEnvironments::default().with_exit_code(3);
    let mut harness = Harness::new(environments, project_fs());
    let (outcome, state, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.status, CommandStatus::Failure);
    assert_eq!(outcome.exit_code(), 3);
    assert_eq!(state, OrchestratorState::Failed);
    assert_eq!(outcome.details["code"], "UB402");
    assert!(captured
        .err
        .contents()
        .contains("src/main.py exited with status 3"));
}

#[test]
fn non_main_failure_is_a_warning_and_execution_proceeds() {
    let environments = FakeEnvironments::default().with_broken_env("dev-venv");
    let mut harness = Harness::new(environments, project_fs());
    let (outcome, state, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(state, OrchestratorState::Done);
    assert!(captured.err.contents().starts_with("warning: [UB301]"));
    assert_eq!(
        harness.environments.calls().last().map(String::as_str),
        Some("run main-venv src/main.py")
    );
    assert_eq!(outcome.details["environments"]["failed"][0]["environment"], "dev-venv");
}

#[test]
fn main_failure_skips_execution() {
    let environments = FakeEnvironments::default().with_broken_env("main-venv");
    let mut harness = Harness::new(environments, project_fs());
    let (outcome, state, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.exit_code(), 2);
    assert_eq!(state, OrchestratorState::Failed);
    assert_eq!(outcome.details["code"], "UB403");
    assert!(captured.err.contents().contains("error: [UB403]"));
    assert!(!harness
        .environments
        .calls()
        .iter()
        .any(|call| call.starts_with("run ")));
    assert!(harness
        .environments
        .calls()
        .contains(&"install dev-venv numpy==1.21.0".to_string()));
}

#[test]
fn failed_main_dependency_makes_main_unusable() {
    let environments = FakeEnvironments::default().with_broken_package("flask");
    let mut harness = Harness::new(environments, project_fs());
    let (outcome, _, _) = harness.invoke(|o| o.run());

    assert_eq!(outcome.details["code"], "UB403");
    assert_eq!(outcome.exit_code(), 2);
}

#[test]
fn missing_entry_script_is_a_failure() {
    let fs = MemoryFileSystem::default().with_file(path("uber"), SAMPLE);
    let mut harness = Harness::new(FakeEnvironments::default(), fs);
    let (outcome, _, _) = harness.invoke(|o| o.run());

    assert_eq!(outcome.details["code"], "UB404");
    assert_eq!(outcome.exit_code(), 2);
}

#[test]
fn spawn_failure_is_a_failure_without_exit_code() {
    let environments = FakeEnvironments::default().with_spawn_failure("exec format error");
    let mut harness = Harness::new(environments, project_fs());
    let (outcome, _, _) = harness.invoke(|o| o.run());

    assert_eq!(outcome.details["code"], "UB401");
    assert_eq!(outcome.script_exit_code(), None);
    assert_eq!(outcome.exit_code(), 2);
}

#[test]
fn settings_suppress_info_but_not_warnings() {
    let fs = project_fs().with_file(path("uber-config"), br#"{"ignore": {"info": true}}"#);
    let environments = FakeEnvironments::default().with_broken_env("dev-venv");
    let mut harness = Harness::new(environments, fs);
    let (outcome, _, captured) = harness.invoke(|o| o.run());

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(captured.out.contents(), "");
    assert!(captured.err.contents().contains("warning: [UB301]"));
}

#[test]
fn suppressed_errors_still_fail() {
    let fs = MemoryFileSystem::default()
        .with_file(path("uber"), b"{not json")
        .with_file(path("uber-config"), br#"{"ignore": {"errors": true}}"#);
    let mut harness = Harness::new(FakeEnvironments::default(), fs);
    let (outcome, state, captured) = harness.invoke(|o| o.info());

    assert_eq!(outcome.details["code"], "UB101");
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(state, OrchestratorState::Failed);
    assert_eq!(captured.err.contents(), "");
}

#[test]
fn malformed_settings_are_reported_unfiltered() {
    let fs = project_fs().with_file(path("uber-config"), b"{\"ignore\": 3}");
    let mut harness = Harness::new(FakeEnvironments::default(), fs);
    let (outcome, state, captured) = harness.invoke(|o| o.info());

    assert_eq!(outcome.details["code"], "UB110");
    assert_eq!(state, OrchestratorState::Failed);
    assert!(captured.err.contents().starts_with("error: [UB110]"));
}

#[test]
fn explicit_settings_path_must_exist() {
    let mut harness = Harness::new(FakeEnvironments::default(), project_fs());
    harness.global.config = Some("/elsewhere/uber-config".to_string());
    let (outcome, _, _) = harness.invoke(|o| o.info());

    assert_eq!(outcome.details["code"], "UB111");
    assert_eq!(outcome.exit_code(), 1);
}
