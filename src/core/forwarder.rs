//! # Command Forwarder
//!
//! Runs a command in one of the stack services against the current target and, when it
//! succeeds and the target has a `common` companion, offers to run it there as well.
//! The companion run always ends with the original target restored.

use crate::{
    constants::{KEY_RUN_GID, KEY_RUN_UID},
    core::target::{TargetError, TargetState},
    system::{
        executor::{self, Backend, BackendCommand, ExecutionError},
        prompt::Prompter,
    },
};
use colored::Colorize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("Could not read your answer: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub struct CommandForwarder<'a> {
    state: &'a mut TargetState,
    backend: &'a dyn Backend,
    prompter: &'a dyn Prompter,
}

impl<'a> CommandForwarder<'a> {
    pub fn new(
        state: &'a mut TargetState,
        backend: &'a dyn Backend,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            state,
            backend,
            prompter,
        }
    }

    /// Runs `run --rm <service> <args...>` for the current target.
    ///
    /// Returns the exit status of that first run. A failing first run is returned as is and
    /// nothing else happens. After a successful one the same command may be repeated against
    /// `<target>/common`; the status of that repeat is logged but does not change the result.
    pub fn forward(&mut self, service: &str, args: &[String]) -> Result<i32, ForwardError> {
        let target = self.state.require_target()?;
        println!("{}", format!(t!("forward.info.using"), target = target).bright_cyan());

        self.setup_user_ids();

        let command = service_command(service, args)?;
        let env = self.state.config().child_env();
        let status = self.backend.execute(&command, &env)?.status_code;

        if status != 0 {
            log::debug!("'{}' failed with status {}, skipping common.", command, status);
            return Ok(status);
        }

        let Some((companion, _)) = self.state.companion_of(&target) else {
            return Ok(status);
        };

        let prompt = format!(t!("forward.prompt.run_on_common"), service = service);
        if !self.prompter.confirm(&prompt, true)? {
            return Ok(status);
        }

        self.state.switch_target(&companion)?;
        println!(
            "{}",
            format!(t!("forward.info.temporarily_using"), target = companion).bright_cyan()
        );

        let env = self.state.config().child_env();
        let companion_result = self.backend.execute(&command, &env);

        // Restore before looking at how the companion run went.
        self.state.switch_target(&target)?;
        println!(
            "{}",
            format!(t!("forward.info.using_again"), target = target).bright_cyan()
        );

        match companion_result {
            Ok(output) => {
                if !output.success() {
                    log::warn!(
                        "'{}' failed on {} with status {}.",
                        command,
                        companion,
                        output.status_code
                    );
                }
                Ok(status)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Maps the container user to the host user, once per invocation.
    fn setup_user_ids(&mut self) {
        let config = self.state.config_mut();
        if config.get_non_empty(KEY_RUN_UID).is_some() && config.get_non_empty(KEY_RUN_GID).is_some() {
            return;
        }
        match executor::current_user_ids() {
            Some((uid, gid)) => {
                log::debug!("Mapping container user to {}:{}", uid, gid);
                config.set_session(KEY_RUN_UID, uid.to_string());
                config.set_session(KEY_RUN_GID, gid.to_string());
            }
            None => log::debug!("Could not determine the host user ids, leaving them unset."),
        }
    }
}

/// `run --rm <service> <args...>`
pub fn service_command(service: &str, args: &[String]) -> Result<BackendCommand, ExecutionError> {
    let mut full = vec!["run".to_string(), "--rm".to_string(), service.to_string()];
    full.extend(args.iter().cloned());
    BackendCommand::attached(full)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::target::tests::{root_with_plugins, state_for};
    use crate::system::executor::{CommandOutput, ExecMode};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fs;

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedCall {
        pub(crate) args: Vec<String>,
        pub(crate) mode: ExecMode,
        pub(crate) target: Option<String>,
    }

    /// Replays queued results and records every call with the target it ran against.
    #[derive(Default)]
    pub(crate) struct MockBackend {
        calls: RefCell<Vec<RecordedCall>>,
        results: RefCell<Vec<Result<CommandOutput, ExecutionError>>>,
    }

    impl MockBackend {
        pub(crate) fn push_status(&self, status_code: i32) {
            self.push_output(status_code, "");
        }

        pub(crate) fn push_output(&self, status_code: i32, stdout: &str) {
            self.results.borrow_mut().push(Ok(CommandOutput {
                status_code,
                stdout: stdout.to_string(),
            }));
        }

        pub(crate) fn push_launch_failure(&self) {
            self.results.borrow_mut().push(Err(ExecutionError::CommandFailed(
                "docker-compose".to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            )));
        }

        pub(crate) fn calls(&self) -> Vec<RecordedCall> {
            self.calls.borrow().clone()
        }
    }

    impl Backend for MockBackend {
        fn execute(
            &self,
            command: &BackendCommand,
            env: &BTreeMap<String, String>,
        ) -> Result<CommandOutput, ExecutionError> {
            self.calls.borrow_mut().push(RecordedCall {
                args: command.args().to_vec(),
                mode: command.mode(),
                target: env.get("TRIC_CURRENT_PROJECT").cloned(),
            });
            let mut queued = self.results.borrow_mut();
            if queued.is_empty() {
                return Ok(CommandOutput {
                    status_code: 0,
                    stdout: String::new(),
                });
            }
            queued.remove(0)
        }
    }

    /// Answers every question with a fixed value and counts the questions.
    pub(crate) struct MockPrompter {
        answer: bool,
        pub(crate) asked: RefCell<Vec<String>>,
    }

    impl MockPrompter {
        pub(crate) fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for MockPrompter {
        fn confirm(&self, prompt: &str, _default: bool) -> Result<bool, dialoguer::Error> {
            self.asked.borrow_mut().push(prompt.to_string());
            Ok(self.answer)
        }
    }

    fn install() -> Vec<String> {
        vec!["install".to_string()]
    }

    fn state_using(target: &str, with_common: bool) -> (tempfile::TempDir, TargetState) {
        let root = root_with_plugins(&[target]);
        if with_common {
            fs::create_dir_all(root.path().join("dev/_plugins").join(target).join("common")).unwrap();
        }
        let mut state = state_for(root.path());
        state.switch_target(target).unwrap();
        (root, state)
    }

    #[test]
    fn test_forward_requires_a_target() {
        let root = root_with_plugins(&["pluginA"]);
        let mut state = state_for(root.path());
        let backend = MockBackend::default();
        let prompter = MockPrompter::answering(true);

        let result = CommandForwarder::new(&mut state, &backend, &prompter).forward("npm", &install());

        assert!(matches!(result, Err(ForwardError::Target(TargetError::NotSet))));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_primary_failure_short_circuits() {
        let (_root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        backend.push_status(1);
        let prompter = MockPrompter::answering(true);

        let status = CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("npm", &install())
            .unwrap();

        assert_eq!(status, 1);
        assert_eq!(backend.calls().len(), 1);
        assert!(prompter.asked.borrow().is_empty());
        assert_eq!(state.require_target().unwrap(), "pluginA");
    }

    #[test]
    fn test_success_without_common_runs_once() {
        let (_root, mut state) = state_using("pluginA", false);
        let backend = MockBackend::default();
        let prompter = MockPrompter::answering(true);

        let status = CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("composer", &install())
            .unwrap();

        assert_eq!(status, 0);
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["run", "--rm", "composer", "install"]);
        assert_eq!(calls[0].mode, ExecMode::Attached);
        assert!(prompter.asked.borrow().is_empty());
    }

    #[test]
    fn test_declined_common_leaves_target_alone() {
        let (root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        let prompter = MockPrompter::answering(false);

        let status = CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("npm", &install())
            .unwrap();

        assert_eq!(status, 0);
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(prompter.asked.borrow().len(), 1);
        assert!(prompter.asked.borrow()[0].contains("npm"));
        assert_eq!(state.require_target().unwrap(), "pluginA");
        let run = fs::read_to_string(root.path().join(".env.tric.run")).unwrap();
        assert_eq!(run, "TRIC_CURRENT_PROJECT=pluginA\n");
    }

    #[test]
    fn test_confirmed_common_runs_again_and_restores() {
        let (root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        let prompter = MockPrompter::answering(true);

        let status = CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("npm", &install())
            .unwrap();

        assert_eq!(status, 0);
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].target.as_deref(), Some("pluginA"));
        assert_eq!(calls[1].target.as_deref(), Some("pluginA/common"));
        assert_eq!(calls[0].args, calls[1].args);
        assert_eq!(state.require_target().unwrap(), "pluginA");
        let run = fs::read_to_string(root.path().join(".env.tric.run")).unwrap();
        assert_eq!(run, "TRIC_CURRENT_PROJECT=pluginA\n");
    }

    #[test]
    fn test_failing_common_does_not_change_result_and_restores() {
        let (_root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        backend.push_status(0);
        backend.push_status(2);
        let prompter = MockPrompter::answering(true);

        let status = CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("npm", &install())
            .unwrap();

        assert_eq!(status, 0);
        assert_eq!(state.require_target().unwrap(), "pluginA");
    }

    #[test]
    fn test_common_launch_failure_still_restores() {
        let (_root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        backend.push_status(0);
        backend.push_launch_failure();
        let prompter = MockPrompter::answering(true);

        let result = CommandForwarder::new(&mut state, &backend, &prompter).forward("npm", &install());

        assert!(matches!(result, Err(ForwardError::Execution(_))));
        assert_eq!(state.require_target().unwrap(), "pluginA");
    }

    #[test]
    fn test_primary_launch_failure_is_fatal() {
        let (_root, mut state) = state_using("pluginA", true);
        let backend = MockBackend::default();
        backend.push_launch_failure();
        let prompter = MockPrompter::answering(true);

        let result = CommandForwarder::new(&mut state, &backend, &prompter).forward("npm", &install());

        assert!(matches!(result, Err(ForwardError::Execution(_))));
        assert_eq!(backend.calls().len(), 1);
        assert!(prompter.asked.borrow().is_empty());
    }

    #[test]
    fn test_user_ids_are_mapped_once() {
        let (_root, mut state) = state_using("pluginA", false);
        state.config_mut().set_session("DOCKER_RUN_UID", "4242");
        state.config_mut().set_session("DOCKER_RUN_GID", "4343");
        let backend = MockBackend::default();
        let prompter = MockPrompter::answering(true);

        CommandForwarder::new(&mut state, &backend, &prompter)
            .forward("npm", &install())
            .unwrap();

        assert_eq!(state.config().get("DOCKER_RUN_UID"), Some("4242"));
        assert_eq!(state.config().get("DOCKER_RUN_GID"), Some("4343"));
    }
}
