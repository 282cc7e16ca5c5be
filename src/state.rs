// src/state.rs

use crate::{
    constants::COMPOSE_PROGRAM,
    core::{config::Config, paths, target::TargetState},
    system::{
        executor::{Backend, ProcessBackend},
        prompt::{DialoguerPrompter, Prompter},
    },
};
use anyhow::Result;

/// Everything a command handler works with: the target state (and the configuration it
/// owns), the compose backend, the `git` backend and the prompter.
pub struct AppState {
    pub target: TargetState,
    pub backend: Box<dyn Backend>,
    pub git: Box<dyn Backend>,
    pub prompter: Box<dyn Prompter>,
}

impl AppState {
    pub fn new(
        target: TargetState,
        backend: Box<dyn Backend>,
        git: Box<dyn Backend>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            target,
            backend,
            git,
            prompter,
        }
    }

    /// Locates the tool root, loads the configuration layers and wires the real collaborators.
    pub fn bootstrap() -> Result<Self> {
        let root = paths::find_root()?;
        let config = Config::load(&root)?;
        log::debug!("Tool root: {}", root.display());

        let backend = ProcessBackend::compose(COMPOSE_PROGRAM, &paths::stack_file(&root), &root);
        let git = ProcessBackend::new("git", Vec::new(), &root);

        Ok(Self::new(
            TargetState::new(config),
            Box::new(backend),
            Box::new(git),
            Box::new(DialoguerPrompter),
        ))
    }

    pub fn config(&self) -> &Config {
        self.target.config()
    }
}
