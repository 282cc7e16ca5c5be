// src/core/lifecycle.rs

use crate::{
    constants::PHP_SERVICES,
    core::{config::Config, paths},
    system::executor::{Backend, ExecutionError, render_args},
};
use colored::Colorize;
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("Could not create the {path} directory; please check the parent directory is writeable.")]
    PluginsDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not clone the {repository} repository; please check your access rights to the repository.")]
    CloneFailed { repository: String, status: i32 },
}

/// Whole-stack operations on top of the compose backend.
pub struct StackLifecycle<'a> {
    backend: &'a dyn Backend,
    config: &'a Config,
}

impl<'a> StackLifecycle<'a> {
    pub fn new(backend: &'a dyn Backend, config: &'a Config) -> Self {
        Self { backend, config }
    }

    fn attached(&self, args: &[&str]) -> Result<i32, ExecutionError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.backend.run_attached(&args, &self.config.child_env())
    }

    /// Restarts `service` if it is running. A service that is not running is left alone.
    pub fn restart_service(&self, service: &str, pretty_name: Option<&str>) -> Result<i32, ExecutionError> {
        let pretty_name = pretty_name.unwrap_or(service);

        let query = vec!["ps".to_string(), "-q".to_string(), service.to_string()];
        let (_, stdout) = self.backend.run_capture(&query, &self.config.child_env())?;
        if stdout.trim().is_empty() {
            log::debug!("'{}' returned nothing, {} is not running.", render_args(&query), service);
            println!("{}", format!(t!("lifecycle.info.not_running"), name = pretty_name));
            return Ok(0);
        }

        println!("{}", format!(t!("lifecycle.info.restarting"), name = pretty_name));
        let status = self.attached(&["restart", service])?;
        println!(
            "{}",
            format!(t!("lifecycle.success.restarted"), name = pretty_name).bright_cyan()
        );
        Ok(status)
    }

    /// Restarts the PHP services in their fixed order. Returns the last failing status, or 0.
    pub fn restart_all_php_services(&self) -> Result<i32, ExecutionError> {
        let mut result = 0;
        for &(service, pretty_name) in PHP_SERVICES {
            let status = self.restart_service(service, Some(pretty_name))?;
            if status != 0 {
                result = status;
            }
        }
        Ok(result)
    }

    pub fn rebuild(&self) -> Result<i32, ExecutionError> {
        println!("{}\n", t!("lifecycle.info.building"));
        let status = self.attached(&["build"])?;
        println!("\n{}\n", t!("lifecycle.success.built").bright_cyan());
        Ok(status)
    }

    pub fn update_images(&self) -> Result<i32, ExecutionError> {
        println!("{}\n", t!("lifecycle.info.updating"));
        let status = self.attached(&["pull", "--include-deps"])?;
        println!("\n\n{}", t!("lifecycle.success.updated").bright_cyan());
        Ok(status)
    }

    pub fn teardown(&self) -> Result<i32, ExecutionError> {
        self.attached(&["down", "--volumes", "--remove-orphans"])
    }

    pub fn up(&self, service: &str) -> Result<i32, ExecutionError> {
        self.attached(&["up", "--detach", service])
    }
}

/// Clones a company plugin into the plugins directory, creating the directory if needed.
/// A plugin that is already there is left untouched.
pub fn clone_plugin(config: &Config, git: &dyn Backend, plugin: &str) -> Result<i32, LifecycleError> {
    let plugins_dir = paths::plugins_dir(config, None);
    let plugin_path = paths::plugins_dir(config, Some(plugin));

    if !plugins_dir.exists() {
        println!("{}", t!("clone.info.creating_plugins_dir"));
        fs::create_dir_all(&plugins_dir).map_err(|e| LifecycleError::PluginsDirCreation {
            path: plugins_dir.display().to_string(),
            source: e,
        })?;
    }

    if plugin_path.exists() {
        log::debug!("'{}' already exists, not cloning.", plugin_path.display());
        return Ok(0);
    }

    println!("{}", format!(t!("clone.info.cloning"), plugin = plugin));

    let repository = format!("{}/{}", config.github_company_handle(), plugin);
    let args = [
        "clone".to_string(),
        "--recursive".to_string(),
        format!("git@github.com:{}.git", repository),
        plugin_path.to_string_lossy().to_string(),
    ];
    let status = git.run_attached(&args, &config.child_env())?;

    if status != 0 {
        return Err(LifecycleError::CloneFailed { repository, status });
    }
    Ok(status)
}
