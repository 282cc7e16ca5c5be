// src/core/target.rs

use crate::{
    constants::{COMPANION_DIR, KEY_CURRENT_PROJECT},
    core::{
        commons::bullet_list,
        config::Config,
        env_file::EnvFileError,
        paths,
    },
};
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Only the head of a PHP file is searched for the plugin header.
const PLUGIN_HEADER_SCAN_BYTES: u64 = 8 * 1024;

#[derive(Error, Debug)]
pub enum TargetError {
    #[error("Use target not set; use the 'use' sub-command to set it.")]
    NotSet,
    #[error("This command needs a target argument; available targets are:\n{}", bullet_list(.available))]
    Missing { available: Vec<String> },
    #[error("'{target}' is not a valid target; available targets are:\n{}", bullet_list(.available))]
    Invalid {
        target: String,
        available: Vec<String>,
    },
    #[error("Could not update the current target: {0}")]
    Persist(#[from] EnvFileError),
}

/// Owns the configuration and the current target stored in it.
#[derive(Debug)]
pub struct TargetState {
    config: Config,
}

impl TargetState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The current target, if one is set.
    pub fn current_target(&self) -> Option<String> {
        self.config
            .get_non_empty(KEY_CURRENT_PROJECT)
            .map(|t| t.trim().to_string())
    }

    /// The current target; fails when it is not set. Never returns an empty string.
    pub fn require_target(&self) -> Result<String, TargetError> {
        self.current_target().ok_or(TargetError::NotSet)
    }

    /// Persists `new_target` in the run file and reloads the configuration layers.
    /// The new target is visible to every later call once this returns.
    pub fn switch_target(&mut self, new_target: &str) -> Result<(), TargetError> {
        log::debug!(
            "Switching target from {:?} to '{}'",
            self.current_target(),
            new_target
        );
        self.config
            .persist(&[(KEY_CURRENT_PROJECT, new_target)], false)?;
        Ok(())
    }

    /// The `common` companion of `target`, if it exists on disk.
    pub fn companion_of(&self, target: &str) -> Option<(String, PathBuf)> {
        let companion = format!("{}/{}", target, COMPANION_DIR);
        let path = paths::plugins_dir(&self.config, Some(&companion));
        path.exists().then_some((companion, path))
    }

    /// Names of the plugin projects found one level under the plugins directory, sorted.
    pub fn available_targets(&self) -> Vec<String> {
        let plugins_dir = paths::plugins_dir(&self.config, None);
        if !plugins_dir.is_dir() {
            log::debug!("Plugins directory '{}' does not exist.", plugins_dir.display());
            return Vec::new();
        }

        let mut targets: Vec<String> = WalkDir::new(&plugins_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| is_plugin_project(entry.path()))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        targets.sort();
        targets
    }

    /// Fails, listing the valid names, unless `target` names an available plugin.
    pub fn ensure_valid(&self, target: Option<&str>) -> Result<(), TargetError> {
        let available = self.available_targets();
        match target.map(str::trim).filter(|t| !t.is_empty()) {
            None => Err(TargetError::Missing { available }),
            Some(t) if available.iter().any(|a| a == t) => Ok(()),
            Some(t) => Err(TargetError::Invalid {
                target: t.to_string(),
                available,
            }),
        }
    }
}

/// A directory is a plugin project when one of its top-level PHP files carries
/// a `Plugin Name:` header.
pub fn is_plugin_project(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "php"))
        .any(|path| has_plugin_header(&path))
}

fn has_plugin_header(path: &Path) -> bool {
    let Ok(file) = fs::File::open(path) else {
        return false;
    };
    let mut head = Vec::new();
    if file
        .take(PLUGIN_HEADER_SCAN_BYTES)
        .read_to_end(&mut head)
        .is_err()
    {
        return false;
    }
    String::from_utf8_lossy(&head).contains("Plugin Name:")
}
