//! # Layered Configuration
//!
//! `Config` is the single configuration object threaded through the tool. It is built from,
//! in increasing order of precedence:
//!
//! 1. the process environment captured at start-up,
//! 2. the version-controlled defaults file (`.env.tric`),
//! 3. the local overrides file (`.env.tric.local`), if present,
//! 4. the run file (`.env.tric.run`), if present,
//! 5. the in-memory session layer (values computed for this invocation only).
//!
//! Only the run file is ever written back, through [`Config::persist`].

use crate::{
    constants::{
        DEFAULT_GITHUB_COMPANY_HANDLE, DEFAULTS_ENV_FILENAME, KEY_CLI_VERBOSITY,
        KEY_GITHUB_COMPANY_HANDLE, LOCAL_ENV_FILENAME, RUN_ENV_FILENAME,
    },
    core::env_file::{self, EnvFileError, EnvLayer},
};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    base: EnvLayer,
    files: EnvLayer,
    session: EnvLayer,
    sources: Vec<PathBuf>,
}

impl Config {
    /// Loads the configuration for the tool rooted at `root`, on top of the current
    /// process environment.
    pub fn load(root: &Path) -> Result<Self, EnvFileError> {
        Self::load_with_base(root, env_layer(std::env::vars_os()))
    }

    /// Loads the configuration on top of an explicit base layer.
    pub fn load_with_base(root: &Path, base: EnvLayer) -> Result<Self, EnvFileError> {
        let mut config = Self {
            root: root.to_path_buf(),
            base,
            files: EnvLayer::new(),
            session: EnvLayer::new(),
            sources: Vec::new(),
        };
        config.reload()?;
        Ok(config)
    }

    /// Re-reads the three configuration files. The base and session layers are kept.
    pub fn reload(&mut self) -> Result<(), EnvFileError> {
        let mut files = EnvLayer::new();
        let mut sources = Vec::new();

        for path in [self.defaults_file(), self.local_file(), self.run_file()] {
            if !path.is_file() {
                log::trace!("Config layer '{}' not present, skipping.", path.display());
                continue;
            }
            files.extend(env_file::load(&path)?);
            sources.push(path);
        }

        self.files = files;
        self.sources = sources;
        Ok(())
    }

    /// Writes `pairs` into the run file and reloads, so the new values are visible
    /// as soon as this returns.
    pub fn persist(&mut self, pairs: &[(&str, &str)], truncate: bool) -> Result<(), EnvFileError> {
        env_file::write(&self.run_file(), pairs, truncate)?;
        self.reload()
    }

    /// Sets a value for this invocation only. It survives reloads but is never written.
    pub fn set_session(&mut self, key: &str, value: impl Into<String>) {
        self.session.insert(key.to_string(), value.into());
    }

    /// Returns the effective value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.session
            .get(key)
            .or_else(|| self.files.get(key))
            .or_else(|| self.base.get(key))
            .map(String::as_str)
    }

    /// Returns the effective value of `key`, treating an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn defaults_file(&self) -> PathBuf {
        self.root.join(DEFAULTS_ENV_FILENAME)
    }

    pub fn local_file(&self) -> PathBuf {
        self.root.join(LOCAL_ENV_FILENAME)
    }

    pub fn run_file(&self) -> PathBuf {
        self.root.join(RUN_ENV_FILENAME)
    }

    /// The configuration files actually read, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn github_company_handle(&self) -> String {
        self.get_non_empty(KEY_GITHUB_COMPANY_HANDLE)
            .map(|h| h.trim().to_string())
            .unwrap_or_else(|| DEFAULT_GITHUB_COMPANY_HANDLE.to_string())
    }

    /// Maps `CLI_VERBOSITY` to a log filter for `env_logger`.
    pub fn log_filter(&self) -> &'static str {
        match self
            .get_non_empty(KEY_CLI_VERBOSITY)
            .and_then(|v| v.trim().parse::<u32>().ok())
        {
            None | Some(0) => "warn",
            Some(1) => "info",
            Some(2) => "debug",
            Some(_) => "trace",
        }
    }

    /// The environment handed to child processes: every file and session value, plus the
    /// flags the stack containers look for.
    pub fn child_env(&self) -> BTreeMap<String, String> {
        let mut env = self.files.clone();
        env.extend(self.session.clone());
        env.insert("TRIBE_TRIC".to_string(), "1".to_string());
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            // These hosts remap user and group ids at the daemon level.
            env.insert("FIXUID".to_string(), "0".to_string());
        }
        env
    }
}

/// Builds a layer from environment variables. Entries that are not valid UTF-8 are
/// skipped, as nothing the tool reads can hold them.
pub fn env_layer(vars: impl IntoIterator<Item = (OsString, OsString)>) -> EnvLayer {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                log::debug!("Ignoring non UTF-8 environment variable {:?}", key);
                None
            }
        })
        .collect()
}
