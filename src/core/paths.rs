// src/core/paths.rs

use crate::{
    constants::{
        DEFAULT_PLUGINS_SUBPATH, DEFAULT_WP_SUBPATH, DEFAULTS_ENV_FILENAME, DEV_DIR, KEY_PLUGINS_DIR,
        KEY_ROOT, KEY_WP_DIR, STACK_FILENAME,
    },
    core::config::Config,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error(
        "Could not find the tric root directory (no '.env.tric' found); set TRIC_ROOT to the directory containing it."
    )]
    RootNotFound,
    #[error("The TRIC_ROOT directory '{path}' is not usable: {source}")]
    InvalidRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The directories the tool knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    /// Where plugin projects (targets) live.
    Plugins,
    /// The WordPress installation under test.
    WordPress,
}

impl DirKind {
    /// The configuration key that overrides this directory.
    pub fn override_var(self) -> &'static str {
        match self {
            Self::Plugins => KEY_PLUGINS_DIR,
            Self::WordPress => KEY_WP_DIR,
        }
    }

    /// Where the directory lives, relative to the tool root, when not overridden.
    pub fn default_subpath(self) -> &'static str {
        match self {
            Self::Plugins => DEFAULT_PLUGINS_SUBPATH,
            Self::WordPress => DEFAULT_WP_SUBPATH,
        }
    }
}

/// Locates the tool root: `TRIC_ROOT`, else the closest ancestor of the working
/// directory holding `.env.tric`, else the closest ancestor of the executable holding it.
pub fn find_root() -> Result<PathBuf, PathError> {
    if let Ok(root) = std::env::var(KEY_ROOT)
        && !root.trim().is_empty()
    {
        return dunce::canonicalize(&root).map_err(|e| PathError::InvalidRoot {
            path: root,
            source: e,
        });
    }

    let candidates = [
        std::env::current_dir().ok(),
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf)),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|start| find_root_from(&start))
        .ok_or(PathError::RootNotFound)
}

/// Walks up from `start` looking for the directory that holds `.env.tric`.
pub fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DEFAULTS_ENV_FILENAME).is_file())
        .map(|dir| dunce::simplified(dir).to_path_buf())
}

/// The tool's internal `dev` directory.
pub fn dev_dir(root: &Path) -> PathBuf {
    root.join(DEV_DIR)
}

/// The docker-compose file of the stack.
pub fn stack_file(root: &Path) -> PathBuf {
    root.join(STACK_FILENAME)
}

/// Resolves a directory override value against the tool root.
///
/// * empty value: `<root>/<default_subpath>`
/// * an existing directory: the value, verbatim
/// * a value starting with `.`: the `.` is replaced by `<root>/dev`
/// * anything else: `<root>/dev/<value>`
///
/// A non-empty `relative` path is appended, without its leading slashes.
pub fn resolve_override(
    root: &Path,
    override_value: Option<&str>,
    default_subpath: &str,
    relative: Option<&str>,
) -> PathBuf {
    let dev = dev_dir(root);
    let dev_str = dev.to_string_lossy();

    let base = match override_value.filter(|v| !v.is_empty()) {
        None => format!("{}/{}", root.to_string_lossy(), default_subpath),
        Some(value) if Path::new(value).is_dir() => value.to_string(),
        Some(value) => match value.strip_prefix('.') {
            Some(rest) => format!("{}{}", dev_str, rest),
            None => format!("{}/{}", dev_str, value.trim_start_matches(['/', '\\'])),
        },
    };

    match relative.filter(|r| !r.is_empty()) {
        Some(rel) => PathBuf::from(format!("{}/{}", base, rel.trim_start_matches(['/', '\\']))),
        None => PathBuf::from(base),
    }
}

/// Resolves one of the known directories from the current configuration.
/// Nothing is cached: a changed override is picked up by the next call.
pub fn resolve_dir(config: &Config, kind: DirKind, relative: Option<&str>) -> PathBuf {
    resolve_override(
        config.root(),
        config.get(kind.override_var()),
        kind.default_subpath(),
        relative,
    )
}

/// The plugins directory, optionally joined with a path inside it.
pub fn plugins_dir(config: &Config, relative: Option<&str>) -> PathBuf {
    resolve_dir(config, DirKind::Plugins, relative)
}

/// The WordPress directory, optionally joined with a path inside it.
pub fn wp_dir(config: &Config, relative: Option<&str>) -> PathBuf {
    resolve_dir(config, DirKind::WordPress, relative)
}

/// Whether `dir` resolves to the default location of `kind`.
pub fn is_default_dir(config: &Config, kind: DirKind) -> bool {
    resolve_dir(config, kind, None) == config.root().join(kind.default_subpath())
}
