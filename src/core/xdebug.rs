// src/core/xdebug.rs

use crate::{
    constants::{KEY_XDEBUG_ENABLED, KEY_XDEBUG_HOST, KEY_XDEBUG_IDE_KEY, KEY_XDEBUG_PORT},
    core::{
        config::Config,
        paths::{self, DirKind},
    },
};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum XdebugError {
    #[error("Unknown xdebug option '{0}'; use one of: on, off, status, host, key, port.")]
    UnknownToggle(String),
}

/// What an `xdebug` invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XdebugToggle {
    On,
    Off,
    Status,
    Host,
    Key,
    Port,
}

impl FromStr for XdebugToggle {
    type Err = XdebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "status" => Ok(Self::Status),
            "host" => Ok(Self::Host),
            "key" => Ok(Self::Key),
            "port" => Ok(Self::Port),
            other => Err(XdebugError::UnknownToggle(other.to_string())),
        }
    }
}

impl XdebugToggle {
    /// The run-file key a setting toggle writes to.
    pub fn setting_key(self) -> Option<&'static str> {
        match self {
            Self::Host => Some(KEY_XDEBUG_HOST),
            Self::Key => Some(KEY_XDEBUG_IDE_KEY),
            Self::Port => Some(KEY_XDEBUG_PORT),
            Self::On | Self::Off | Self::Status => None,
        }
    }

    /// The `XDE` value for `on`/`off`.
    pub fn enabled_value(self) -> Option<i64> {
        match self {
            Self::On => Some(1),
            Self::Off => Some(0),
            _ => None,
        }
    }
}

/// The current `XDE` value as an integer; anything unparsable counts as 0.
pub fn enabled_value(config: &Config) -> i64 {
    config
        .get(KEY_XDEBUG_ENABLED)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Whether `XDE` reads as on for display: any value other than empty or `0`.
pub fn is_enabled(config: &Config) -> bool {
    config
        .get(KEY_XDEBUG_ENABLED)
        .map(str::trim)
        .is_some_and(|v| !v.is_empty() && v != "0")
}

/// A snapshot of the XDebug settings for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdebugStatus {
    pub enabled: bool,
    pub host: String,
    pub port: String,
    pub ide_key: String,
    pub plugins_dir: String,
    pub wp_dir: String,
    pub default_mask: u8,
}

impl XdebugStatus {
    pub fn from_config(config: &Config) -> Self {
        let value = |key: &str| config.get(key).unwrap_or_default().to_string();
        Self {
            enabled: is_enabled(config),
            host: value(KEY_XDEBUG_HOST),
            port: value(KEY_XDEBUG_PORT),
            ide_key: value(KEY_XDEBUG_IDE_KEY),
            plugins_dir: paths::plugins_dir(config, None).display().to_string(),
            wp_dir: paths::wp_dir(config, None).display().to_string(),
            default_mask: default_mask(config),
        }
    }

    /// The IDE key the Codeception container uses.
    pub fn codeception_ide_key(&self) -> String {
        format!("{}_cc", self.ide_key)
    }
}

/// `1` when only the WordPress directory is the default, `2` when only the plugins
/// directory is, `3` when both are, `0` when neither is.
pub fn default_mask(config: &Config) -> u8 {
    u8::from(paths::is_default_dir(config, DirKind::WordPress))
        + 2 * u8::from(paths::is_default_dir(config, DirKind::Plugins))
}

/// The note shown under the path mappings, if any.
pub fn mask_note(mask: u8) -> Option<&'static str> {
    match mask {
        1 => Some(t!("xdebug.note.default_wp_custom_plugins")),
        2 => Some(t!("xdebug.note.default_plugins_custom_wp")),
        // 3 (both defaults) shows nothing, like 0.
        _ => None,
    }
}
