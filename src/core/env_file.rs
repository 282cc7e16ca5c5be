// src/core/env_file.rs

//! Reading and writing of flat `KEY=VALUE` environment files.

use crate::core::commons::wrap_value;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

lazy_static! {
    static ref ENV_LINE_RE: Regex =
        Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").unwrap();
}

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("Could not read env file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not write env file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One configuration layer, as read from a single file.
pub type EnvLayer = BTreeMap<String, String>;

/// Parses the contents of an env file. Malformed lines are skipped.
pub fn parse(contents: &str) -> EnvLayer {
    let mut layer = EnvLayer::new();
    for (line_no, raw_line) in contents.lines().enumerate() {
        if let Some((key, value)) = parse_line(raw_line) {
            layer.insert(key, value);
        } else if !is_blank_or_comment(raw_line) {
            log::warn!("Skipping malformed env line {}: '{}'", line_no + 1, raw_line.trim());
        }
    }
    layer
}

/// Loads an env file into a layer. A file that does not exist yields an empty layer.
pub fn load(path: &Path) -> Result<EnvLayer, EnvFileError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let layer = parse(&contents);
            log::debug!("Loaded {} keys from '{}'", layer.len(), path.display());
            Ok(layer)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(EnvLayer::new()),
        Err(e) => Err(EnvFileError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `pairs` to the env file at `path`.
///
/// With `truncate` the file ends up holding exactly `pairs`. Without it the pairs are
/// merged into the existing content: matching keys are updated in place, everything
/// else is kept, and new keys are appended in the order given.
pub fn write(path: &Path, pairs: &[(&str, &str)], truncate: bool) -> Result<(), EnvFileError> {
    let existing = if truncate {
        String::new()
    } else {
        match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(EnvFileError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }
    };

    let output = merge(&existing, pairs);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| EnvFileError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, output).map_err(|e| EnvFileError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!(
        "Wrote {} keys to '{}' (truncate: {})",
        pairs.len(),
        path.display(),
        truncate
    );
    Ok(())
}

/// Merges `pairs` into existing file contents and returns the new contents.
fn merge(existing: &str, pairs: &[(&str, &str)]) -> String {
    let mut pending: Vec<(&str, &str)> = Vec::new();
    for &(key, value) in pairs {
        // Last one wins if the caller repeats a key.
        pending.retain(|(k, _)| *k != key);
        pending.push((key, value));
    }

    // Keys rewritten in place; later lines for the same key would shadow the new value.
    let mut replaced: Vec<String> = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    for raw_line in existing.lines() {
        let Some((key, _)) = parse_line(raw_line) else {
            lines.push(raw_line.to_string());
            continue;
        };
        if replaced.contains(&key) {
            log::debug!("Dropping duplicate env line for '{}'", key);
            continue;
        }
        match pending.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                let (key, value) = pending.remove(pos);
                lines.push(format_line(key, value));
                replaced.push(key.to_string());
            }
            None => lines.push(raw_line.to_string()),
        }
    }
    lines.extend(pending.into_iter().map(|(key, value)| format_line(key, value)));

    let mut output = lines.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

fn format_line(key: &str, value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || c == '#' || c == '"' || c == '\'');
    if needs_quotes {
        format!("{}={}", key, wrap_value(value))
    } else {
        format!("{}={}", key, value)
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_line(raw_line: &str) -> Option<(String, String)> {
    if is_blank_or_comment(raw_line) {
        return None;
    }
    let captures = ENV_LINE_RE.captures(raw_line.trim())?;
    let key = captures.get(1)?.as_str().to_string();
    let value = unquote(captures.get(2).map_or("", |m| m.as_str()).trim());
    Some((key, value))
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            return inner.replace("\\\"", "\"");
        }
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return inner.to_string();
        }
    }
    value.to_string()
}
