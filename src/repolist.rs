//! Repository list extraction
//!
//! The set of repositories to reconcile comes from one of two places:
//! the `repositories` array of a renovate `config.js`, or the
//! `RENOVATE_EXTRA_FLAGS` variable Renovate itself is invoked with.
//! Which source applies is decided by
//! [`Config::extract_repositories_from_file`].

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Resolve the repository list from the configured source.
pub fn repositories(config: &Config) -> Result<Vec<String>> {
    if config.extract_repositories_from_file {
        extract_from_file(&config.config_path)
    } else {
        extract_from_env()
    }
}

/// Extract repository names from `RENOVATE_EXTRA_FLAGS`.
///
/// Every whitespace-separated token that is not a `--flag` is taken as a
/// repository name.
pub fn extract_from_env() -> Result<Vec<String>> {
    let extra_flags = std::env::var("RENOVATE_EXTRA_FLAGS").unwrap_or_default();
    parse_extra_flags(&extra_flags)
}

fn parse_extra_flags(extra_flags: &str) -> Result<Vec<String>> {
    if extra_flags.is_empty() {
        return Err(Error::NoRepositories);
    }

    let repositories: Vec<String> = extra_flags
        .split(' ')
        .filter(|token| !token.is_empty() && !token.starts_with("--"))
        .map(str::to_string)
        .collect();

    if repositories.is_empty() {
        return Err(Error::NoRepositories);
    }

    Ok(repositories)
}

/// Extract the `repositories` array from a renovate config file.
///
/// The file is JavaScript, not JSON, so this is a deliberately small
/// line-oriented scan rather than a real parse: find the line opening the
/// `repositories` array, collect quoted entries until the closing bracket,
/// skip `//` comments.
pub fn extract_from_file(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read config file {}: {e}", path.display())))?;

    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<Vec<String>> {
    let mut repositories = Vec::new();
    let mut in_section = false;

    for raw in contents.lines() {
        let line = raw.trim();

        if is_section_start(line) {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        // Closing bracket ends the section; a closing brace before it means
        // the array was never terminated.
        if line.contains(']') {
            in_section = false;
            continue;
        }
        if line.ends_with("};") {
            return Err(Error::InvalidConfigFormat);
        }
        if line.starts_with("//") {
            continue;
        }

        let entry = trim_entry(line);
        if !entry.is_empty() && entry != "[" {
            debug!(repository = entry, "found repository");
            repositories.push(entry.to_string());
        }
    }

    if repositories.is_empty() {
        return Err(Error::NoRepositories);
    }

    Ok(repositories)
}

/// Start of the array, covering both `repositories: [` and `"repositories": [`.
fn is_section_start(line: &str) -> bool {
    line.replace('"', "").starts_with("repositories:")
}

/// Strip surrounding quotes, commas and whitespace from an array entry.
fn trim_entry(line: &str) -> &str {
    line.trim_matches(|c| c == '"' || c == ',').trim()
}
