//! Runtime configuration
//!
//! Everything is driven by environment variables so the bot can run inside a
//! CI job next to Renovate. Values are read once at startup; the resulting
//! [`Policy`] is immutable for the duration of the run.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "$CI_PROJECT_DIR/config.js";
const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
const DEFAULT_AUTHOR_USERNAME: &str = "renovate-bot";
const DEFAULT_LABELS: &str = "renovate";
const DEFAULT_BRANCH_PATTERN: &str = "renovate/automerge";
const DEFAULT_COMMENT: &str = "Approving merge request! :ship:";
const DEFAULT_APPROVE: &str = "/approve";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment lookup used by the loader
///
/// Injected so configuration can be tested without mutating process-wide
/// environment state.
type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text lines
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings consumed by the subscriber setup
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log level (`trace`…`error`); invalid values fall back to `info`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Filter and action policy for one reconciliation run
///
/// Read-only once loaded. A merge request's qualification decision is a pure
/// function of this policy and the fetched snapshots.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Only consider MRs created by [`Policy::author_username`]
    pub filter_by_author: bool,
    /// Expected author username
    pub author_username: String,
    /// Only consider MRs carrying all of [`Policy::labels`]
    pub filter_by_labels: bool,
    /// Required labels
    pub labels: Vec<String>,
    /// Only consider MRs whose source branch matches [`Policy::branch_pattern`]
    pub filter_by_branch: bool,
    /// Allowed branch pattern, anchored to a full-string match
    pub branch_pattern: Regex,
    /// Require the branch's latest pipeline to have succeeded
    pub filter_by_succeeded_pipeline: bool,
    /// Additionally require the success to be warning-free
    pub filter_by_pipeline_without_warnings: bool,
    /// Post the comment text instead of the approve marker
    pub add_comment: bool,
    /// Comment body used when [`Policy::add_comment`] is set
    pub comment: String,
    /// Approve marker posted otherwise
    pub approve: String,
    /// Evaluate and log, but post nothing
    pub dry_run: bool,
}

impl Policy {
    /// The note body the configured action posts
    pub fn note_body(&self) -> &str {
        if self.add_comment {
            &self.comment
        } else {
            &self.approve
        }
    }
}

static DEFAULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&anchor_pattern(DEFAULT_BRANCH_PATTERN)).unwrap());

impl Default for Policy {
    /// The stock Renovate policy: every filter on, comment action selected.
    fn default() -> Self {
        Self {
            filter_by_author: true,
            author_username: DEFAULT_AUTHOR_USERNAME.to_string(),
            filter_by_labels: true,
            labels: vec![DEFAULT_LABELS.to_string()],
            filter_by_branch: true,
            branch_pattern: DEFAULT_PATTERN.clone(),
            filter_by_succeeded_pipeline: true,
            filter_by_pipeline_without_warnings: true,
            add_comment: true,
            comment: DEFAULT_COMMENT.to_string(),
            approve: DEFAULT_APPROVE.to_string(),
            dry_run: false,
        }
    }
}

/// Full runtime configuration
#[derive(Clone)]
pub struct Config {
    /// GitLab instance base URL
    pub gitlab_url: String,
    /// API token (may be empty here; rejected at client construction)
    pub gitlab_token: String,
    /// Path to the renovate config file, `$VAR` segments expanded
    pub config_path: PathBuf,
    /// Extract repositories from the config file instead of the environment
    pub extract_repositories_from_file: bool,
    /// Logging settings
    pub log: LogSettings,
    /// Filter and action policy
    pub policy: Policy,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(env: EnvLookup<'_>) -> Result<Self> {
        let branch_pattern =
            compile_branch_pattern(&env_or(env, "ALLOWED_BRANCH_REGEX", DEFAULT_BRANCH_PATTERN))?;

        let policy = Policy {
            filter_by_author: env_bool(env, "FILTER_BY_AUTHOR_USERNAME", true),
            author_username: env_or(env, "AUTHOR_USERNAME", DEFAULT_AUTHOR_USERNAME),
            filter_by_labels: env_bool(env, "FILTER_BY_LABELS", true),
            labels: env_list(env, "LABELS", DEFAULT_LABELS),
            filter_by_branch: env_bool(env, "FILTER_BY_BRANCH", true),
            branch_pattern,
            filter_by_succeeded_pipeline: env_bool(env, "FILTER_BY_SUCCEEDED_PIPELINE", true),
            filter_by_pipeline_without_warnings: env_bool(
                env,
                "FILTER_BY_PIPELINE_WITHOUT_WARNINGS",
                true,
            ),
            add_comment: env_bool(env, "ADD_COMMENT", true),
            comment: env_or(env, "COMMENT", DEFAULT_COMMENT),
            approve: env_or(env, "APPROVE", DEFAULT_APPROVE),
            dry_run: false,
        };

        let format = if env_or(env, "LOG_FORMAT", "text") == "json" {
            LogFormat::Json
        } else {
            LogFormat::Text
        };

        Ok(Self {
            gitlab_url: env_or(env, "GITLAB_URL", DEFAULT_GITLAB_URL),
            gitlab_token: env_or(env, "GITLAB_API_TOKEN", ""),
            config_path: PathBuf::from(expand_vars(
                env,
                &env_or(env, "CONFIG_PATH", DEFAULT_CONFIG_PATH),
            )),
            extract_repositories_from_file: env_bool(env, "EXTRACT_REPOSITORIES_FROM_FILE", false),
            log: LogSettings {
                level: env_or(env, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
                format,
            },
            policy,
        })
    }

    /// Dump the loaded configuration at debug level (token excluded)
    pub fn log_debug(&self) {
        debug!(
            config_path = %self.config_path.display(),
            gitlab_url = %self.gitlab_url,
            extract_repositories_from_file = self.extract_repositories_from_file,
            log_level = %self.log.level,
            filter_by_author = self.policy.filter_by_author,
            author_username = %self.policy.author_username,
            filter_by_labels = self.policy.filter_by_labels,
            labels = ?self.policy.labels,
            filter_by_branch = self.policy.filter_by_branch,
            branch_pattern = %self.policy.branch_pattern,
            filter_by_succeeded_pipeline = self.policy.filter_by_succeeded_pipeline,
            filter_by_pipeline_without_warnings = self.policy.filter_by_pipeline_without_warnings,
            add_comment = self.policy.add_comment,
            comment = %self.policy.comment,
            approve = %self.policy.approve,
            dry_run = self.policy.dry_run,
            "loaded configuration"
        );
    }
}

fn env_or(env: EnvLookup<'_>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Boolean environment grammar: `true/1/yes/on` and `false/0/no/off`
/// (case-insensitive); anything else keeps the default.
fn env_bool(env: EnvLookup<'_>, key: &str, default: bool) -> bool {
    match env(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn env_list(env: EnvLookup<'_>, key: &str, default: &str) -> Vec<String> {
    let value = env_or(env, key, default);
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

/// Anchor a pattern to a full-string match unless the operator already did
fn anchor_pattern(pattern: &str) -> String {
    let mut anchored = String::new();
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }
    anchored
}

fn compile_branch_pattern(pattern: &str) -> Result<Regex> {
    let anchored = anchor_pattern(pattern);
    Regex::new(&anchored)
        .map_err(|e| Error::Config(format!("invalid branch pattern {pattern}: {e}")))
}

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// Expand `$VAR` / `${VAR}` segments; unknown variables expand to the
/// empty string.
fn expand_vars(env: EnvLookup<'_>, input: &str) -> String {
    VAR_PATTERN.replace_all(input, |caps: &regex::Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        env(name).unwrap_or_default()
    })
    .into_owned()
}
