//! Project configuration and server identity.
//!
//! `ProjectConfig` is constructed once from CLI arguments, validated at
//! construction, and read-only for the rest of the run. `ServerIdentity` is
//! derived from it exactly once; every later tool invocation addresses the
//! droplet through that value.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// App and environment names: letters, digits, `-` and `_`, starting with an
/// alphanumeric. Anything else would end up inside a remote command string.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("static regex"));

/// Git refs (branches and tags): also allows `.`, `/`.
static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$").expect("static regex"));

/// Errors produced while turning CLI flags into a [`ProjectConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} {value:?}: use letters, digits, '-' and '_' only")]
    InvalidName { field: &'static str, value: String },

    #[error("invalid {field} {value:?}: not a usable git ref")]
    InvalidRef { field: &'static str, value: String },
}

/// Immutable per-run configuration, validated at construction.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub app_name: String,
    pub branch: String,
    pub environment: String,
    /// Deploy tag; takes precedence over `branch` when set.
    pub tag: Option<String>,
    /// Provider API token. Prompted for interactively when absent.
    pub key: Option<String>,
    /// Skip the env-var capture step and the `--env-file` container flag.
    pub skip_vars: bool,
    /// Skip the TLS proxy step and publish the app directly on port 80.
    pub skip_ssl: bool,
}

impl ProjectConfig {
    /// Validate and assemble a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a name or ref contains characters that
    /// are not safe to embed in a remote command string.
    pub fn new(
        app_name: String,
        branch: String,
        environment: String,
        tag: Option<String>,
        key: Option<String>,
        skip_vars: bool,
        skip_ssl: bool,
    ) -> Result<Self, ConfigError> {
        if !NAME_RE.is_match(&app_name) {
            return Err(ConfigError::InvalidName { field: "app name", value: app_name });
        }
        if !NAME_RE.is_match(&environment) {
            return Err(ConfigError::InvalidName { field: "environment", value: environment });
        }
        if !REF_RE.is_match(&branch) {
            return Err(ConfigError::InvalidRef { field: "branch", value: branch });
        }
        if let Some(t) = &tag {
            if !REF_RE.is_match(t) {
                return Err(ConfigError::InvalidRef { field: "tag", value: t.clone() });
            }
        }

        Ok(Self {
            app_name,
            branch,
            environment,
            tag,
            key: key.filter(|k| !k.is_empty()),
            skip_vars,
            skip_ssl,
        })
    }

    /// Ref passed to `git clone --branch`: the tag when set, else the branch.
    #[must_use]
    pub fn clone_ref(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.branch)
    }

    /// Ref passed to `git checkout` on redeploy. Tags need the `tags/` prefix.
    #[must_use]
    pub fn checkout_ref(&self) -> String {
        match &self.tag {
            Some(tag) => format!("tags/{tag}"),
            None => self.branch.clone(),
        }
    }
}

/// Logical name of the remote droplet: `{app_name}-{environment}`.
///
/// Derived once per run; steps only ever borrow it, so it cannot drift
/// mid-pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity(String);

impl ServerIdentity {
    #[must_use]
    pub fn derive(config: &ProjectConfig) -> Self {
        Self(format!("{}-{}", config.app_name, config.environment))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
