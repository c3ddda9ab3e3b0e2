//! Quoting and validation for values embedded in remote command strings.
//!
//! Remote commands are passed to `docker-machine ssh` as a single string and
//! interpreted by the droplet's shell. Every user-supplied value is either
//! validated against a strict pattern or single-quote escaped before it is
//! composed into such a string; raw interpolation is never used.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:git@[A-Za-z0-9.-]+:|https://[A-Za-z0-9.-]+/)[A-Za-z0-9._/-]+$")
        .expect("static regex")
});

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]*\.[A-Za-z]{2,}$").expect("static regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex")
});

static ENV_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
#[must_use]
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for remote shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
#[must_use]
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_owned();
    }

    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_owned();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Validate a repository URL (scp-style `git@host:path` or `https://`).
///
/// # Errors
///
/// Returns an error when the URL contains characters outside the accepted
/// pattern, which also rules out every shell metacharacter.
pub fn validate_repo_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if !REPO_URL_RE.is_match(url) {
        bail!("{url:?} is not a usable repository URL (expected git@host:path or https://host/path)");
    }
    Ok(url)
}

/// Validate a domain name for the TLS proxy configuration.
///
/// # Errors
///
/// Returns an error when the value is not a plain hostname.
pub fn validate_domain(domain: &str) -> Result<&str> {
    let domain = domain.trim();
    if !DOMAIN_RE.is_match(domain) {
        bail!("{domain:?} is not a valid domain name");
    }
    Ok(domain)
}

/// Validate a contact email for certificate registration.
///
/// # Errors
///
/// Returns an error when the value does not look like an email address.
pub fn validate_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if !EMAIL_RE.is_match(email) {
        bail!("{email:?} is not a valid email address");
    }
    Ok(email)
}

/// Parse a space-separated `KEY=VALUE` list into pairs.
///
/// Keys must be valid environment variable names; values are free-form (they
/// are written to a file, never into a shell string).
///
/// # Errors
///
/// Returns an error on an empty list, a token without `=`, or an invalid key.
pub fn parse_env_pairs(raw: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for token in raw.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            bail!("{token:?} is not a KEY=VALUE pair");
        };
        if !ENV_KEY_RE.is_match(key) {
            bail!("{key:?} is not a valid environment variable name");
        }
        pairs.push((key.to_owned(), value.to_owned()));
    }
    if pairs.is_empty() {
        bail!("no KEY=VALUE pairs provided");
    }
    Ok(pairs)
}
