//! Domain entities: core data structures

use std::fmt;
use std::path::PathBuf;

use regex::Regex;

use crate::domain::DomainError;

/// A parsed Node.js runtime version, e.g. `v18.17.1` -> 18.17.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl NodeVersion {
    /// Parse a `node --version` report.
    ///
    /// Accepts a leading `v` followed by a dot-separated numeric prefix
    /// (`v18.17.1`). Trailing text after the numeric prefix is ignored,
    /// anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let re = Regex::new(r"^v(\d+)\.(\d+)\.(\d+)").expect("version pattern is a valid regex");

        let trimmed = raw.trim();
        let caps = re
            .captures(trimmed)
            .ok_or_else(|| DomainError::InvalidVersion(trimmed.to_string()))?;

        // Capture groups are all-digit; parse only fails on absurd lengths.
        let field = |i: usize| -> Result<u32, DomainError> {
            caps[i]
                .parse()
                .map_err(|_| DomainError::InvalidVersion(trimmed.to_string()))
        };

        Ok(Self {
            major: field(1)?,
            minor: field(2)?,
            patch: field(3)?,
        })
    }

    /// True when this version satisfies the given minimum major version.
    pub fn meets_minimum(&self, min_major: u32) -> bool {
        self.major >= min_major
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The single host this tool provisions.
///
/// One profile, compiled in: the tool is intentionally not reusable across
/// domains (see Settings defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    /// Primary hostname, e.g. "example.com"
    pub domain: String,
    /// "www." alias served by the same vhost
    pub www_alias: String,
    /// Document root for static files
    pub web_root: PathBuf,
    /// Loopback port the Node dev server listens on
    pub proxy_port: u16,
}

impl HostProfile {
    /// Both hostnames, primary first.
    pub fn server_names(&self) -> [&str; 2] {
        [&self.domain, &self.www_alias]
    }

    /// Loopback address the fallback location proxies to.
    pub fn proxy_target(&self) -> String {
        format!("http://127.0.0.1:{}", self.proxy_port)
    }
}

/// Result of the best-effort certificate step.
///
/// Never fatal: the pipeline completes with exit code 0 for all variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateOutcome {
    /// Certbot succeeded and installed the certificate into the vhost.
    Installed { email: String },
    /// Step skipped before invoking certbot.
    Skipped { reason: String },
    /// Certbot ran and failed; manual remediation required.
    Failed { detail: String },
}
