//! Version-gated Node.js installer
//!
//! Inspects the installed runtime with `node --version` and only pulls the
//! NodeSource bootstrap when the runtime is absent or below the configured
//! minimum major version.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::run_checked;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::NodeVersion;
use crate::infrastructure::traits::CommandRunner;

/// How the minimum-version requirement was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStatus {
    /// An acceptable runtime was already on the path; nothing was installed.
    AlreadyPresent(NodeVersion),
    /// The NodeSource install ran and produced this version.
    Installed(NodeVersion),
}

impl RuntimeStatus {
    pub fn version(&self) -> NodeVersion {
        match self {
            Self::AlreadyPresent(v) | Self::Installed(v) => *v,
        }
    }
}

/// Service ensuring a minimum Node.js runtime on the host.
pub struct RuntimeService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl RuntimeService {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Report the installed runtime version, if any.
    ///
    /// Returns None when node is not on the path, exits non-zero, or reports
    /// a version string we cannot parse. The unparseable case fails closed:
    /// the caller treats it as below-minimum and reinstalls.
    pub fn current_version(&self) -> Option<NodeVersion> {
        let output = match self.cmd.run("node", &["--version"]) {
            Ok(o) => o,
            Err(e) => {
                debug!("node not invocable: {}", e);
                return None;
            }
        };

        if !output.status.success() {
            debug!("node --version exited non-zero");
            return None;
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        match NodeVersion::parse(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("{}; treating runtime as absent", e);
                None
            }
        }
    }

    /// Ensure a runtime meeting the configured minimum major version.
    ///
    /// Skips installation entirely when an acceptable runtime is already
    /// present (no network call). Otherwise runs the vendor bootstrap
    /// (`curl | bash`) followed by the package install, then re-checks.
    pub fn ensure_minimum(&self) -> ApplicationResult<RuntimeStatus> {
        let min = self.settings.node_min_major;

        if let Some(v) = self.current_version() {
            if v.meets_minimum(min) {
                debug!("runtime {} satisfies minimum major {}", v, min);
                return Ok(RuntimeStatus::AlreadyPresent(v));
            }
            debug!("runtime {} below minimum major {}", v, min);
        }

        self.install_from_nodesource()?;

        match self.current_version() {
            Some(v) if v.meets_minimum(min) => Ok(RuntimeStatus::Installed(v)),
            Some(v) => Err(ApplicationError::OperationFailed {
                context: format!("node {} still below minimum major {} after install", v, min),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "nodesource install produced an unacceptable version",
                )),
            }),
            None => Err(ApplicationError::OperationFailed {
                context: "node not invocable after install".into(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "node binary missing",
                )),
            }),
        }
    }

    /// Run the NodeSource bootstrap script and install the nodejs package.
    fn install_from_nodesource(&self) -> ApplicationResult<()> {
        let pipeline = format!("curl -fsSL {} | bash -", self.settings.nodesource_url);
        debug!("install_from_nodesource: {}", pipeline);

        run_checked(
            self.cmd.as_ref(),
            "nodesource bootstrap",
            "bash",
            &["-c", &pipeline],
        )?;

        run_checked(
            self.cmd.as_ref(),
            "apt-get install nodejs",
            "apt-get",
            &["install", "-y", "nodejs"],
        )?;

        Ok(())
    }
}
