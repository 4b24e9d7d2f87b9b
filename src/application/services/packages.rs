//! System package and service management
//!
//! Thin wrappers over apt-get and systemctl. All operations are fatal on
//! failure.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::run_checked;
use crate::application::ApplicationResult;
use crate::infrastructure::traits::CommandRunner;

/// Service for the system package manager and init system.
pub struct PackageService {
    cmd: Arc<dyn CommandRunner>,
}

impl PackageService {
    pub fn new(cmd: Arc<dyn CommandRunner>) -> Self {
        Self { cmd }
    }

    /// Refresh the package index (`apt-get update`).
    pub fn refresh_index(&self) -> ApplicationResult<()> {
        debug!("refresh_index");
        run_checked(self.cmd.as_ref(), "apt-get update", "apt-get", &["update"])?;
        Ok(())
    }

    /// Install packages non-interactively (`apt-get install -y`).
    pub fn install(&self, packages: &[&str]) -> ApplicationResult<()> {
        debug!("install: {:?}", packages);
        let mut args = vec!["install", "-y"];
        args.extend_from_slice(packages);
        run_checked(
            self.cmd.as_ref(),
            &format!("apt-get install {}", packages.join(" ")),
            "apt-get",
            &args,
        )?;
        Ok(())
    }

    /// Enable a service at boot (`systemctl enable`).
    pub fn enable_service(&self, name: &str) -> ApplicationResult<()> {
        debug!("enable_service: {}", name);
        run_checked(
            self.cmd.as_ref(),
            &format!("systemctl enable {}", name),
            "systemctl",
            &["enable", name],
        )?;
        Ok(())
    }

    /// Restart a service (`systemctl restart`).
    pub fn restart_service(&self, name: &str) -> ApplicationResult<()> {
        debug!("restart_service: {}", name);
        run_checked(
            self.cmd.as_ref(),
            &format!("systemctl restart {}", name),
            "systemctl",
            &["restart", name],
        )?;
        Ok(())
    }

    /// Reload a service without dropping connections (`systemctl reload`).
    pub fn reload_service(&self, name: &str) -> ApplicationResult<()> {
        debug!("reload_service: {}", name);
        run_checked(
            self.cmd.as_ref(),
            &format!("systemctl reload {}", name),
            "systemctl",
            &["reload", name],
        )?;
        Ok(())
    }
}
