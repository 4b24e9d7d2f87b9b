//! Application services: one per provisioning concern

pub mod certificate;
pub mod instructions;
pub mod packages;
pub mod runtime;
pub mod vhost;
pub mod webroot;

pub use certificate::CertificateService;
pub use instructions::InstructionsService;
pub use packages::PackageService;
pub use runtime::{RuntimeService, RuntimeStatus};
pub use vhost::VhostService;
pub use webroot::WebrootService;

use std::process::Output;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::CommandRunner;

/// Run an external command and fail with captured stderr on non-zero exit.
///
/// Every provisioning step outside the certificate request goes through
/// this: any failure is fatal and aborts the run.
pub(crate) fn run_checked(
    cmd: &dyn CommandRunner,
    context: &str,
    program: &str,
    args: &[&str],
) -> ApplicationResult<Output> {
    let output = cmd
        .run(program, args)
        .map_err(|e| ApplicationError::OperationFailed {
            context: format!("spawn {}: {}", program, context),
            source: Box::new(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ApplicationError::CommandFailed {
            context: context.to_string(),
            stderr,
            code: output.status.code(),
        });
    }

    Ok(output)
}

/// Abort unless the effective UID is 0.
///
/// Queried through the command-runner seam (`id -u`) so tests can fake it.
pub fn ensure_root(cmd: &dyn CommandRunner) -> ApplicationResult<()> {
    let output = run_checked(cmd, "query effective uid", "id", &["-u"])?;
    let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if uid == "0" {
        Ok(())
    } else {
        Err(ApplicationError::PrivilegesRequired)
    }
}
