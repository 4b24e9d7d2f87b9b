//! Provisioning pipeline dispatch
//!
//! The whole tool is one linear sequence. Each step is fatal on failure
//! except the certificate request, which degrades to a warning.

use tracing::{debug, instrument};

use crate::application::services::{ensure_root, RuntimeStatus};
use crate::cli::args::Cli;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::CertificateOutcome;
use crate::infrastructure::di::ServiceContainer;

const STEPS: usize = 7;

/// Packages pulled in before anything else runs. curl is needed by the
/// NodeSource bootstrap, the certbot nginx plugin by the certificate step.
const PACKAGES: [&str; 4] = ["nginx", "curl", "certbot", "python3-certbot-nginx"];

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    debug!("execute_command: {:?}", cli);
    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings);
    provision(&container)
}

/// Run the full provisioning sequence against the given container.
///
/// Public so the pipeline can be exercised with mock I/O in tests.
#[instrument(skip(container))]
pub fn provision(container: &ServiceContainer) -> CliResult<()> {
    // Nothing below may run without privileges.
    ensure_root(container.cmd.as_ref())?;

    let settings = &container.settings;
    output::header(&format!("Provisioning web server for {}", settings.domain));

    output::step(1, STEPS, "Refreshing package index and installing packages");
    container.packages.refresh_index()?;
    container.packages.install(&PACKAGES)?;

    output::step(2, STEPS, "Enabling and restarting nginx");
    container.packages.enable_service("nginx")?;
    container.packages.restart_service("nginx")?;

    output::step(
        3,
        STEPS,
        &format!("Ensuring Node.js major version >= {}", settings.node_min_major),
    );
    let runtime = container.runtime.ensure_minimum()?;
    match runtime {
        RuntimeStatus::AlreadyPresent(v) => {
            output::detail(&format!("node {} already present, skipping install", v))
        }
        RuntimeStatus::Installed(v) => output::detail(&format!("installed node {}", v)),
    }

    output::step(4, STEPS, "Creating web root");
    if container.webroot.ensure()? {
        output::detail("placeholder page written");
    } else {
        output::detail("existing content kept");
    }

    output::step(5, STEPS, "Writing and activating nginx vhost");
    container.vhost.apply()?;

    output::step(6, STEPS, "Requesting TLS certificate");
    let certificate = container.certificate.obtain();
    match &certificate {
        CertificateOutcome::Installed { email } => {
            output::success(&format!("certificate installed, notices to {}", email))
        }
        CertificateOutcome::Skipped { reason } => {
            output::warning(&format!("certificate skipped: {}", reason));
            output::detail(&format!(
                "request later with: {}",
                container.certificate.remediation_command()
            ));
        }
        CertificateOutcome::Failed { detail } => {
            output::warning(&format!("certificate request failed: {}", detail));
            output::detail(&format!(
                "retry manually with: {}",
                container.certificate.remediation_command()
            ));
        }
    }

    output::step(7, STEPS, "Writing operator notes");
    let notes = container.instructions.write(&certificate)?;

    print_summary(container, &runtime, &certificate, &notes.display().to_string());
    Ok(())
}

fn print_summary(
    container: &ServiceContainer,
    runtime: &RuntimeStatus,
    certificate: &CertificateOutcome,
    notes: &str,
) {
    let settings = &container.settings;

    println!();
    output::header("Provisioning complete");
    output::detail(&format!(
        "site:      http://{} (+ {})",
        settings.domain,
        settings.www_alias()
    ));
    output::detail(&format!("web root:  {}", settings.web_root.display()));
    output::detail(&format!(
        "proxy:     {} -> local dev server",
        settings.profile().proxy_target()
    ));
    output::detail(&format!("node:      {}", runtime.version()));
    let cert_line = match certificate {
        CertificateOutcome::Installed { .. } => "installed".to_string(),
        CertificateOutcome::Skipped { reason } => format!("skipped ({})", reason),
        CertificateOutcome::Failed { .. } => "FAILED, see warning above".to_string(),
    };
    output::detail(&format!("TLS:       {}", cert_line));
    output::detail(&format!("notes:     {}", notes));
    println!();
    output::info(&format!(
        "Next: point DNS at this host and start the dev server on port {}.",
        settings.proxy_port
    ));
}
