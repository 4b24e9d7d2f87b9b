//! TLS certificate acquisition via certbot
//!
//! The only failure-tolerant step in the pipeline: a missing email or a
//! certbot failure is reported, never fatal.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::domain::CertificateOutcome;
use crate::infrastructure::traits::{CommandRunner, Prompter};

/// Service requesting and installing the TLS certificate.
pub struct CertificateService {
    cmd: Arc<dyn CommandRunner>,
    prompter: Arc<dyn Prompter>,
    settings: Arc<Settings>,
}

impl CertificateService {
    pub fn new(
        cmd: Arc<dyn CommandRunner>,
        prompter: Arc<dyn Prompter>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            cmd,
            prompter,
            settings,
        }
    }

    /// Obtain and install certificates for both hostnames.
    ///
    /// Email resolution: `CERTBOT_EMAIL` (settings layer) first, then an
    /// interactive prompt. No email means the step is skipped. Certbot runs
    /// non-interactively with `--nginx` auto-install and no forced HTTPS
    /// redirect.
    pub fn obtain(&self) -> CertificateOutcome {
        let email = match self.resolve_email() {
            Some(e) => e,
            None => {
                return CertificateOutcome::Skipped {
                    reason: "no notification email provided".into(),
                }
            }
        };
        debug!("obtain: email={}", email);

        let domain = self.settings.domain.as_str();
        let www = self.settings.www_alias();
        let args: [&str; 10] = [
            "--nginx",
            "-d",
            domain,
            "-d",
            &www,
            "--non-interactive",
            "--agree-tos",
            "-m",
            &email,
            "--no-redirect",
        ];

        let output = match self.cmd.run("certbot", &args) {
            Ok(o) => o,
            Err(e) => {
                warn!("certbot not invocable: {}", e);
                return CertificateOutcome::Failed {
                    detail: format!("certbot not invocable: {}", e),
                };
            }
        };

        if output.status.success() {
            CertificateOutcome::Installed { email }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("certbot failed: {}", stderr);
            CertificateOutcome::Failed { detail: stderr }
        }
    }

    /// The command an operator can run by hand after fixing the cause.
    pub fn remediation_command(&self) -> String {
        format!(
            "certbot --nginx -d {} -d {}",
            self.settings.domain,
            self.settings.www_alias()
        )
    }

    /// Settings email first, interactive prompt second. Blank means none.
    fn resolve_email(&self) -> Option<String> {
        if let Some(email) = &self.settings.email {
            let trimmed = email.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }

        match self
            .prompter
            .prompt_line("Email for certificate expiry notices (blank to skip):")
        {
            Ok(line) if !line.trim().is_empty() => Some(line.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                // Non-interactive session without CERTBOT_EMAIL.
                warn!("prompt unavailable: {}", e);
                None
            }
        }
    }
}
