//! Operator instruction file
//!
//! A human-readable crib sheet written after provisioning. Always
//! overwritten, readable only by root.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::CertificateOutcome;
use crate::infrastructure::traits::FileSystem;

/// Service writing the operator instruction document.
pub struct InstructionsService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl InstructionsService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Write the instruction file (mode 0600) and return its path.
    pub fn write(&self, certificate: &CertificateOutcome) -> ApplicationResult<PathBuf> {
        let path = self.settings.instructions_path();
        debug!("write: {}", path.display());

        self.fs
            .write(&path, &self.render(certificate))
            .with_path_context("write instruction file", &path)?;
        self.fs
            .set_permissions(&path, 0o600)
            .with_path_context("restrict instruction file", &path)?;

        Ok(path)
    }

    fn render(&self, certificate: &CertificateOutcome) -> String {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".into());
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S %Z");
        let domain = &self.settings.domain;

        let certificate_note = match certificate {
            CertificateOutcome::Installed { email } => format!(
                "TLS certificate installed (notices go to {}).\n\
                 Renewal is automatic via the certbot systemd timer; verify with:\n\
                 \x20   certbot renew --dry-run",
                email
            ),
            CertificateOutcome::Skipped { reason } => format!(
                "TLS certificate NOT requested ({}).\n\
                 Request one manually once DNS points here:\n\
                 \x20   certbot --nginx -d {} -d {}",
                reason,
                domain,
                self.settings.www_alias()
            ),
            CertificateOutcome::Failed { detail } => format!(
                "TLS certificate request FAILED: {}\n\
                 Retry manually once the cause is fixed:\n\
                 \x20   certbot --nginx -d {} -d {}",
                detail,
                domain,
                self.settings.www_alias()
            ),
        };

        format!(
            "== {domain} server setup ==\n\
             Generated: {generated} on {host}\n\
             \n\
             Serving\n\
             -------\n\
             Static files:  {web_root}\n\
             Dev server:    {proxy_target} (requests not matching a file are proxied here)\n\
             Vhost config:  {vhost}\n\
             \n\
             Deploying the application\n\
             -------------------------\n\
             1. Copy or clone the application onto this host.\n\
             2. Install dependencies:    npm install\n\
             3. Start the dev server on port {port} (e.g. npm run dev, or a\n\
             \x20  process manager such as pm2 for anything long-lived).\n\
             4. Static assets placed in {web_root} are served directly by nginx.\n\
             \n\
             nginx\n\
             -----\n\
             Edit config:   {vhost}\n\
             Validate:      nginx -t\n\
             Apply:         systemctl reload nginx\n\
             \n\
             Certificates\n\
             ------------\n\
             {certificate_note}\n\
             \n\
             DNS\n\
             ---\n\
             Make sure A/AAAA records for {domain} and {www} point at this host.\n",
            domain = domain,
            generated = generated,
            host = host,
            web_root = self.settings.web_root.display(),
            proxy_target = self.settings.profile().proxy_target(),
            vhost = self.settings.sites_available_path().display(),
            port = self.settings.proxy_port,
            certificate_note = certificate_note,
            www = self.settings.www_alias(),
        )
    }
}
