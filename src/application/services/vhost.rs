//! nginx virtual-host generation and activation
//!
//! Renders the fixed vhost template, writes it to sites-available, links it
//! into sites-enabled, then validates with `nginx -t` before reloading.
//! Validation failure aborts before any reload is issued.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::run_checked;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Service writing and activating the reverse-proxy vhost.
pub struct VhostService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl VhostService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Render the vhost configuration.
    ///
    /// Static files are served from the document root; anything not found on
    /// disk falls back to the local dev server. The upgrade headers keep
    /// WebSocket connections working through the proxy.
    pub fn render(&self) -> String {
        let profile = self.settings.profile();

        format!(
            r#"server {{
    listen 80;
    listen [::]:80;

    server_name {domain} {www};

    root {web_root};
    index index.html index.htm;

    location / {{
        try_files $uri $uri/ @node;
    }}

    location @node {{
        proxy_pass {proxy_target};
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection 'upgrade';
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_cache_bypass $http_upgrade;
    }}

    location ~* \.(jpg|jpeg|png|gif|ico|svg|css|js|woff|woff2)$ {{
        expires 30d;
        add_header Cache-Control "public, no-transform";
    }}
}}
"#,
            domain = profile.domain,
            www = profile.www_alias,
            web_root = profile.web_root.display(),
            proxy_target = profile.proxy_target(),
        )
    }

    /// Write, activate, validate, reload.
    ///
    /// The config file is always overwritten. `nginx -t` runs before the
    /// reload; on validation failure the error carries nginx's stderr and
    /// the running server keeps its previous configuration.
    pub fn apply(&self) -> ApplicationResult<()> {
        let available = self.settings.sites_available_path();
        debug!("apply: {}", available.display());

        self.fs
            .write(&available, &self.render())
            .with_path_context("write vhost config", &available)?;
        self.fs
            .set_permissions(&available, 0o644)
            .with_path_context("set vhost config permissions", &available)?;

        self.activate()?;

        run_checked(self.cmd.as_ref(), "nginx config validation", "nginx", &["-t"])?;

        run_checked(
            self.cmd.as_ref(),
            "systemctl reload nginx",
            "systemctl",
            &["reload", "nginx"],
        )?;

        Ok(())
    }

    /// Link the vhost into sites-enabled and drop the stock default site.
    fn activate(&self) -> ApplicationResult<()> {
        let available = self.settings.sites_available_path();
        let enabled = self.settings.sites_enabled_path();

        if self.fs.is_symlink(&enabled) || self.fs.exists(&enabled) {
            self.fs
                .remove_file(&enabled)
                .with_path_context("remove stale vhost link", &enabled)?;
        }
        self.fs
            .symlink(&available, &enabled)
            .with_path_context("activate vhost", &enabled)?;

        // The distribution catch-all would shadow our server_name matches.
        let default_link = self.settings.default_site_link();
        if self.fs.is_symlink(&default_link) {
            debug!("removing default site link {}", default_link.display());
            self.fs
                .remove_file(&default_link)
                .with_path_context("remove default site link", &default_link)?;
        }

        Ok(())
    }
}
