//! Runtime settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults — the one host this tool provisions
//! 2. Environment variables: `CERTBOT_*` prefix (only `CERTBOT_EMAIL` is meaningful)
//!
//! There is deliberately no config-file layer: the tool hardcodes a single
//! domain's values and is not a general configuration management system.

use std::path::PathBuf;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::HostProfile;

/// Unified configuration for webstrap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Primary hostname served by the generated vhost
    pub domain: String,
    /// Document root for static files
    pub web_root: PathBuf,
    /// Unix owner (user and group) of the web root
    pub web_owner: String,
    /// Loopback port the Node dev server listens on
    pub proxy_port: u16,
    /// Minimum acceptable Node.js major version
    pub node_min_major: u32,
    /// NodeSource bootstrap script URL
    pub nodesource_url: String,
    /// nginx vhost source directory
    pub sites_available_dir: PathBuf,
    /// nginx vhost activation directory
    pub sites_enabled_dir: PathBuf,
    /// Directory the operator instruction file is written to
    pub notes_dir: PathBuf,
    /// Notification email for certificate issuance (CERTBOT_EMAIL)
    pub email: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: "example.com".into(),
            web_root: PathBuf::from("/var/www/example.com/html"),
            web_owner: "www-data".into(),
            proxy_port: 3000,
            node_min_major: 18,
            nodesource_url: "https://deb.nodesource.com/setup_18.x".into(),
            sites_available_dir: PathBuf::from("/etc/nginx/sites-available"),
            sites_enabled_dir: PathBuf::from("/etc/nginx/sites-enabled"),
            notes_dir: PathBuf::from("/root"),
            email: None,
        }
    }
}

impl Settings {
    /// Load settings: compiled defaults overlaid by the `CERTBOT_*`
    /// environment layer.
    pub fn load() -> Result<Self, ApplicationError> {
        let builder = Config::builder()
            .add_source(Config::try_from(&Settings::default()).map_err(config_err)?)
            .add_source(Environment::with_prefix("CERTBOT"));

        builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)
    }

    /// The "www." alias served alongside the primary domain.
    pub fn www_alias(&self) -> String {
        format!("www.{}", self.domain)
    }

    /// Host profile derived from the settings.
    pub fn profile(&self) -> HostProfile {
        HostProfile {
            domain: self.domain.clone(),
            www_alias: self.www_alias(),
            web_root: self.web_root.clone(),
            proxy_port: self.proxy_port,
        }
    }

    /// Path of the generated vhost file.
    pub fn sites_available_path(&self) -> PathBuf {
        self.sites_available_dir.join(&self.domain)
    }

    /// Path of the vhost activation symlink.
    pub fn sites_enabled_path(&self) -> PathBuf {
        self.sites_enabled_dir.join(&self.domain)
    }

    /// Activation symlink of the stock distribution site.
    pub fn default_site_link(&self) -> PathBuf {
        self.sites_enabled_dir.join("default")
    }

    /// Path of the operator instruction file.
    pub fn instructions_path(&self) -> PathBuf {
        self.notes_dir.join(format!("{}-setup-notes.txt", self.domain))
    }
}

fn config_err(e: config::ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
