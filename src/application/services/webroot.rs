//! Web root provisioning
//!
//! Creates the document root with correct ownership and drops a placeholder
//! page on first run only. Re-runs never clobber existing content.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::run_checked;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Service creating and owning the document root.
pub struct WebrootService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl WebrootService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Create the web root, assign ownership/permissions, and write the
    /// placeholder page when no index.html exists yet.
    ///
    /// Returns true when the placeholder was written on this run.
    pub fn ensure(&self) -> ApplicationResult<bool> {
        let root = &self.settings.web_root;
        debug!("ensure: web_root={}", root.display());

        self.fs
            .create_dir_all(root)
            .with_path_context("create web root", root)?;

        let owner_spec = format!("{0}:{0}", self.settings.web_owner);
        run_checked(
            self.cmd.as_ref(),
            &format!("chown {} {}", owner_spec, root.display()),
            "chown",
            &["-R", &owner_spec, &root.to_string_lossy()],
        )?;

        self.fs
            .set_permissions(root, 0o755)
            .with_path_context("set web root permissions", root)?;

        let index = root.join("index.html");
        if self.fs.exists(&index) {
            debug!("placeholder already present, leaving untouched");
            return Ok(false);
        }

        self.fs
            .write(&index, &self.placeholder_page())
            .with_path_context("write placeholder page", &index)?;

        Ok(true)
    }

    /// Static page served until the application is deployed.
    fn placeholder_page(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{domain}</title>
</head>
<body>
    <h1>{domain}</h1>
    <p>Server is up. Deploy the application to replace this page.</p>
</body>
</html>
"#,
            domain = self.settings.domain
        )
    }
}
