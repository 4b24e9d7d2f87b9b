//! End-to-end pipeline tests with mock I/O
//!
//! Drives cli::commands::provision against a container wired with a fake
//! command runner and a temp-dir filesystem.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use webstrap::cli::commands::provision;
use webstrap::config::Settings;
use webstrap::infrastructure::di::ServiceContainer;
use webstrap::infrastructure::traits::{CommandRunner, FileSystem, Prompter, RealFileSystem};
use webstrap::util::testing::init_test_setup;

/// Fake host: configurable uid, node v18 preinstalled, configurable certbot
/// exit; every other command succeeds. All invocations are recorded.
struct FakeHost {
    calls: Mutex<Vec<String>>,
    uid: &'static str,
    certbot_exit: i32,
}

impl FakeHost {
    fn root() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            uid: "0",
            certbot_exit: 0,
        }
    }

    fn unprivileged() -> Self {
        Self {
            uid: "1000",
            ..Self::root()
        }
    }

    fn with_failing_certbot() -> Self {
        Self {
            certbot_exit: 1,
            ..Self::root()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        let key = format!("{} {}", cmd, args.join(" ")).trim().to_string();
        self.calls.lock().unwrap().push(key.clone());

        match cmd {
            "id" => Ok(output(0, self.uid, "")),
            "node" => Ok(output(0, "v18.17.1\n", "")),
            "certbot" => Ok(output(self.certbot_exit, "", "challenge failed")),
            _ => Ok(output(0, "", "")),
        }
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], _stdin: &str) -> io::Result<Output> {
        self.run(cmd, args)
    }
}

/// Prompter answering every question with a blank line.
struct SilentPrompter;

impl Prompter for SilentPrompter {
    fn prompt_line(&self, _message: &str) -> io::Result<String> {
        Ok(String::new())
    }
}

fn test_settings(temp: &TempDir, email: Option<&str>) -> Settings {
    Settings {
        web_root: temp.path().join("var/www/html"),
        sites_available_dir: temp.path().join("sites-available"),
        sites_enabled_dir: temp.path().join("sites-enabled"),
        notes_dir: temp.path().to_path_buf(),
        email: email.map(|e| e.to_string()),
        ..Settings::default()
    }
}

fn container(temp: &TempDir, host: FakeHost, email: Option<&str>) -> (ServiceContainer, Arc<FakeHost>) {
    init_test_setup();

    let settings = test_settings(temp, email);
    std::fs::create_dir_all(&settings.sites_available_dir).unwrap();
    std::fs::create_dir_all(&settings.sites_enabled_dir).unwrap();

    let host = Arc::new(host);
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        host.clone(),
        Arc::new(SilentPrompter),
    );
    (container, host)
}

#[test]
fn given_unprivileged_user_when_provisioning_then_aborts_with_no_side_effects() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (container, host) = container(&temp, FakeHost::unprivileged(), None);

    // Act
    let result = provision(&container);

    // Assert - only the uid query ran, nothing was touched
    assert!(result.is_err());
    assert_eq!(host.calls(), vec!["id -u".to_string()]);
    assert!(!container.settings.web_root.exists());
    assert!(!container.settings.sites_available_path().exists());
}

#[test]
fn given_root_when_provisioning_then_all_artifacts_exist() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (container, host) = container(&temp, FakeHost::root(), None);

    // Act
    provision(&container).unwrap();

    // Assert - filesystem artifacts
    let settings = &container.settings;
    assert!(settings.web_root.join("index.html").exists());
    assert!(settings.sites_available_path().exists());
    assert!(RealFileSystem.is_symlink(&settings.sites_enabled_path()));
    assert!(settings.instructions_path().exists());

    // Assert - command sequence
    let calls = host.calls();
    assert!(calls.iter().any(|c| c == "apt-get update"));
    assert!(calls
        .iter()
        .any(|c| c.starts_with("apt-get install -y nginx curl certbot")));
    assert!(calls.iter().any(|c| c == "systemctl enable nginx"));
    assert!(calls.iter().any(|c| c == "systemctl restart nginx"));
    let validate = calls.iter().position(|c| c == "nginx -t").unwrap();
    let reload = calls
        .iter()
        .position(|c| c == "systemctl reload nginx")
        .unwrap();
    assert!(validate < reload);
}

#[test]
fn given_no_email_when_provisioning_then_completes_without_certbot() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (container, host) = container(&temp, FakeHost::root(), None);

    // Act
    let result = provision(&container);

    // Assert - skipped certificate is not an error
    assert!(result.is_ok());
    assert!(host.calls().iter().all(|c| !c.starts_with("certbot")));
}

#[test]
fn given_email_when_provisioning_then_certbot_runs_for_both_hosts() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (container, host) = container(&temp, FakeHost::root(), Some("ops@example.com"));

    // Act
    provision(&container).unwrap();

    // Assert
    let calls = host.calls();
    let certbot = calls.iter().find(|c| c.starts_with("certbot")).unwrap();
    assert!(certbot.contains("-d example.com"));
    assert!(certbot.contains("-d www.example.com"));
}

#[test]
fn given_failing_certbot_when_provisioning_then_run_still_succeeds() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (container, host) = container(&temp, FakeHost::with_failing_certbot(), Some("ops@example.com"));

    // Act
    let result = provision(&container);

    // Assert - the only failure-tolerant step
    assert!(result.is_ok());
    assert!(host.calls().iter().any(|c| c.starts_with("certbot")));
    // The notes record the failure for the operator
    let notes = std::fs::read_to_string(container.settings.instructions_path()).unwrap();
    assert!(notes.contains("FAILED"));
}

#[test]
fn given_second_run_when_provisioning_then_page_kept_but_config_and_notes_replaced() {
    // Arrange - first run, then operator deploys a page and mangles the config
    let temp = TempDir::new().unwrap();
    let (container, _host) = container(&temp, FakeHost::root(), None);
    provision(&container).unwrap();

    let settings = &container.settings;
    std::fs::write(settings.web_root.join("index.html"), "<h1>deployed</h1>").unwrap();
    std::fs::write(settings.sites_available_path(), "mangled").unwrap();
    std::fs::write(settings.instructions_path(), "stale").unwrap();

    // Act
    provision(&container).unwrap();

    // Assert
    let page = std::fs::read_to_string(settings.web_root.join("index.html")).unwrap();
    assert_eq!(page, "<h1>deployed</h1>");

    let config = std::fs::read_to_string(settings.sites_available_path()).unwrap();
    assert!(config.contains("server_name example.com www.example.com;"));

    let notes = std::fs::read_to_string(settings.instructions_path()).unwrap();
    assert!(notes != "stale");
}
