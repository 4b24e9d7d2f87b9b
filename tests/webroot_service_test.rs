//! Tests for WebrootService

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use webstrap::application::services::WebrootService;
use webstrap::config::Settings;
use webstrap::infrastructure::traits::{CommandRunner, RealFileSystem};

/// Records invocations; everything succeeds.
struct RecordingRunner {
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        let key = format!("{} {}", cmd, args.join(" ")).trim().to_string();
        self.calls.lock().unwrap().push(key);
        Ok(Output {
            status: ExitStatus::from_raw(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], _stdin: &str) -> io::Result<Output> {
        self.run(cmd, args)
    }
}

fn service_in(temp: &TempDir) -> (WebrootService, Arc<RecordingRunner>, Settings) {
    let settings = Settings {
        web_root: temp.path().join("html"),
        ..Settings::default()
    };
    let runner = Arc::new(RecordingRunner::new());
    let service = WebrootService::new(
        Arc::new(RealFileSystem),
        runner.clone(),
        Arc::new(settings.clone()),
    );
    (service, runner, settings)
}

#[test]
fn given_fresh_host_when_ensuring_then_placeholder_is_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, _runner, settings) = service_in(&temp);

    // Act
    let wrote = service.ensure().unwrap();

    // Assert
    assert!(wrote);
    let page = std::fs::read_to_string(settings.web_root.join("index.html")).unwrap();
    assert!(page.contains("example.com"));
}

#[test]
fn given_existing_page_when_ensuring_then_content_is_preserved() {
    // Arrange - operator already deployed a real page
    let temp = TempDir::new().unwrap();
    let (service, _runner, settings) = service_in(&temp);
    std::fs::create_dir_all(&settings.web_root).unwrap();
    std::fs::write(settings.web_root.join("index.html"), "<h1>deployed</h1>").unwrap();

    // Act
    let wrote = service.ensure().unwrap();

    // Assert
    assert!(!wrote);
    let page = std::fs::read_to_string(settings.web_root.join("index.html")).unwrap();
    assert_eq!(page, "<h1>deployed</h1>");
}

#[test]
fn given_fresh_host_when_ensuring_then_ownership_is_assigned() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, runner, settings) = service_in(&temp);

    // Act
    service.ensure().unwrap();

    // Assert
    let expected = format!(
        "chown -R www-data:www-data {}",
        settings.web_root.display()
    );
    assert!(
        runner.calls().contains(&expected),
        "missing {:?} in {:?}",
        expected,
        runner.calls()
    );
}

#[test]
fn given_fresh_host_when_ensuring_then_web_root_is_world_readable() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, _runner, settings) = service_in(&temp);

    // Act
    service.ensure().unwrap();

    // Assert
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(&settings.web_root).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}
