//! Tests for InstructionsService (operator notes file)

use std::sync::Arc;

use tempfile::TempDir;

use webstrap::application::services::InstructionsService;
use webstrap::config::Settings;
use webstrap::domain::CertificateOutcome;
use webstrap::infrastructure::traits::RealFileSystem;

fn service_in(temp: &TempDir) -> (InstructionsService, Settings) {
    let settings = Settings {
        notes_dir: temp.path().to_path_buf(),
        ..Settings::default()
    };
    let service = InstructionsService::new(Arc::new(RealFileSystem), Arc::new(settings.clone()));
    (service, settings)
}

#[test]
fn given_installed_certificate_when_writing_then_notes_cover_serving_and_renewal() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, settings) = service_in(&temp);

    // Act
    let path = service
        .write(&CertificateOutcome::Installed {
            email: "ops@example.com".into(),
        })
        .unwrap();

    // Assert
    assert_eq!(path, settings.instructions_path());
    let notes = std::fs::read_to_string(&path).unwrap();
    assert!(notes.contains("example.com"));
    assert!(notes.contains("http://127.0.0.1:3000"));
    assert!(notes.contains("systemctl reload nginx"));
    assert!(notes.contains("certbot renew --dry-run"));
}

#[test]
fn given_skipped_certificate_when_writing_then_notes_include_manual_command() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, _settings) = service_in(&temp);

    // Act
    let path = service
        .write(&CertificateOutcome::Skipped {
            reason: "no notification email provided".into(),
        })
        .unwrap();

    // Assert
    let notes = std::fs::read_to_string(&path).unwrap();
    assert!(notes.contains("certbot --nginx -d example.com -d www.example.com"));
    assert!(notes.contains("NOT requested"));
}

#[test]
fn given_existing_notes_when_writing_then_file_is_replaced() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, settings) = service_in(&temp);
    std::fs::write(settings.instructions_path(), "stale notes").unwrap();

    // Act
    service
        .write(&CertificateOutcome::Skipped {
            reason: "test".into(),
        })
        .unwrap();

    // Assert
    let notes = std::fs::read_to_string(settings.instructions_path()).unwrap();
    assert!(!notes.contains("stale notes"));
}

#[test]
fn given_any_outcome_when_writing_then_file_is_operator_only() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (service, _settings) = service_in(&temp);

    // Act
    let path = service
        .write(&CertificateOutcome::Failed {
            detail: "rate limited".into(),
        })
        .unwrap();

    // Assert
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
