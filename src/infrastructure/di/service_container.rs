//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    CertificateService, InstructionsService, PackageService, RuntimeService, VhostService,
    WebrootService,
};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, Prompter, RealCommandRunner, RealFileSystem, StdinPrompter,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// System packages and services
    pub packages: PackageService,

    /// Version-gated Node.js install
    pub runtime: RuntimeService,

    /// Document root provisioning
    pub webroot: WebrootService,

    /// nginx vhost generation and activation
    pub vhost: VhostService,

    /// certbot certificate acquisition
    pub certificate: CertificateService,

    /// Operator instruction file
    pub instructions: InstructionsService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(StdinPrompter),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            packages: PackageService::new(cmd.clone()),
            runtime: RuntimeService::new(cmd.clone(), settings.clone()),
            webroot: WebrootService::new(fs.clone(), cmd.clone(), settings.clone()),
            vhost: VhostService::new(fs.clone(), cmd.clone(), settings.clone()),
            certificate: CertificateService::new(cmd.clone(), prompter, settings.clone()),
            instructions: InstructionsService::new(fs, settings.clone()),
            settings,
            cmd,
        }
    }
}
