//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{
    CatalogService, CfCredentialProvider, CredentialProvider, RequestDispatcher, ResponseRenderer,
    StaticCredentialProvider,
};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, HttpTransport, RealCommandRunner, RealFileSystem, ReqwestTransport,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// HTTP transport abstraction
    pub http: Arc<dyn HttpTransport>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let http = ReqwestTransport::new(&settings.http).map_err(InfraError::HttpClient)?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(http),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            http,
        }
    }

    /// Configured credentials when complete, otherwise the service broker CLI.
    pub fn credential_provider(&self) -> Box<dyn CredentialProvider> {
        match self.settings.credentials.complete() {
            Some(credentials) => {
                debug!("credential_provider: using configured credentials");
                Box::new(StaticCredentialProvider::new(credentials))
            }
            None => Box::new(CfCredentialProvider::new(
                Arc::clone(&self.cmd),
                Arc::clone(&self.settings),
            )),
        }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.http))
    }

    pub fn dispatcher(&self) -> RequestDispatcher {
        RequestDispatcher::new(Arc::clone(&self.http), Arc::clone(&self.fs))
    }

    pub fn renderer(&self) -> ResponseRenderer {
        ResponseRenderer::new()
    }
}
