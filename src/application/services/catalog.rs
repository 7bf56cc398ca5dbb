//! Endpoint discovery service
//!
//! Fetches the API description of a cluster and flattens it into an
//! [`EndpointCatalog`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationResult, CatalogError};
use crate::domain::{ClusterCredentials, EndpointCatalog, HttpMethod};
use crate::infrastructure::traits::{HttpRequest, HttpTransport};

/// Location of the API description relative to the base URL.
pub const API_DOCS_PATH: &str = "/management/experimental/api-docs";

/// Service discovering the commands a cluster offers.
pub struct CatalogService {
    http: Arc<dyn HttpTransport>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// Fetch and parse the API description of the cluster.
    ///
    /// # Errors
    /// - `CatalogError::Unreachable` on transport failure or non-2xx status
    /// - `CatalogError::Malformed` if the document is not a catalog
    pub fn discover(&self, credentials: &ClusterCredentials) -> ApplicationResult<EndpointCatalog> {
        let url = credentials.url_for(API_DOCS_PATH);
        info!("discover: {}", url);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url.clone(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        };
        let response = self
            .http
            .send(&request)
            .map_err(|e| CatalogError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        if !response.is_success() {
            return Err(CatalogError::Unreachable {
                url,
                reason: format!("HTTP status {}", response.status),
            }
            .into());
        }

        let catalog = EndpointCatalog::from_document(&response.body).map_err(|e| {
            CatalogError::Malformed {
                url: url.clone(),
                message: e.message,
            }
        })?;
        debug!("discover: {} commands available", catalog.len());
        Ok(catalog)
    }
}
