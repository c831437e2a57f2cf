//! PuppetDB query client
//!
//! One blocking HTTP query per requested resource type against the v4 query
//! API. Transport, status, and decode failures are fatal for the whole run;
//! they map to typed [`StencilError`] variants and propagate to the process
//! boundary.

use crate::core::error::StencilError;
use crate::core::resource::Resource;

/// Connection handle to a PuppetDB instance.
///
/// Construction performs no I/O; the first query opens the connection.
pub struct Database {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Database {
    /// Build a client for the given endpoint.
    #[must_use]
    pub fn connect(host: &str, port: u16) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: format!("http://{host}:{port}"),
        }
    }

    /// Fetch all resources of the given type.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success HTTP status, or undecodable body
    /// is returned as the matching [`StencilError`] variant.
    pub fn resources(&self, resource_type: &str) -> Result<Vec<Resource>, StencilError> {
        let url = format!("{}/pdb/query/v4/resources/{}", self.base_url, resource_type);
        tracing::debug!("Querying {url}");

        let response = self.client.get(&url).send().map_err(|source| {
            StencilError::PuppetDbRequest {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StencilError::PuppetDbStatus { url, status });
        }

        let resources: Vec<Resource> =
            response.json().map_err(|source| StencilError::PuppetDbDecode {
                url: url.clone(),
                source,
            })?;
        tracing::debug!("Fetched {} resources of type {}", resources.len(), resource_type);
        Ok(resources)
    }
}
