//! HTTP render backend client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{RenderBackend, UnitOutcome};
use crate::config::{BackendConfig, FixedCoordinates};
use crate::error::{AppError, Result};

/// Path of the render endpoint on the backend
const RENDER_PATH: &str = "/render";

/// HTTP-based rendering backend
pub struct HttpRenderBackend {
    name: String,
    client: Client,
    base_url: String,
    fixed: FixedCoordinates,
}

impl HttpRenderBackend {
    /// Create a new HTTP backend from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();

        Ok(Self {
            name: "http".to_string(),
            client,
            base_url,
            fixed: config.fixed,
        })
    }

    /// Full URL of the render endpoint
    pub fn render_url(&self) -> String {
        format!("{}{}", self.base_url, RENDER_PATH)
    }

    fn query(&self, unit_index: i64, sample_count: i64) -> [(&'static str, i64); 7] {
        [
            ("samples", sample_count),
            ("s1x", unit_index),
            ("s1y", self.fixed.s1y),
            ("s1z", self.fixed.s1z),
            ("s2x", self.fixed.s2x),
            ("s2y", self.fixed.s2y),
            ("s2z", self.fixed.s2z),
        ]
    }
}

#[async_trait]
impl RenderBackend for HttpRenderBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_unit(&self, unit_index: i64, sample_count: i64) -> UnitOutcome {
        let url = self.render_url();
        debug!(url = %url, unit = unit_index, samples = sample_count, "Requesting render");

        let response = match self
            .client
            .get(&url)
            .query(&self.query(unit_index, sample_count))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(unit = unit_index, error = %e, timeout = e.is_timeout(), "Render request failed");
                return UnitOutcome::Skipped;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(unit = unit_index, status = %status, "Backend refused render");
            return UnitOutcome::Skipped;
        }

        match response.bytes().await {
            Ok(body) => {
                debug!(unit = unit_index, size = body.len(), "Render received");
                UnitOutcome::Success(body.to_vec())
            }
            Err(e) => {
                warn!(unit = unit_index, error = %e, "Failed to read render body");
                UnitOutcome::Skipped
            }
        }
    }
}
