//! Render Sweep Gateway
//!
//! Accepts a sweep over one scene coordinate, renders every unit of the
//! sweep against an HTTP render backend, and serves the collected frames
//! through a pollable job endpoint.

pub mod api;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod response;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::{HttpRenderBackend, RenderBackend};
use dispatch::Dispatcher;
use jobs::JobRegistry;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub registry: Arc<JobRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Wire up the HTTP render backend described by `settings`
    pub fn new(settings: config::Settings) -> Result<Self> {
        let backend = Arc::new(HttpRenderBackend::new(&settings.backend)?);
        Ok(Self::with_backend(settings, backend))
    }

    /// Wire up the application around an arbitrary render backend
    pub fn with_backend(settings: config::Settings, backend: Arc<dyn RenderBackend>) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let dispatcher = Arc::new(Dispatcher::with_config(
            backend,
            registry.clone(),
            settings.dispatch.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            registry,
            dispatcher,
        }
    }
}
