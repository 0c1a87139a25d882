//! Backend module - render backend trait, request types and HTTP client

pub mod http_backend;
pub mod traits;

pub use http_backend::HttpRenderBackend;
pub use traits::{RenderBackend, RenderRequest, RenderUnitResult, UnitOutcome};
