//! Job lifecycle - identifiers, registry and poll status

pub mod registry;

pub use registry::{JobId, JobRegistry, JobStatus, RegistryStats};
