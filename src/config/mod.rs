//! Configuration module

pub mod settings;

pub use settings::{
    BackendConfig, DispatchConfig, FixedCoordinates, LoggingConfig, ServerConfig, Settings,
};
