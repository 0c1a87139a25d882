//! Dispatch module - fans a sweep out over the render backend

pub mod dispatcher;

pub use dispatcher::Dispatcher;
