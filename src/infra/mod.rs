//! Infrastructure adapters and runtime bootstrap.

pub mod assets;
pub mod content_source;
pub mod error;
pub mod http;
pub mod relay;
pub mod telemetry;
