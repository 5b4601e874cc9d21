// Core
pub mod loader;
pub mod report;
pub mod template;

// Collaborators
pub mod convert;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
