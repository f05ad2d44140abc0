/*
[INPUT]:  Public API exports for green-ranger-proxy crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod cors;
pub mod error;
pub mod forward;
pub mod report;
pub mod server;

// Re-export main types for convenience
pub use config::{CredentialMode, RangerConfig};
pub use error::{ProxyError, Result};
pub use forward::Forwarder;
pub use report::{DailyReport, build_report};
pub use server::ProxyServer;
