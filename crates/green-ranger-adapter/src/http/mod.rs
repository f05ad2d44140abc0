/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod energy;
pub mod error;
pub mod signature;

pub use error::{RangerError, Result};
pub use signature::{RequestSigner, sign_path};

pub use client::{
    ClientConfig, Credentials, Deployment, PROXY_PREFIX, RangerClient, UPSTREAM_BASE_URL,
};
pub use energy::EnergyService;
