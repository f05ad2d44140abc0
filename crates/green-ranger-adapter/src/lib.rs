/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Green Ranger adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod carbon;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthManager,
    ConnectionState,
    MockWalletProvider,
    Session,
    WalletConnection,
    WalletProvider,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Credentials,
    Deployment,
    EnergyService,
    RangerClient,
    RangerError,
    RequestSigner,
    Result,
    sign_path,
};

pub use carbon::{CarbonEstimate, TokenPolicy};

// Re-export all types
pub use types::*;
