/*
[INPUT]:  Login settings, session credentials and wallet providers
[OUTPUT]: Sessions, signed-request orchestration and wallet connection state
[POS]:    Auth layer - handles upstream authentication and wallet capability
[UPDATE]: When auth flow or wallet capability changes
*/

pub mod manager;
pub mod session;
pub mod wallet;

pub use manager::AuthManager;
pub use session::Session;
pub use wallet::{ConnectionState, MockWalletProvider, WalletConnection, WalletProvider};
