/*
[INPUT]:  Wallet provider capability and token instructions
[OUTPUT]: Connection state transitions published to subscribers
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding wallet capabilities or changing connection transitions
*/

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::http::{RangerError, Result};
use crate::types::TokenInstruction;

/// Wallet connection lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { account: String },
}

impl ConnectionState {
    pub fn account(&self) -> Option<&str> {
        match self {
            ConnectionState::Connected { account } => Some(account),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }
}

/// Capability a wallet vendor has to provide
///
/// The trait is async to support browser extensions, hardware wallets and
/// remote signers alike.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human readable wallet name
    fn name(&self) -> &str;

    /// Ask the wallet for access; returns the account address
    async fn connect(&self) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;

    /// Sign `instruction` as `account` and submit it; returns the transaction signature
    async fn sign_and_send_transaction(
        &self,
        account: &str,
        instruction: &TokenInstruction,
    ) -> Result<String>;

    /// Account switches initiated from the wallet side.
    ///
    /// Each new value is the selected account; `None` means access was revoked.
    /// Providers that never report switches return `None`.
    fn account_changes(&self) -> Option<watch::Receiver<Option<String>>> {
        None
    }
}

/// Connection state for one wallet provider.
///
/// Transitions: `Disconnected -> Connecting -> Connected -> Disconnected`.
/// A failed connect falls back to `Disconnected`.
/// While connected, provider account switches are applied through
/// [`WalletConnection::on_account_change`].
pub struct WalletConnection {
    provider: Arc<dyn WalletProvider>,
    state: Arc<watch::Sender<ConnectionState>>,
    account_watch: Mutex<Option<JoinHandle<()>>>,
}

impl WalletConnection {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            provider,
            state: Arc::new(state),
            account_watch: Mutex::new(None),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current state snapshot
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Connect the wallet. Already connected returns the current account.
    pub async fn connect(&self) -> Result<String> {
        let mut current = None;
        let mut busy = false;
        self.state.send_if_modified(|state| match state {
            ConnectionState::Disconnected => {
                *state = ConnectionState::Connecting;
                true
            }
            ConnectionState::Connecting => {
                busy = true;
                false
            }
            ConnectionState::Connected { account } => {
                current = Some(account.clone());
                false
            }
        });

        if busy {
            return Err(RangerError::Wallet("connection already in progress".into()));
        }
        if let Some(account) = current {
            debug!(%account, "wallet already connected");
            return Ok(account);
        }

        match self.provider.connect().await {
            Ok(account) => {
                info!(wallet = self.provider.name(), %account, "wallet connected");
                self.state.send_replace(ConnectionState::Connected {
                    account: account.clone(),
                });
                self.watch_account_changes();
                Ok(account)
            }
            Err(err) => {
                warn!(wallet = self.provider.name(), error = %err, "wallet connect failed");
                self.state.send_replace(ConnectionState::Disconnected);
                Err(err)
            }
        }
    }

    /// Disconnect the wallet. The state ends `Disconnected` even if the provider errors.
    pub async fn disconnect(&self) -> Result<()> {
        match self.state() {
            ConnectionState::Disconnected => Ok(()),
            ConnectionState::Connecting => Err(RangerError::Wallet(
                "cannot disconnect while connecting".into(),
            )),
            ConnectionState::Connected { .. } => {
                self.stop_account_watch();
                let result = self.provider.disconnect().await;
                self.state.send_replace(ConnectionState::Disconnected);
                info!(wallet = self.provider.name(), "wallet disconnected");
                result
            }
        }
    }

    /// Apply an account switch reported by the wallet.
    ///
    /// `None` means the wallet revoked access.
    pub fn on_account_change(&self, account: Option<String>) {
        apply_account_change(&self.state, account);
    }

    /// Follow the provider's account switches until disconnect
    fn watch_account_changes(&self) {
        let Some(mut changes) = self.provider.account_changes() else {
            return;
        };

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let account = changes.borrow_and_update().clone();
                let revoked = account.is_none();
                apply_account_change(&state, account);
                if revoked {
                    break;
                }
            }
            debug!("wallet account watch ended");
        });

        let previous = self
            .account_watch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn stop_account_watch(&self) {
        let handle = self
            .account_watch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Sign and submit a token instruction with the connected account
    pub async fn sign_and_send(&self, instruction: &TokenInstruction) -> Result<String> {
        let account = self
            .state()
            .account()
            .map(str::to_string)
            .ok_or_else(|| RangerError::Wallet("wallet not connected".into()))?;

        let signature = self
            .provider
            .sign_and_send_transaction(&account, instruction)
            .await?;
        info!(
            %account,
            movement = ?instruction.movement(),
            amount = instruction.amount(),
            %signature,
            "token instruction submitted"
        );
        Ok(signature)
    }
}

impl Drop for WalletConnection {
    fn drop(&mut self) {
        self.stop_account_watch();
    }
}

fn apply_account_change(state: &watch::Sender<ConnectionState>, account: Option<String>) {
    state.send_if_modified(|state| {
        let current = match state {
            ConnectionState::Connected { account } => account.clone(),
            _ => return false,
        };
        match account {
            Some(new) if new != current => {
                info!(from = %current, to = %new, "wallet account changed");
                *state = ConnectionState::Connected { account: new };
                true
            }
            Some(_) => false,
            None => {
                info!("wallet access revoked");
                *state = ConnectionState::Disconnected;
                true
            }
        }
    });
}

impl std::fmt::Debug for WalletConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConnection")
            .field("provider", &self.provider.name())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// Mock wallet provider for testing
#[derive(Debug)]
pub struct MockWalletProvider {
    account: String,
    fail_connect: bool,
    sent: Mutex<Vec<TokenInstruction>>,
    selected: watch::Sender<Option<String>>,
}

impl MockWalletProvider {
    /// Create a mock that connects as `account`
    pub fn new(account: &str) -> Self {
        let (selected, _) = watch::channel(Some(account.to_string()));
        Self {
            account: account.to_string(),
            fail_connect: false,
            sent: Mutex::new(Vec::new()),
            selected,
        }
    }

    /// Create a mock whose connect call is always rejected
    pub fn rejecting() -> Self {
        Self {
            fail_connect: true,
            ..Self::new("")
        }
    }

    /// Simulate the user picking another account (or revoking with `None`) in the wallet
    pub fn switch_account(&self, account: Option<&str>) {
        self.selected.send_replace(account.map(str::to_string));
    }

    /// Instructions submitted so far
    pub fn sent(&self) -> Vec<TokenInstruction> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self) -> Result<String> {
        if self.fail_connect {
            return Err(RangerError::Wallet("user rejected the request".into()));
        }
        Ok(self.account.clone())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn sign_and_send_transaction(
        &self,
        account: &str,
        instruction: &TokenInstruction,
    ) -> Result<String> {
        let mut sent = self
            .sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sent.push(instruction.clone());
        Ok(format!("mock-sig-{account}-{}", sent.len()))
    }

    fn account_changes(&self) -> Option<watch::Receiver<Option<String>>> {
        Some(self.selected.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn(amount: u64) -> TokenInstruction {
        TokenInstruction::Burn {
            mint: "mint111".to_string(),
            owner: "owner111".to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_connect_transitions() {
        let connection = WalletConnection::new(Arc::new(MockWalletProvider::new("acct-1")));
        let mut updates = connection.subscribe();
        assert_eq!(connection.state(), ConnectionState::Disconnected);

        let account = connection.connect().await.unwrap();
        assert_eq!(account, "acct-1");
        assert!(updates.has_changed().unwrap());
        assert_eq!(
            *updates.borrow_and_update(),
            ConnectionState::Connected {
                account: "acct-1".to_string()
            }
        );

        // second connect is a no-op
        assert_eq!(connection.connect().await.unwrap(), "acct-1");
        assert!(!updates.has_changed().unwrap());

        connection.disconnect().await.unwrap();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_failed_connect_returns_to_disconnected() {
        let connection = WalletConnection::new(Arc::new(MockWalletProvider::rejecting()));
        assert!(connection.connect().await.is_err());
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_sign_requires_connection() {
        let provider = Arc::new(MockWalletProvider::new("acct-1"));
        let connection = WalletConnection::new(provider.clone());

        let err = connection.sign_and_send(&burn(10)).await.unwrap_err();
        assert!(matches!(err, RangerError::Wallet(_)));
        assert!(provider.sent().is_empty());

        connection.connect().await.unwrap();
        let signature = connection.sign_and_send(&burn(10)).await.unwrap();
        assert_eq!(signature, "mock-sig-acct-1-1");
        assert_eq!(provider.sent(), vec![burn(10)]);
    }

    #[tokio::test]
    async fn test_account_change_and_revocation() {
        let connection = WalletConnection::new(Arc::new(MockWalletProvider::new("acct-1")));

        // ignored while disconnected
        connection.on_account_change(Some("acct-2".to_string()));
        assert_eq!(connection.state(), ConnectionState::Disconnected);

        connection.connect().await.unwrap();
        connection.on_account_change(Some("acct-2".to_string()));
        assert_eq!(connection.state().account(), Some("acct-2"));

        connection.on_account_change(None);
        assert!(!connection.state().is_connected());
    }

    async fn next_state(updates: &mut watch::Receiver<ConnectionState>) -> ConnectionState {
        tokio::time::timeout(std::time::Duration::from_secs(1), updates.changed())
            .await
            .expect("state change within a second")
            .expect("connection alive");
        updates.borrow_and_update().clone()
    }

    #[tokio::test]
    async fn test_provider_account_switch_updates_state() {
        let provider = Arc::new(MockWalletProvider::new("acct-1"));
        let connection = WalletConnection::new(provider.clone());
        connection.connect().await.unwrap();
        let mut updates = connection.subscribe();

        provider.switch_account(Some("acct-2"));
        assert_eq!(
            next_state(&mut updates).await,
            ConnectionState::Connected {
                account: "acct-2".to_string()
            }
        );

        provider.switch_account(None);
        assert_eq!(next_state(&mut updates).await, ConnectionState::Disconnected);
        assert!(connection.sign_and_send(&burn(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_provider_switch_ignored_after_disconnect() {
        let provider = Arc::new(MockWalletProvider::new("acct-1"));
        let connection = WalletConnection::new(provider.clone());
        connection.connect().await.unwrap();
        connection.disconnect().await.unwrap();

        provider.switch_account(Some("acct-2"));
        tokio::task::yield_now().await;
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_when_disconnected_is_noop() {
        let connection = WalletConnection::new(Arc::new(MockWalletProvider::new("acct-1")));
        assert!(connection.disconnect().await.is_ok());
    }
}
