// Path: crates/client/src/resolver.rs

use mint_api::{Notifier, WalletConnector, WalletProvider};
use mint_telemetry::error_metrics;
use mint_types::{
    app::{ChainId, Notice},
    error::{ErrorCode, ResolveError},
    Address,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A connection with query capability only.
#[derive(Clone)]
pub struct ReadConnection {
    provider: Arc<dyn WalletProvider>,
    chain_id: ChainId,
}

/// A connection able to submit transactions from one authorized account.
#[derive(Clone)]
pub struct SigningConnection {
    provider: Arc<dyn WalletProvider>,
    chain_id: ChainId,
    account: Address,
}

impl SigningConnection {
    pub fn account(&self) -> Address {
        self.account
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }
}

/// A network-verified connection. Created per operation and dropped with it;
/// only the wallet handle underneath outlives the call.
#[derive(Clone)]
pub enum ChainConnection {
    ReadOnly(ReadConnection),
    Signing(SigningConnection),
}

impl ChainConnection {
    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::ReadOnly(c) => c.chain_id,
            Self::Signing(c) => c.chain_id,
        }
    }

    /// The signing account, if this is a signing connection.
    pub fn account(&self) -> Option<Address> {
        match self {
            Self::ReadOnly(_) => None,
            Self::Signing(c) => Some(c.account),
        }
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        match self {
            Self::ReadOnly(c) => &c.provider,
            Self::Signing(c) => &c.provider,
        }
    }

    pub fn into_signing(self) -> Option<SigningConnection> {
        match self {
            Self::ReadOnly(_) => None,
            Self::Signing(c) => Some(c),
        }
    }
}

impl std::fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnection")
            .field("chain_id", &self.chain_id())
            .field("account", &self.account())
            .finish_non_exhaustive()
    }
}

/// Turns the session's wallet connector into verified connections.
///
/// The wallet handle is obtained once, on first need, and reused for the
/// rest of the session. A failed or declined connect leaves it unset, so
/// the next operation prompts again.
pub struct ConnectionResolver {
    connector: Arc<dyn WalletConnector>,
    handle: OnceCell<Arc<dyn WalletProvider>>,
    expected: ChainId,
    network_name: String,
    notifier: Arc<dyn Notifier>,
}

impl ConnectionResolver {
    pub fn new(
        connector: Arc<dyn WalletConnector>,
        expected: ChainId,
        network_name: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            connector,
            handle: OnceCell::new(),
            expected,
            network_name: network_name.into(),
            notifier,
        }
    }

    /// True once the wallet handle has been obtained.
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }

    pub fn expected_chain_id(&self) -> ChainId {
        self.expected
    }

    async fn wallet(&self) -> Result<Arc<dyn WalletProvider>, ResolveError> {
        let provider = self
            .handle
            .get_or_try_init(|| async {
                tracing::info!(target: "resolver", event = "wallet_connect");
                self.connector.connect().await.map_err(ResolveError::from)
            })
            .await?;
        Ok(provider.clone())
    }

    /// Obtains a connection to the expected network, with a signer bound to
    /// the authorized account when `needs_signer` is set.
    ///
    /// On a network mismatch the user is notified before the call fails, and
    /// the caller must abort the whole operation.
    pub async fn resolve(&self, needs_signer: bool) -> Result<ChainConnection, ResolveError> {
        let result = self.resolve_inner(needs_signer).await;
        if let Err(e) = &result {
            error_metrics().inc_error("resolve", e.code());
        }
        result
    }

    async fn resolve_inner(&self, needs_signer: bool) -> Result<ChainConnection, ResolveError> {
        let provider = self.wallet().await?;
        let actual = provider.chain_id().await?;
        if actual != self.expected {
            tracing::error!(
                target: "resolver",
                event = "wrong_network",
                expected = %self.expected,
                actual = %actual
            );
            self.notifier.notify(&Notice::WrongNetwork {
                expected: self.expected,
                actual,
                network_name: self.network_name.clone(),
            });
            return Err(ResolveError::WrongNetwork {
                expected: self.expected,
                actual,
            });
        }

        if !needs_signer {
            return Ok(ChainConnection::ReadOnly(ReadConnection {
                provider,
                chain_id: actual,
            }));
        }
        let account = provider.authorized_account().await?;
        tracing::debug!(target: "resolver", event = "signer", account = %account);
        Ok(ChainConnection::Signing(SigningConnection {
            provider,
            chain_id: actual,
            account,
        }))
    }
}
