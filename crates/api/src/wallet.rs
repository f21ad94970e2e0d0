// Path: crates/api/src/wallet.rs

use crate::contract::{SaleReader, SaleWriter};
use async_trait::async_trait;
use mint_types::{app::ChainId, error::ChainError, Address};
use std::sync::Arc;

/// Obtains the underlying provider handle from the user's wallet.
///
/// The first call in a session may prompt the user for authorization.
/// Once authorized, further calls return without prompting unless the
/// wallet session was revoked externally.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Connects to the wallet, prompting the user if needed.
    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ChainError>;
}

/// A connected wallet provider: query capability plus the ability to
/// derive a signer for the currently authorized account.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The chain id the provider is currently connected to.
    async fn chain_id(&self) -> Result<ChainId, ChainError>;

    /// The currently authorized account. May prompt the user.
    async fn authorized_account(&self) -> Result<Address, ChainError>;

    /// A read-only view of the sale contract at `contract`.
    fn sale_reader(&self, contract: Address) -> Arc<dyn SaleReader>;

    /// A signing view of the sale contract at `contract`, sending from `account`.
    fn sale_writer(&self, contract: Address, account: Address) -> Arc<dyn SaleWriter>;
}
