// Path: crates/api/src/contract.rs

use async_trait::async_trait;
use mint_types::{app::TxReceipt, error::ChainError, Address, TxHash, U256};

/// The sale contract's read methods.
#[async_trait]
pub trait SaleReader: Send + Sync {
    /// `presaleStarted() -> bool`
    async fn presale_started(&self) -> Result<bool, ChainError>;
    /// `presaleEnded() -> uint256`, the presale end as seconds since epoch.
    async fn presale_ended(&self) -> Result<U256, ChainError>;
    /// `owner() -> address`
    async fn owner(&self) -> Result<Address, ChainError>;
    /// `tokenIds() -> uint256`, the number of tokens minted so far.
    async fn token_ids(&self) -> Result<U256, ChainError>;
}

/// The sale contract's write methods, bound to one sending account.
/// Each returns once the transaction is submitted; confirmation is awaited
/// separately through the returned handle.
#[async_trait]
pub trait SaleWriter: Send + Sync {
    /// `startPresale()`
    async fn start_presale(&self) -> Result<Box<dyn PendingTransaction>, ChainError>;
    /// `presaleMint() payable`
    async fn presale_mint(&self, value: U256) -> Result<Box<dyn PendingTransaction>, ChainError>;
    /// `mint() payable`
    async fn mint(&self, value: U256) -> Result<Box<dyn PendingTransaction>, ChainError>;
}

/// A submitted transaction awaiting block inclusion.
#[async_trait]
pub trait PendingTransaction: Send {
    /// The hash of the submitted transaction.
    fn tx_hash(&self) -> TxHash;
    /// Waits for block inclusion and returns the receipt.
    async fn wait(self: Box<Self>) -> Result<TxReceipt, ChainError>;
}
