// Path: crates/client/src/evm.rs
//! The wallet and sale-contract seams over an EVM JSON-RPC endpoint.
//!
//! A local private-key wallet stands in for the browser wallet: it is
//! always authorized, so connecting never prompts.

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
};
use async_trait::async_trait;
use mint_api::{PendingTransaction, SaleReader, SaleWriter, WalletConnector, WalletProvider};
use mint_types::{
    app::{ChainId, TxReceipt},
    error::ChainError,
    Address, TxHash, U256,
};
use std::sync::Arc;

sol! {
    #[sol(rpc)]
    contract WhitelistSale {
        function presaleStarted() external view returns (bool);
        function presaleEnded() external view returns (uint256);
        function owner() external view returns (address);
        function tokenIds() external view returns (uint256);
        function startPresale() external;
        function presaleMint() external payable;
        function mint() external payable;
    }
}

type SaleInstance = WhitelistSale::WhitelistSaleInstance<DynProvider>;

fn call_error(e: alloy::contract::Error) -> ChainError {
    match e {
        alloy::contract::Error::TransportError(t) => ChainError::Transport(t.to_string()),
        other => ChainError::Reverted(other.to_string()),
    }
}

/// Connects to `rpc_url` with a wallet holding one private key.
pub struct EvmConnector {
    rpc_url: String,
    signer: PrivateKeySigner,
}

impl EvmConnector {
    pub fn new(rpc_url: impl Into<String>, private_key: &str) -> Result<Self, ChainError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|_| ChainError::NoAccount)?;
        Ok(Self {
            rpc_url: rpc_url.into(),
            signer,
        })
    }

    pub fn account(&self) -> Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for EvmConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmConnector")
            .field("rpc_url", &self.rpc_url)
            .field("account", &self.signer.address())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletConnector for EvmConnector {
    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ChainError> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .connect(&self.rpc_url)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?
            .erased();
        tracing::info!(target: "evm", event = "connected", rpc_url = %self.rpc_url);
        Ok(Arc::new(EvmProvider {
            provider,
            account: self.signer.address(),
        }))
    }
}

struct EvmProvider {
    provider: DynProvider,
    account: Address,
}

#[async_trait]
impl WalletProvider for EvmProvider {
    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map(ChainId)
            .map_err(|e| ChainError::Transport(e.to_string()))
    }

    async fn authorized_account(&self) -> Result<Address, ChainError> {
        Ok(self.account)
    }

    fn sale_reader(&self, contract: Address) -> Arc<dyn SaleReader> {
        Arc::new(EvmSale {
            instance: WhitelistSale::new(contract, self.provider.clone()),
            from: self.account,
        })
    }

    fn sale_writer(&self, contract: Address, account: Address) -> Arc<dyn SaleWriter> {
        Arc::new(EvmSale {
            instance: WhitelistSale::new(contract, self.provider.clone()),
            from: account,
        })
    }
}

struct EvmSale {
    instance: SaleInstance,
    from: Address,
}

#[async_trait]
impl SaleReader for EvmSale {
    async fn presale_started(&self) -> Result<bool, ChainError> {
        self.instance
            .presaleStarted()
            .call()
            .await
            .map_err(call_error)
    }

    async fn presale_ended(&self) -> Result<U256, ChainError> {
        self.instance.presaleEnded().call().await.map_err(call_error)
    }

    async fn owner(&self) -> Result<Address, ChainError> {
        self.instance.owner().call().await.map_err(call_error)
    }

    async fn token_ids(&self) -> Result<U256, ChainError> {
        self.instance.tokenIds().call().await.map_err(call_error)
    }
}

#[async_trait]
impl SaleWriter for EvmSale {
    async fn start_presale(&self) -> Result<Box<dyn PendingTransaction>, ChainError> {
        let pending = self
            .instance
            .startPresale()
            .from(self.from)
            .send()
            .await
            .map_err(call_error)?;
        Ok(Box::new(EvmPending { inner: pending }))
    }

    async fn presale_mint(&self, value: U256) -> Result<Box<dyn PendingTransaction>, ChainError> {
        let pending = self
            .instance
            .presaleMint()
            .from(self.from)
            .value(value)
            .send()
            .await
            .map_err(call_error)?;
        Ok(Box::new(EvmPending { inner: pending }))
    }

    async fn mint(&self, value: U256) -> Result<Box<dyn PendingTransaction>, ChainError> {
        let pending = self
            .instance
            .mint()
            .from(self.from)
            .value(value)
            .send()
            .await
            .map_err(call_error)?;
        Ok(Box::new(EvmPending { inner: pending }))
    }
}

struct EvmPending {
    inner: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingTransaction for EvmPending {
    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn wait(self: Box<Self>) -> Result<TxReceipt, ChainError> {
        let receipt = self
            .inner
            .get_receipt()
            .await
            .map_err(|e| ChainError::Confirmation(e.to_string()))?;
        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}
